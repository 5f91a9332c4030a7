//! Cosmos off-chain signature verification
//!
//! Verifies ADR-36 `signArbitrary` signatures (secp256k1, amino JSON sign doc)
//! as produced by Keplr-compatible wallets.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bech32::{ToBase32, Variant};
use k256::ecdsa::{signature::Verifier, Signature, VerifyingKey};
use ripemd::Ripemd160;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors that can occur while building verification inputs
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid address prefix: {0}")]
    InvalidPrefix(String),

    #[error("Sign doc serialization failed: {0}")]
    SignDoc(#[from] serde_json::Error),
}

/// Amino sign doc for an ADR-36 arbitrary message.
///
/// Field order is alphabetical at every level, which is what the canonical
/// (sorted-key) amino JSON encoding requires.
#[derive(Serialize)]
struct SignDoc<'a> {
    account_number: &'static str,
    chain_id: &'static str,
    fee: Fee,
    memo: &'static str,
    msgs: [SignDataMsg<'a>; 1],
    sequence: &'static str,
}

#[derive(Serialize)]
struct Fee {
    amount: Vec<()>,
    gas: &'static str,
}

#[derive(Serialize)]
struct SignDataMsg<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    value: SignDataValue<'a>,
}

#[derive(Serialize)]
struct SignDataValue<'a> {
    data: String,
    signer: &'a str,
}

/// Build the canonical bytes a wallet signs for `message` on behalf of `signer`
pub fn make_adr36_sign_doc(signer: &str, message: &str) -> Result<Vec<u8>, CryptoError> {
    let doc = SignDoc {
        account_number: "0",
        chain_id: "",
        fee: Fee {
            amount: Vec::new(),
            gas: "0",
        },
        memo: "",
        msgs: [SignDataMsg {
            kind: "sign/MsgSignData",
            value: SignDataValue {
                data: STANDARD.encode(message.as_bytes()),
                signer,
            },
        }],
        sequence: "0",
    };

    let json = serde_json::to_string(&doc)?;

    // Amino JSON escapes HTML-significant characters
    let escaped = json
        .replace('&', "\\u0026")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e");

    Ok(escaped.into_bytes())
}

/// Derive the bech32 account address of a secp256k1 public key
///
/// Accepts compressed (33 bytes) or uncompressed (65 bytes) SEC1 keys; the
/// address is always computed over the compressed form.
pub fn derive_bech32_address(prefix: &str, public_key: &[u8]) -> Result<String, CryptoError> {
    let verifying_key = VerifyingKey::from_sec1_bytes(public_key)
        .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

    address_of(prefix, &verifying_key)
}

fn address_of(prefix: &str, verifying_key: &VerifyingKey) -> Result<String, CryptoError> {
    let compressed = verifying_key.to_encoded_point(true);
    let account_id = Ripemd160::digest(Sha256::digest(compressed.as_bytes()));

    bech32::encode(prefix, account_id.to_base32(), Variant::Bech32)
        .map_err(|e| CryptoError::InvalidPrefix(e.to_string()))
}

/// Verify an ADR-36 amino signature
///
/// # Arguments
/// * `prefix` - Bech32 human-readable part of the chain (e.g. "celestia")
/// * `wallet_address` - Address the client claims to own
/// * `message` - The exact plaintext that was signed
/// * `public_key` - Raw SEC1 secp256k1 public key
/// * `signature` - Raw 64-byte `r || s` signature
///
/// # Returns
/// `true` only if `public_key` derives `wallet_address` under `prefix` and
/// `signature` is valid over the sign doc. Any cryptographically invalid
/// input yields `false`.
pub fn verify_adr36_amino(
    prefix: &str,
    wallet_address: &str,
    message: &str,
    public_key: &[u8],
    signature: &[u8],
) -> bool {
    let verifying_key = match VerifyingKey::from_sec1_bytes(public_key) {
        Ok(key) => key,
        Err(_) => {
            tracing::debug!(wallet_address, "Public key is not a valid secp256k1 point");
            return false;
        }
    };

    match address_of(prefix, &verifying_key) {
        Ok(derived) if derived == wallet_address => {}
        Ok(derived) => {
            tracing::debug!(
                wallet_address,
                derived_address = %derived,
                "Public key does not derive the claimed address"
            );
            return false;
        }
        Err(e) => {
            tracing::warn!(error = %e, prefix, "Failed to derive address");
            return false;
        }
    }

    let signature = match Signature::from_slice(signature) {
        Ok(sig) => sig,
        Err(_) => {
            tracing::debug!(wallet_address, "Signature is not a 64-byte r||s value");
            return false;
        }
    };

    // Not every wallet emits low-S signatures
    let signature = signature.normalize_s().unwrap_or(signature);

    let sign_doc = match make_adr36_sign_doc(wallet_address, message) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build sign doc");
            return false;
        }
    };

    verifying_key.verify(&sign_doc, &signature).is_ok()
}
