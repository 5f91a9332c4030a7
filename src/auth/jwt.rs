//! JWT token issuance and validation
//!
//! Tokens bind a verified wallet address to an expiration and are signed
//! with HS256 using the process-wide shared secret.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lifetime of an issued auth token
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// JWT issuance errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token subject must not be empty")]
    EmptySubject,

    #[error("Token TTL must be positive, got {0}s")]
    InvalidTtl(i64),

    #[error("Shared secret must not be empty")]
    EmptySecret,
}

/// Why a presented token was rejected
///
/// Callers outside this crate only ever see a single "invalid or expired"
/// outcome; the reason is kept for logs and tests.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    #[error("signature mismatch")]
    SignatureMismatch,

    #[error("malformed token")]
    Malformed,

    #[error("token expired")]
    Expired,
}

/// Symmetric key used to sign and verify tokens
#[derive(Clone)]
pub struct SharedSecret(Arc<[u8]>);

impl SharedSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, JwtError> {
        let bytes = secret.into();
        if bytes.is_empty() {
            return Err(JwtError::EmptySecret);
        }
        Ok(Self(bytes.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(****)")
    }
}

/// JWT claims of an auth token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (wallet address)
    pub sub: String,
    /// Wallet address, duplicated for clients that read it by name
    #[serde(rename = "walletAddress")]
    pub wallet_address: String,
    /// JWT ID, unique per issuance
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Issue a token for `subject` valid for `ttl_seconds` from now
pub fn issue_token(
    subject: &str,
    secret: &SharedSecret,
    ttl_seconds: i64,
) -> Result<String, JwtError> {
    issue_token_at(subject, secret, ttl_seconds, Utc::now())
}

/// Issue a token as if the current time were `now`
pub fn issue_token_at(
    subject: &str,
    secret: &SharedSecret,
    ttl_seconds: i64,
    now: DateTime<Utc>,
) -> Result<String, JwtError> {
    if subject.is_empty() {
        return Err(JwtError::EmptySubject);
    }
    if ttl_seconds <= 0 {
        return Err(JwtError::InvalidTtl(ttl_seconds));
    }

    let exp = Duration::try_seconds(ttl_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or(JwtError::InvalidTtl(ttl_seconds))?;

    let claims = Claims {
        sub: subject.to_string(),
        wallet_address: subject.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::EncodingFailed(e.to_string()))
}

/// Verify and decode a token against the current time
pub fn validate_token(token: &str, secret: &SharedSecret) -> Result<Claims, TokenRejection> {
    validate_token_at(token, secret, Utc::now())
}

/// Verify and decode a token as if the current time were `now`
///
/// The token is rejected once `now >= exp`; no leeway is applied.
pub fn validate_token_at(
    token: &str,
    secret: &SharedSecret,
    now: DateTime<Utc>,
) -> Result<Claims, TokenRejection> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked below, without the library's default leeway
    validation.validate_exp = false;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => TokenRejection::SignatureMismatch,
        _ => TokenRejection::Malformed,
    })?;

    let claims = token_data.claims;

    if claims.sub.is_empty() || claims.exp <= claims.iat {
        return Err(TokenRejection::Malformed);
    }

    if now.timestamp() >= claims.exp {
        return Err(TokenRejection::Expired);
    }

    Ok(claims)
}
