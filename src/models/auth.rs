//! Authentication request/response models

use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Signed challenge submitted by a wallet
///
/// Fields are optional so that an absent field surfaces as "missing fields"
/// instead of a JSON deserialization error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateRequest {
    pub wallet_address: Option<String>,
    /// Base64-encoded 64-byte signature
    pub signature: Option<String>,
    /// Base64-encoded secp256k1 public key
    pub public_key_base64: Option<String>,
    pub message: Option<String>,
}

/// Issued auth token
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthenticateResponse {
    pub auth_token: String,
}

/// Token presented for validation
#[derive(Debug, Default, Deserialize)]
pub struct VerifyTokenRequest {
    pub auth_token: Option<String>,
}

/// Result of a successful token validation
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    #[serde(rename = "walletAddress")]
    pub wallet_address: String,
    pub message: String,
}

/// Response of the bearer-protected endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ProtectedResponse {
    pub message: String,
    #[serde(rename = "walletAddress")]
    pub wallet_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticate_request_field_names() {
        let req: AuthenticateRequest = serde_json::from_str(
            r#"{"walletAddress":"celestia1abc","signature":"c2ln","publicKeyBase64":"cGs=","message":"hi"}"#,
        )
        .unwrap();

        assert_eq!(req.wallet_address.as_deref(), Some("celestia1abc"));
        assert_eq!(req.signature.as_deref(), Some("c2ln"));
        assert_eq!(req.public_key_base64.as_deref(), Some("cGs="));
        assert_eq!(req.message.as_deref(), Some("hi"));
    }

    #[test]
    fn test_absent_fields_deserialize_as_none() {
        let req: AuthenticateRequest =
            serde_json::from_str(r#"{"walletAddress":"celestia1abc","message":null}"#).unwrap();
        assert!(req.signature.is_none());
        assert!(req.message.is_none());

        let req: VerifyTokenRequest = serde_json::from_str("{}").unwrap();
        assert!(req.auth_token.is_none());
    }

    #[test]
    fn test_verify_response_shape() {
        let json = serde_json::to_value(VerifyTokenResponse {
            wallet_address: "celestia1abc".to_string(),
            message: "token valid".to_string(),
        })
        .unwrap();

        assert_eq!(json["walletAddress"], "celestia1abc");
        assert_eq!(json["message"], "token valid");
    }
}
