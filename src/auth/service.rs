//! Authentication service
//!
//! Ties signature verification to token issuance and maps both onto the
//! request-level error taxonomy.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use thiserror::Error;

use super::crypto::verify_adr36_amino;
use super::jwt::{
    issue_token_at, validate_token_at, Claims, JwtError, SharedSecret, TokenRejection,
    TOKEN_TTL_SECONDS,
};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("missing fields")]
    MissingFields,

    #[error("Malformed {field}: {reason}")]
    MalformedEncoding { field: &'static str, reason: String },

    #[error("invalid signature")]
    InvalidSignature,

    #[error("missing token")]
    MissingToken,

    /// The rejection reason is deliberately absent from the message
    #[error("invalid or expired token")]
    InvalidToken(TokenRejection),

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),
}

/// A decoded authentication attempt
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub wallet_address: String,
    pub signature: Vec<u8>,
    pub public_key: Vec<u8>,
    pub message: String,
}

impl AuthRequest {
    /// Build a request from its transport form
    ///
    /// Every field must be present and non-empty; `signature` and
    /// `public_key_base64` must be standard base64.
    pub fn from_encoded(
        wallet_address: Option<&str>,
        signature: Option<&str>,
        public_key_base64: Option<&str>,
        message: Option<&str>,
    ) -> Result<Self, AuthError> {
        let (Some(wallet_address), Some(signature), Some(public_key), Some(message)) = (
            non_empty(wallet_address),
            non_empty(signature),
            non_empty(public_key_base64),
            non_empty(message),
        ) else {
            return Err(AuthError::MissingFields);
        };

        let signature = decode_field("signature", signature)?;
        let public_key = decode_field("publicKeyBase64", public_key)?;

        Ok(Self {
            wallet_address: wallet_address.to_string(),
            signature,
            public_key,
            message: message.to_string(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn decode_field(field: &'static str, value: &str) -> Result<Vec<u8>, AuthError> {
    let bytes = STANDARD
        .decode(value)
        .map_err(|e| AuthError::MalformedEncoding {
            field,
            reason: e.to_string(),
        })?;

    if bytes.is_empty() {
        return Err(AuthError::MalformedEncoding {
            field,
            reason: "decodes to zero bytes".to_string(),
        });
    }

    Ok(bytes)
}

/// Authentication service
///
/// Stateless: every call depends only on its arguments and the immutable
/// configuration captured at construction.
#[derive(Clone, Debug)]
pub struct AuthService {
    secret: SharedSecret,
    address_prefix: String,
    token_ttl_seconds: i64,
}

impl AuthService {
    /// Create a new AuthService issuing tokens with the default TTL
    pub fn new(secret: SharedSecret, address_prefix: impl Into<String>) -> Self {
        Self {
            secret,
            address_prefix: address_prefix.into(),
            token_ttl_seconds: TOKEN_TTL_SECONDS,
        }
    }

    pub fn address_prefix(&self) -> &str {
        &self.address_prefix
    }

    pub fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_seconds
    }

    /// Verify a signed challenge and issue an auth token
    pub fn authenticate(&self, request: &AuthRequest) -> Result<String, AuthError> {
        self.authenticate_at(request, Utc::now())
    }

    pub fn authenticate_at(
        &self,
        request: &AuthRequest,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let is_valid = verify_adr36_amino(
            &self.address_prefix,
            &request.wallet_address,
            &request.message,
            &request.public_key,
            &request.signature,
        );

        if !is_valid {
            tracing::warn!(
                wallet_address = %request.wallet_address,
                "Signature verification failed"
            );
            return Err(AuthError::InvalidSignature);
        }

        // A replayed (message, signature) pair mints a fresh token.
        tracing::warn!(
            wallet_address = %request.wallet_address,
            "Signed challenge is not bound to a nonce and can be replayed"
        );

        let token = issue_token_at(
            &request.wallet_address,
            &self.secret,
            self.token_ttl_seconds,
            now,
        )?;

        tracing::info!(
            wallet_address = %request.wallet_address,
            ttl_seconds = self.token_ttl_seconds,
            "Issued auth token"
        );

        Ok(token)
    }

    /// Validate a presented auth token and recover its claims
    pub fn validate(&self, token: Option<&str>) -> Result<Claims, AuthError> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(
        &self,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Claims, AuthError> {
        let token = non_empty(token).ok_or(AuthError::MissingToken)?;

        validate_token_at(token, &self.secret, now).map_err(|reason| {
            tracing::debug!(reason = %reason, "Rejected auth token");
            AuthError::InvalidToken(reason)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::crypto::{derive_bech32_address, make_adr36_sign_doc};
    use chrono::Duration;
    use k256::ecdsa::{signature::Signer, Signature, SigningKey};
    use std::io;
    use std::sync::{Arc, Mutex};

    const MESSAGE: &str = "Sign in to Celestia Quiz";

    fn make_service(secret: &str) -> AuthService {
        AuthService::new(SharedSecret::new(secret).unwrap(), "celestia")
    }

    fn signed_request(message: &str) -> AuthRequest {
        let signing_key = SigningKey::from_slice(&[0x44; 32]).unwrap();
        let public_key = signing_key.verifying_key().to_encoded_point(true);
        let wallet_address = derive_bech32_address("celestia", public_key.as_bytes()).unwrap();
        let doc = make_adr36_sign_doc(&wallet_address, message).unwrap();
        let signature: Signature = signing_key.sign(&doc);

        AuthRequest {
            wallet_address,
            signature: signature.to_bytes().to_vec(),
            public_key: public_key.as_bytes().to_vec(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_from_encoded_requires_all_fields() {
        let full = (
            Some("celestia1abc"),
            Some("AAAA"),
            Some("AAAA"),
            Some("hello"),
        );
        assert!(AuthRequest::from_encoded(full.0, full.1, full.2, full.3).is_ok());

        assert!(matches!(
            AuthRequest::from_encoded(None, full.1, full.2, full.3),
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            AuthRequest::from_encoded(full.0, Some(""), full.2, full.3),
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            AuthRequest::from_encoded(full.0, full.1, None, full.3),
            Err(AuthError::MissingFields)
        ));
        assert!(matches!(
            AuthRequest::from_encoded(full.0, full.1, full.2, None),
            Err(AuthError::MissingFields)
        ));
    }

    #[test]
    fn test_from_encoded_rejects_bad_base64() {
        let result =
            AuthRequest::from_encoded(Some("celestia1abc"), Some("not base64!"), Some("AAAA"), Some("m"));
        assert!(matches!(
            result,
            Err(AuthError::MalformedEncoding { field: "signature", .. })
        ));

        let result =
            AuthRequest::from_encoded(Some("celestia1abc"), Some("AAAA"), Some("%%%"), Some("m"));
        assert!(matches!(
            result,
            Err(AuthError::MalformedEncoding { field: "publicKeyBase64", .. })
        ));
    }

    #[test]
    fn test_from_encoded_does_not_trim_base64() {
        for padded in [" AAAA", "AAAA ", "AAAA\n"] {
            let result = AuthRequest::from_encoded(
                Some("celestia1abc"),
                Some(padded),
                Some("AAAA"),
                Some("m"),
            );
            assert!(
                matches!(
                    result,
                    Err(AuthError::MalformedEncoding { field: "signature", .. })
                ),
                "{:?} was accepted",
                padded
            );
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_authenticate_warns_about_unbound_challenge() {
        let service = make_service("test-secret-key");
        let request = signed_request(MESSAGE);
        let logs = CapturedLogs::default();

        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();

        let token = tracing::subscriber::with_default(subscriber, || service.authenticate(&request))
            .unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let warning = output
            .lines()
            .find(|line| line.contains("not bound to a nonce"))
            .expect("no unbound challenge warning was logged");
        assert!(warning.contains("WARN"));
        assert!(warning.contains(&request.wallet_address));

        let encoded_signature = STANDARD.encode(&request.signature);
        assert!(!output.contains(&encoded_signature));
        assert!(!output.contains(MESSAGE));
        assert!(!output.contains(&token));
    }

    #[test]
    fn test_authenticate_then_validate() {
        let service = make_service("test-secret-key");
        let request = signed_request(MESSAGE);

        let token = service.authenticate(&request).unwrap();
        let claims = service.validate(Some(&token)).unwrap();
        assert_eq!(claims.sub, request.wallet_address);
    }

    #[test]
    fn test_authenticate_rejects_forged_signature() {
        let service = make_service("test-secret-key");
        let mut request = signed_request(MESSAGE);
        request.signature[10] ^= 0xff;

        assert!(matches!(
            service.authenticate(&request),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_authenticate_rejects_other_message() {
        let service = make_service("test-secret-key");
        let mut request = signed_request(MESSAGE);
        request.message = "Different challenge".to_string();

        assert!(matches!(
            service.authenticate(&request),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_validate_reasons() {
        let service = make_service("test-secret-key");
        let issued_at = Utc::now();
        let token = service
            .authenticate_at(&signed_request(MESSAGE), issued_at)
            .unwrap();

        assert!(matches!(service.validate(None), Err(AuthError::MissingToken)));
        assert!(matches!(service.validate(Some("")), Err(AuthError::MissingToken)));

        assert!(matches!(
            service.validate(Some("garbage")),
            Err(AuthError::InvalidToken(TokenRejection::Malformed))
        ));

        let expired_at = issued_at + Duration::seconds(service.token_ttl_seconds());
        assert!(matches!(
            service.validate_at(Some(&token), expired_at),
            Err(AuthError::InvalidToken(TokenRejection::Expired))
        ));

        assert!(matches!(
            make_service("another-secret").validate(Some(&token)),
            Err(AuthError::InvalidToken(TokenRejection::SignatureMismatch))
        ));
    }

    #[test]
    fn test_invalid_token_message_hides_reason() {
        for reason in [
            TokenRejection::SignatureMismatch,
            TokenRejection::Malformed,
            TokenRejection::Expired,
        ] {
            assert_eq!(
                AuthError::InvalidToken(reason).to_string(),
                "invalid or expired token"
            );
        }
    }
}
