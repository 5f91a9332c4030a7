//! Authentication module
//!
//! Provides wallet-based authentication for Cosmos-SDK chains.
//! - ADR-36 off-chain signature verification against a bech32 address
//! - Stateless JWT issuance and validation with a shared secret

mod crypto;
mod jwt;
mod service;

pub use crypto::{derive_bech32_address, make_adr36_sign_doc, verify_adr36_amino, CryptoError};
pub use jwt::{
    issue_token, issue_token_at, validate_token, validate_token_at, Claims, JwtError,
    SharedSecret, TokenRejection, TOKEN_TTL_SECONDS,
};
pub use service::{AuthError, AuthRequest, AuthService};
