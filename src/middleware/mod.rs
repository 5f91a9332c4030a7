//! Middleware for the wallet auth API
//!
//! Request tracing, security headers and bearer-token authentication.

pub mod auth;
mod security;
mod tracing;

pub use auth::AuthenticatedWallet;
pub use security::{hsts_header, security_headers};
pub use self::tracing::request_tracing;
