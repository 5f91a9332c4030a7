//! API handlers for the wallet auth server

pub mod auth;

use axum::Json;

use crate::models::HealthResponse;

pub use auth::{authenticate, protected, verify_token};

pub async fn root() -> &'static str {
    "Wallet Auth API Server"
}

/// Health check endpoint
///
/// The server holds no external connections, so being able to answer is
/// the whole check.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
