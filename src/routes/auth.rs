//! Authentication routes

use axum::{routing::post, Router};

use crate::handlers::auth;
use crate::state::AppState;

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth", post(auth::authenticate))
        .route("/verify", post(auth::verify_token))
        .route("/protected", post(auth::protected))
}
