//! Authentication HTTP handlers
//!
//! Endpoints for wallet-based authentication.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::auth::AuthRequest;
use crate::error::ApiResult;
use crate::middleware::AuthenticatedWallet;
use crate::models::{
    AuthenticateRequest, AuthenticateResponse, ProtectedResponse, VerifyTokenRequest,
    VerifyTokenResponse,
};
use crate::state::AppState;

/// POST /auth - Verify a signed challenge and issue an auth token
pub async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<AuthenticateRequest>, JsonRejection>,
) -> ApiResult<Json<AuthenticateResponse>> {
    let Json(req) = payload?;

    let request = AuthRequest::from_encoded(
        req.wallet_address.as_deref(),
        req.signature.as_deref(),
        req.public_key_base64.as_deref(),
        req.message.as_deref(),
    )?;

    let auth_token = state.auth_service.authenticate(&request)?;

    Ok(Json(AuthenticateResponse { auth_token }))
}

/// POST /verify - Validate an auth token and return its wallet address
pub async fn verify_token(
    State(state): State<AppState>,
    payload: Result<Json<VerifyTokenRequest>, JsonRejection>,
) -> ApiResult<Json<VerifyTokenResponse>> {
    let Json(req) = payload?;

    let claims = state.auth_service.validate(req.auth_token.as_deref())?;

    Ok(Json(VerifyTokenResponse {
        wallet_address: claims.wallet_address,
        message: "token valid".to_string(),
    }))
}

/// POST /protected - Example endpoint guarded by a bearer token
pub async fn protected(wallet: AuthenticatedWallet) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "Access granted".to_string(),
        wallet_address: wallet.wallet_address,
    })
}
