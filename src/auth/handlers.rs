// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::{
    error::AuthError,
    models::{LoginRequest, RefreshRequest, TokenPair},
};

/// Handler for POST /login
/// Exchanges a username and password for a token pair
pub async fn login_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, Json<TokenPair>), AuthError> {
    let tokens = state
        .auth_service
        .login(&request.username, &request.password)
        .await?;

    tracing::info!("User '{}' logged in", request.username);
    Ok((StatusCode::CREATED, Json(tokens)))
}

/// Handler for PUT /login/refresh
/// Exchanges a valid refresh token for a new token pair, no password
/// required
pub async fn refresh_handler(
    State(state): State<crate::AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<(StatusCode, Json<TokenPair>), AuthError> {
    let tokens = state.auth_service.refresh(&request.refresh_token).await?;

    tracing::info!("Token pair refreshed");
    Ok((StatusCode::CREATED, Json(tokens)))
}
