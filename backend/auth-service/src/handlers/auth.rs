/// Authentication handlers
use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::{AuthError, Result},
    middleware::{BearerToken, CurrentUser},
    models::{JoinRequest, LoginRequest, RefreshTokenRequest, TokenPair},
    security::password,
    AppState,
};

const DEFAULT_ROLE: &str = "ROLE_USER";

/// Login endpoint handler: credential check, then a fresh token pair.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenPair>> {
    // Same failure for unknown id and wrong password.
    let account = state
        .directory
        .find_member(&payload.id)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    password::verify_password(&payload.password, &account.password_hash)?;

    let pair = state.tokens.issue(&account.id, vec![account.role]).await?;

    tracing::info!(member = %payload.id, "member logged in");
    Ok(Json(pair))
}

/// Join endpoint handler: minimal member creation with the default role.
pub async fn join(
    State(state): State<AppState>,
    Json(payload): Json<JoinRequest>,
) -> Result<StatusCode> {
    let password_hash = password::hash_password(&payload.password)?;

    state
        .directory
        .create_member(&payload.id, &password_hash, &payload.name, DEFAULT_ROLE)
        .await?;

    tracing::info!(member = %payload.id, "member joined");
    Ok(StatusCode::CREATED)
}

/// Logout endpoint handler: revoke the caller's current pair.
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
    BearerToken(access_token): BearerToken,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<Json<bool>> {
    state
        .tokens
        .revoke(&access_token, Some(&payload.refresh_token))
        .await?;

    tracing::info!(member = %user.subject, "member logged out");
    Ok(Json(true))
}

/// Reissue endpoint handler: exchange a refresh token for a new pair.
///
/// Stays outside the auth gate: the access token presented here is usually
/// already expired, which is the whole point of the exchange.
pub async fn reissue(
    State(state): State<AppState>,
    BearerToken(access_token): BearerToken,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<Json<TokenPair>> {
    let pair = state
        .tokens
        .reissue(&access_token, &payload.refresh_token)
        .await?;

    Ok(Json(pair))
}
