use axum::{
    Json,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, TokenResponse, validation};
use crate::db::User;

/// The user resolved by `auth_middleware`, attached to the request
/// extensions for the protected handlers.
#[derive(Clone)]
pub struct CurrentUser(pub User);

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Authorization gate for the protected subtree.
///
/// Resolves `Authorization: Bearer <token>` to a concrete user or fails
/// with one generic 401; the response never reveals whether the token was
/// malformed, expired, or pointed at a vanished user.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).ok_or(ApiError::Unauthorized)?;

    let user = state.auth().authenticate(token).await?;

    tracing::Span::current().record("user_id", user.id);
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth_header = headers.get("Authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    auth_str.strip_prefix("Bearer ").map(str::trim)
}

/// POST /signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    let username = validation::validate_username(&payload.username)?;
    let password = validation::validate_password(&payload.password)?;

    let token = state.auth().signup(username, password).await?;

    Ok(Json(ApiResponse::success(TokenResponse { token })))
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    // Shape checks only; credential checks stay generic on purpose
    if payload.username.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let token = state.auth().login(&payload.username, &payload.password).await?;

    Ok(Json(ApiResponse::success(TokenResponse { token })))
}
