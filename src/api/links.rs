use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState, LinkDto, MessageResponse, validation};

#[derive(Deserialize)]
pub struct LinkPayload {
    pub url: String,
    pub platform: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct LinkMutationResponse {
    pub message: String,
    pub link: LinkDto,
}

fn link_not_found() -> ApiError {
    ApiError::NotFound("Link not found.".to_string())
}

/// GET /links
pub async fn list_links(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<LinkDto>>>, ApiError> {
    let links = state.store().list_links(user.id).await?;

    Ok(Json(ApiResponse::success(
        links.into_iter().map(LinkDto::from).collect(),
    )))
}

/// POST /links
pub async fn create_link(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<LinkPayload>,
) -> Result<Json<ApiResponse<LinkMutationResponse>>, ApiError> {
    let draft = validation::validate_link(&payload.url, &payload.platform, &payload.text)?;

    let link = state.store().create_link(user.id, draft).await?;

    Ok(Json(ApiResponse::success(LinkMutationResponse {
        message: "Inserted successfully.".to_string(),
        link: link.into(),
    })))
}

/// GET /links/{id}
pub async fn get_link(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(link_id): Path<i32>,
) -> Result<Json<ApiResponse<LinkDto>>, ApiError> {
    let link = state
        .store()
        .get_link(user.id, link_id)
        .await?
        .ok_or_else(link_not_found)?;

    Ok(Json(ApiResponse::success(link.into())))
}

/// PUT /links/{id}
///
/// Whole-payload replacement: url, platform and text are all written, no
/// partial update exists.
pub async fn update_link(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(link_id): Path<i32>,
    Json(payload): Json<LinkPayload>,
) -> Result<Json<ApiResponse<LinkMutationResponse>>, ApiError> {
    let draft = validation::validate_link(&payload.url, &payload.platform, &payload.text)?;

    let link = state
        .store()
        .update_link(user.id, link_id, draft)
        .await?
        .ok_or_else(link_not_found)?;

    Ok(Json(ApiResponse::success(LinkMutationResponse {
        message: "Updated successfully.".to_string(),
        link: link.into(),
    })))
}

/// DELETE /links/{id}
pub async fn delete_link(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(link_id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let deleted = state.store().delete_link(user.id, link_id).await?;

    if !deleted {
        return Err(link_not_found());
    }

    Ok(Json(ApiResponse::success(MessageResponse {
        message: "Deleted successfully.".to_string(),
    })))
}
