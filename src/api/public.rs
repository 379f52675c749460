use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, LinkDto, PublicProfileDto};

/// GET /{username}
///
/// The one unauthenticated read path. Lookup is exact and case-sensitive;
/// the projection carries no credentials and no owner-only fields.
pub async fn public_profile(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<PublicProfileDto>>, ApiError> {
    let user = state
        .store()
        .get_user_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found.".to_string()))?;

    let links = state.store().list_links(user.id).await?;

    Ok(Json(ApiResponse::success(PublicProfileDto {
        username: user.username,
        title: user.title,
        profile_picture: user.profile_picture,
        links: links.into_iter().map(LinkDto::from).collect(),
    })))
}
