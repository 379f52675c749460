use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState, ProfileDto, validation};
use crate::db::ProfileUpdate;

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    pub title: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Serialize)]
pub struct UpdateProfileResponse {
    pub message: String,
    pub profile: ProfileDto,
}

/// GET /user/profile
pub async fn view_profile(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<ApiResponse<ProfileDto>> {
    Json(ApiResponse::success(user.into()))
}

/// PUT /user/profile
///
/// Replaces the profile fields as a whole; omitted optional fields are
/// cleared, not kept.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UpdateProfileResponse>>, ApiError> {
    let username = validation::validate_username(&payload.username)?;
    if let Some(picture) = payload.profile_picture.as_deref() {
        validation::validate_url(picture)?;
    }

    let outcome = state
        .store()
        .update_user_profile(user.id, username, payload.title, payload.profile_picture)
        .await?;

    match outcome {
        ProfileUpdate::Updated(updated) => Ok(Json(ApiResponse::success(UpdateProfileResponse {
            message: "Updated successfully.".to_string(),
            profile: updated.into(),
        }))),
        ProfileUpdate::NameTaken => Err(ApiError::DuplicateUsername),
        // The account disappeared between the gate and the update
        ProfileUpdate::Missing => Err(ApiError::Unauthorized),
    }
}
