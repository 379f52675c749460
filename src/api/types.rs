use serde::Serialize;

use crate::db::User;
use crate::entities::links;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LinkDto {
    pub id: i32,
    pub url: String,
    pub platform: String,
    pub text: String,
}

impl From<links::Model> for LinkDto {
    fn from(model: links::Model) -> Self {
        Self {
            id: model.id,
            url: model.url,
            platform: model.platform,
            text: model.text,
        }
    }
}

/// Owner view of the profile. Assembled per entity instead of layering
/// view models; the password hash never reaches any DTO.
#[derive(Debug, Serialize)]
pub struct ProfileDto {
    pub username: String,
    pub title: Option<String>,
    pub profile_picture: Option<String>,
}

impl From<User> for ProfileDto {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            title: user.title,
            profile_picture: user.profile_picture,
        }
    }
}

/// What anyone may see at `GET /{username}`.
#[derive(Debug, Serialize)]
pub struct PublicProfileDto {
    pub username: String,
    pub title: Option<String>,
    pub profile_picture: Option<String>,
    pub links: Vec<LinkDto>,
}
