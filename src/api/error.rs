use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::AuthError;

#[derive(Debug)]
pub enum ApiError {
    /// Bad, expired or unverifiable token, or the user no longer exists
    Unauthorized,

    /// Login failure; never distinguishes unknown user from wrong password
    InvalidCredentials,

    /// Signup or rename against a username that is already taken
    DuplicateUsername,

    NotFound(String),

    Validation(String),

    /// Timeout or connection failure talking to the store; retryable
    StoreUnavailable,

    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "Invalid authentication credentials"),
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::DuplicateUsername => write!(f, "Username already exists"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::StoreUnavailable => write!(f, "Data store unavailable"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Invalid authentication credentials".to_string(),
            ),
            Self::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            Self::DuplicateUsername => {
                (StatusCode::CONFLICT, "Username already exists".to_string())
            }
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::StoreUnavailable => {
                tracing::error!("Store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "The data store is temporarily unavailable, please retry".to_string(),
                )
            }
            Self::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Map a repository error, surfacing pool/connection faults as
    /// unavailability instead of a generic internal error.
    pub fn from_store(err: &anyhow::Error) -> Self {
        use sea_orm::DbErr;

        match err.downcast_ref::<DbErr>() {
            Some(DbErr::Conn(_) | DbErr::ConnectionAcquire(_)) => {
                tracing::error!("Store connection failure: {}", err);
                Self::StoreUnavailable
            }
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::from_store(&err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::DuplicateUsername => Self::DuplicateUsername,
            AuthError::Unauthorized => Self::Unauthorized,
            AuthError::Store(e) => Self::from_store(&e),
        }
    }
}
