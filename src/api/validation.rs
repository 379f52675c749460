use url::Url;

use super::ApiError;
use crate::models::link::{LinkDraft, Platform};

/// Route names that live under the same namespace as `GET /{username}`.
const RESERVED_USERNAMES: [&str; 6] = ["signup", "login", "user", "links", "healthz", "metrics"];

pub fn validate_username(username: &str) -> Result<&str, ApiError> {
    if username.is_empty() {
        return Err(ApiError::validation("Username cannot be empty"));
    }

    if username.len() > 32 {
        return Err(ApiError::validation(
            "Username must be 32 characters or less",
        ));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ApiError::validation(
            "Username can only contain letters, digits, hyphens, underscores, and dots",
        ));
    }

    if RESERVED_USERNAMES.contains(&username) {
        return Err(ApiError::validation("Username is reserved"));
    }

    Ok(username)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }

    if password.len() > 128 {
        return Err(ApiError::validation(
            "Password must be 128 characters or less",
        ));
    }

    Ok(password)
}

/// A destination must be a well-formed absolute http(s) URL.
pub fn validate_url(url: &str) -> Result<&str, ApiError> {
    let parsed =
        Url::parse(url).map_err(|_| ApiError::validation(format!("Invalid URL: {url}")))?;

    if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
        return Err(ApiError::validation(format!(
            "URL must be absolute http or https: {url}"
        )));
    }

    Ok(url)
}

pub fn validate_platform(platform: &str) -> Result<Platform, ApiError> {
    platform
        .parse()
        .map_err(|()| ApiError::validation(format!("Unknown platform: {platform}")))
}

/// Structural validation of a link payload before any store call runs.
pub fn validate_link(url: &str, platform: &str, text: &str) -> Result<LinkDraft, ApiError> {
    let url = validate_url(url)?;
    let platform = validate_platform(platform)?;

    if text.is_empty() {
        return Err(ApiError::validation("Link text cannot be empty"));
    }
    if text.len() > 200 {
        return Err(ApiError::validation(
            "Link text must be 200 characters or less",
        ));
    }

    Ok(LinkDraft {
        url: url.to_string(),
        platform,
        text: text.to_string(),
    })
}
