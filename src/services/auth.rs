//! Authentication domain service: signup, login, and the request gate.

use thiserror::Error;

use crate::config::SecurityConfig;
use crate::db::{Store, User};
use crate::services::tokens::TokenService;

/// Errors specific to authentication operations.
///
/// `InvalidCredentials` and `Unauthorized` are deliberately generic: a
/// caller can never tell a missing user from a wrong password, or a bad
/// signature from an expired token.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Invalid authentication credentials")]
    Unauthorized,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub struct AuthService {
    store: Store,
    tokens: TokenService,
    security: SecurityConfig,
}

impl AuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: TokenService, security: SecurityConfig) -> Self {
        Self {
            store,
            tokens,
            security,
        }
    }

    /// Register a new account and issue its first token.
    pub async fn signup(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let created = self
            .store
            .create_user(username, password, &self.security)
            .await?;

        let Some(user) = created else {
            return Err(AuthError::DuplicateUsername);
        };

        tracing::info!(username = %user.username, "New account created");
        Ok(self.tokens.issue(user.id)?)
    }

    /// Verify credentials and issue a token.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let is_valid = self.store.verify_user_password(username, password).await?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(self.tokens.issue(user.id)?)
    }

    /// Resolve a bearer token to the user it was issued for.
    ///
    /// Token failures and a user deleted after issuance are reported
    /// identically as `Unauthorized`; only a store fault escapes as its
    /// own kind so the caller can surface it as unavailability rather
    /// than a credential problem.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let Some(user_id) = self.tokens.verify(token) else {
            return Err(AuthError::Unauthorized);
        };

        let user = self.store.get_user_by_id(user_id).await?;
        user.ok_or(AuthError::Unauthorized)
    }
}
