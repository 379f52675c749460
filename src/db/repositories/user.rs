use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
    TransactionTrait,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::{prelude::*, users};

/// User data returned from the repository (without the password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub title: Option<String>,
    pub profile_picture: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            title: model.title,
            profile_picture: model.profile_picture,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Outcome of a profile update. The username column is unique, so a rename
/// can collide with another account.
#[derive(Debug)]
pub enum ProfileUpdate {
    Updated(User),
    NameTaken,
    Missing,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = Users::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Create a new account. Returns `None` when the username is taken,
    /// whether caught by the pre-check or by the unique index.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        let existing = self.get_by_username(username).await?;
        if existing.is_some() {
            return Ok(None);
        }

        let password = password.to_string();
        let security = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .context("Password hashing task panicked")??;

        let now = chrono::Utc::now().to_rfc3339();
        let insert = Users::insert(users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            title: Set(None),
            profile_picture: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await;

        let inserted = match insert {
            Ok(res) => res,
            // Lost the race against a concurrent signup for the same name
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Ok(None);
            }
            Err(err) => return Err(err).context("Failed to insert user"),
        };

        let user = Users::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await
            .context("Failed to load created user")?
            .ok_or_else(|| anyhow::anyhow!("Created user vanished"))?;

        Ok(Some(user.into()))
    }

    /// Verify a password against the stored hash.
    /// Note: This uses `spawn_blocking` because Argon2 verification is
    /// CPU-intensive and would block the async runtime if run directly.
    pub async fn verify_password(&self, username: &str, password: &str) -> Result<bool> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(false);
        };

        let password_hash = user.password_hash;
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            // A malformed stored digest reads as a failed verification
            let Ok(parsed_hash) = PasswordHash::new(&password_hash) else {
                return false;
            };

            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .await
        .context("Password verification task panicked")?;

        Ok(is_valid)
    }

    /// Replace the profile fields (username, title, profile picture) in a
    /// single transaction.
    pub async fn update_profile(
        &self,
        id: i32,
        username: &str,
        title: Option<String>,
        profile_picture: Option<String>,
    ) -> Result<ProfileUpdate> {
        let txn = self.conn.begin().await?;

        let Some(user) = Users::find_by_id(id).one(&txn).await? else {
            txn.rollback().await?;
            return Ok(ProfileUpdate::Missing);
        };

        if user.username != username {
            let holder = Users::find()
                .filter(users::Column::Username.eq(username))
                .one(&txn)
                .await?;
            if holder.is_some() {
                txn.rollback().await?;
                return Ok(ProfileUpdate::NameTaken);
            }
        }

        let mut active: users::ActiveModel = user.into();
        active.username = Set(username.to_string());
        active.title = Set(title);
        active.profile_picture = Set(profile_picture);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = match active.update(&txn).await {
            Ok(model) => model,
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                txn.rollback().await?;
                return Ok(ProfileUpdate::NameTaken);
            }
            Err(err) => return Err(err).context("Failed to update profile"),
        };

        txn.commit().await?;
        Ok(ProfileUpdate::Updated(updated.into()))
    }
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, security: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        security.argon2_memory_cost_kib,
        security.argon2_time_cost,
        security.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
