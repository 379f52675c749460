use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::entities::links;
use crate::models::link::LinkDraft;

pub mod migrator;
pub mod repositories;

pub use repositories::user::{ProfileUpdate, User};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // A pooled in-memory database is one database per connection
        let max_connections = if in_memory { 1 } else { max_connections };
        let min_connections = min_connections.min(max_connections);

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn link_repo(&self) -> repositories::link::LinkRepository {
        repositories::link::LinkRepository::new(self.conn.clone())
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<Option<User>> {
        self.user_repo().create(username, password, security).await
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn update_user_profile(
        &self,
        id: i32,
        username: &str,
        title: Option<String>,
        profile_picture: Option<String>,
    ) -> Result<ProfileUpdate> {
        self.user_repo()
            .update_profile(id, username, title, profile_picture)
            .await
    }

    pub async fn list_links(&self, user_id: i32) -> Result<Vec<links::Model>> {
        self.link_repo().list_for_user(user_id).await
    }

    pub async fn get_link(&self, user_id: i32, link_id: i32) -> Result<Option<links::Model>> {
        self.link_repo().get(user_id, link_id).await
    }

    pub async fn create_link(&self, user_id: i32, draft: LinkDraft) -> Result<links::Model> {
        self.link_repo().create(user_id, draft).await
    }

    pub async fn update_link(
        &self,
        user_id: i32,
        link_id: i32,
        draft: LinkDraft,
    ) -> Result<Option<links::Model>> {
        self.link_repo().update(user_id, link_id, draft).await
    }

    pub async fn delete_link(&self, user_id: i32, link_id: i32) -> Result<bool> {
        self.link_repo().delete(user_id, link_id).await
    }
}
