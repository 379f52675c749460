use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::entities::{links, prelude::*};
use crate::models::link::LinkDraft;

/// Per-user link collection. Every operation is keyed by the owning user so
/// one user can never address another's links.
pub struct LinkRepository {
    conn: DatabaseConnection,
}

impl LinkRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// All links for a user in insertion order (ascending id).
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<links::Model>> {
        let links = Links::find()
            .filter(links::Column::UserId.eq(user_id))
            .order_by_asc(links::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list links")?;

        Ok(links)
    }

    pub async fn get(&self, user_id: i32, link_id: i32) -> Result<Option<links::Model>> {
        let link = Links::find_by_id(link_id)
            .filter(links::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("Failed to query link")?;

        Ok(link)
    }

    /// Append a link to the user's collection. Duplicates by url or text are
    /// allowed; only the id is unique.
    pub async fn create(&self, user_id: i32, draft: LinkDraft) -> Result<links::Model> {
        let inserted = Links::insert(links::ActiveModel {
            user_id: Set(user_id),
            url: Set(draft.url),
            platform: Set(draft.platform.as_str().to_string()),
            text: Set(draft.text),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        })
        .exec(&self.conn)
        .await
        .context("Failed to insert link")?;

        let link = Links::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await
            .context("Failed to load created link")?
            .ok_or_else(|| anyhow::anyhow!("Created link vanished"))?;

        Ok(link)
    }

    /// Replace all mutable fields of a link. Partial updates are not
    /// supported. Returns `None` when `(user_id, link_id)` does not match.
    pub async fn update(
        &self,
        user_id: i32,
        link_id: i32,
        draft: LinkDraft,
    ) -> Result<Option<links::Model>> {
        let txn = self.conn.begin().await?;

        let Some(existing) = Links::find_by_id(link_id)
            .filter(links::Column::UserId.eq(user_id))
            .one(&txn)
            .await
            .context("Failed to query link for update")?
        else {
            txn.rollback().await?;
            return Ok(None);
        };

        let mut active: links::ActiveModel = existing.into();
        active.url = Set(draft.url);
        active.platform = Set(draft.platform.as_str().to_string());
        active.text = Set(draft.text);

        let updated = active
            .update(&txn)
            .await
            .context("Failed to update link")?;

        txn.commit().await?;
        Ok(Some(updated))
    }

    /// Remove a link. Returns `false` when `(user_id, link_id)` does not
    /// match, including when the link was already deleted.
    pub async fn delete(&self, user_id: i32, link_id: i32) -> Result<bool> {
        let result = Links::delete_many()
            .filter(links::Column::Id.eq(link_id))
            .filter(links::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete link")?;

        Ok(result.rows_affected > 0)
    }
}
