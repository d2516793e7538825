use anyhow::{Context, Result};
use chrono::Local;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use super::entities::{history, users};

pub struct Repo {
    db: DatabaseConnection,
}

impl Repo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn ping(&self) -> Result<()> {
        self.db.ping().await.context("Database ping failed")
    }

    // ==================== Users ====================

    /// Create or update a user (atomic upsert).
    /// On conflict: only updates username, preserves created_at.
    pub async fn ensure_user(&self, user_id: i64, username: Option<String>) -> Result<users::Model> {
        let now = Local::now().naive_local();

        let new_user = users::ActiveModel {
            id: Set(user_id),
            username: Set(username),
            created_at: Set(now),
        };

        // INSERT ... ON CONFLICT(id) DO UPDATE SET username = excluded.username
        users::Entity::insert(new_user)
            .on_conflict(
                OnConflict::column(users::Column::Id)
                    .update_column(users::Column::Username)
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .context("Failed to upsert user")?;

        // Fetch the result (exec_with_returning is not available for SQLite with ON CONFLICT)
        users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("Failed to fetch upserted user")?
            .ok_or_else(|| anyhow::anyhow!("User {} not found after upsert", user_id))
    }

    #[allow(dead_code)]
    pub async fn get_user(&self, user_id: i64) -> Result<Option<users::Model>> {
        users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("Failed to get user")
    }

    // ==================== History ====================

    /// Append one completed-search record for a user.
    /// The user row is created first if this is their first search.
    pub async fn append_history(
        &self,
        user_id: i64,
        username: Option<String>,
        command: &str,
        value: String,
    ) -> Result<history::Model> {
        let user = self.ensure_user(user_id, username).await?;

        let record = history::ActiveModel {
            user_id: Set(user.id),
            command: Set(command.to_string()),
            value: Set(value),
            created_at: Set(Local::now().naive_local()),
            ..Default::default()
        };

        record
            .insert(&self.db)
            .await
            .context("Failed to insert history record")
    }

    /// All history records of a user, oldest first.
    pub async fn list_history(&self, user_id: i64) -> Result<Vec<history::Model>> {
        history::Entity::find()
            .filter(history::Column::UserId.eq(user_id))
            .order_by_asc(history::Column::CreatedAt)
            .order_by_asc(history::Column::Id)
            .all(&self.db)
            .await
            .context("Failed to list history")
    }

    /// Delete all history records of a user. Returns the number of rows
    /// removed; deleting an empty history succeeds with 0.
    pub async fn delete_history(&self, user_id: i64) -> Result<u64> {
        let result = history::Entity::delete_many()
            .filter(history::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("Failed to delete history")?;

        Ok(result.rows_affected)
    }
}
