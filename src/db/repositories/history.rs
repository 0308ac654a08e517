use anyhow::{Context, Result};
use chrono::SecondsFormat;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{prelude::*, user_history};

pub type HistoryRecord = user_history::Model;

pub struct HistoryRepository {
    conn: DatabaseConnection,
}

impl HistoryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Most recent records for a user, newest first.
    pub async fn recent(&self, user_id: &str, limit: u64) -> Result<Vec<HistoryRecord>> {
        UserHistory::find()
            .filter(user_history::Column::UserId.eq(user_id))
            .order_by_desc(user_history::Column::CreatedAt)
            .order_by_desc(user_history::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to query user history")
    }

    /// Preference text of the most recent records, newest first.
    pub async fn recent_preferences(&self, user_id: &str, limit: u64) -> Result<Vec<String>> {
        let rows: Vec<String> = UserHistory::find()
            .select_only()
            .column(user_history::Column::UserPreferences)
            .filter(user_history::Column::UserId.eq(user_id))
            .order_by_desc(user_history::Column::CreatedAt)
            .order_by_desc(user_history::Column::Id)
            .limit(limit)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to query user preferences")?;

        Ok(rows)
    }

    pub async fn add(&self, user_id: &str, preferences: &str) -> Result<i64> {
        let active_model = user_history::ActiveModel {
            user_id: Set(user_id.to_string()),
            user_preferences: Set(preferences.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
            ..Default::default()
        };

        let result = UserHistory::insert(active_model)
            .exec(&self.conn)
            .await
            .context("Failed to insert user history")?;

        Ok(result.last_insert_id)
    }

    pub async fn count_for_user(&self, user_id: &str) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        UserHistory::find()
            .filter(user_history::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await
            .context("Failed to count user history")
    }
}
