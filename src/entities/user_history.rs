use sea_orm::entity::prelude::*;
use serde::Serialize;

/// One summarized generation request. Rows are append-only.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "user_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Username of the owner. Not a foreign key.
    pub user_id: String,

    pub user_preferences: String,

    /// RFC 3339, UTC, fixed microsecond precision so text order is time order.
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
