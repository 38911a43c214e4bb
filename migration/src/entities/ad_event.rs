//! Append-only impression / click log

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "ad_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub creative_id: i64,
    /// impression / click
    pub event_type: String,
    pub occurred_at: DateTimeUtc,
    pub user_agent: String,
    pub ip_address: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub referrer: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
