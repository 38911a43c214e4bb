//! Ad creative entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "ad_creatives")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub slot_id: i64,
    pub name: String,
    /// adsense / direct / house / sponsor
    pub provider: String,
    /// image / html / text
    pub creative_type: String,
    #[sea_orm(column_type = "Text")]
    pub markup: String,
    #[sea_orm(column_type = "Text")]
    pub image_url: String,
    pub image_alt: String,
    #[sea_orm(column_type = "Text")]
    pub target_url: String,
    pub start_at: DateTimeUtc,
    pub end_at: DateTimeUtc,
    pub priority: i32,
    pub weight: i32,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
