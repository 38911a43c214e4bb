//! 事件表索引：按素材 + 类型 + 时间统计曝光 / 点击

use sea_orm_migration::prelude::*;

use crate::m20261001_000001_ad_tables::AdEvents;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ad_events_creative_type_time")
                    .table(AdEvents::Table)
                    .col(AdEvents::CreativeId)
                    .col(AdEvents::EventType)
                    .col(AdEvents::OccurredAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_ad_events_creative_type_time")
                    .to_owned(),
            )
            .await
    }
}
