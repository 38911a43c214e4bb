//! 广告位 / 广告素材 / 事件表
//!
//! - ad_slots: 页面上的广告位（唯一 name）
//! - ad_creatives: 广告素材，归属于一个广告位，随广告位级联删除
//! - ad_events: 曝光与点击日志，只追加

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdSlots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdSlots::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdSlots::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AdSlots::DisplayName).string_len(200).not_null())
                    .col(
                        ColumnDef::new(AdSlots::Location)
                            .string_len(200)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(AdSlots::Width).integer().not_null())
                    .col(ColumnDef::new(AdSlots::Height).integer().not_null())
                    .col(
                        ColumnDef::new(AdSlots::IsResponsive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdSlots::MaxCreatives)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(AdSlots::RotationStrategy)
                            .string_len(20)
                            .not_null()
                            .default("priority"),
                    )
                    .col(
                        ColumnDef::new(AdSlots::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AdSlots::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdSlots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdCreatives::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdCreatives::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdCreatives::SlotId).big_integer().not_null())
                    .col(ColumnDef::new(AdCreatives::Name).string_len(200).not_null())
                    .col(
                        ColumnDef::new(AdCreatives::Provider)
                            .string_len(20)
                            .not_null()
                            .default("house"),
                    )
                    .col(
                        ColumnDef::new(AdCreatives::CreativeType)
                            .string_len(20)
                            .not_null()
                            .default("image"),
                    )
                    .col(ColumnDef::new(AdCreatives::Markup).text().not_null())
                    .col(ColumnDef::new(AdCreatives::ImageUrl).text().not_null())
                    .col(
                        ColumnDef::new(AdCreatives::ImageAlt)
                            .string_len(200)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(AdCreatives::TargetUrl).text().not_null())
                    .col(
                        ColumnDef::new(AdCreatives::StartAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdCreatives::EndAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdCreatives::Priority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AdCreatives::Weight)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(AdCreatives::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AdCreatives::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdCreatives::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_creatives_slot")
                            .from(AdCreatives::Table, AdCreatives::SlotId)
                            .to(AdSlots::Table, AdSlots::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_ad_creatives_slot_id")
                    .table(AdCreatives::Table)
                    .col(AdCreatives::SlotId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdEvents::CreativeId).big_integer().not_null())
                    .col(
                        ColumnDef::new(AdEvents::EventType)
                            .string_len(20)
                            .not_null()
                            .default("impression"),
                    )
                    .col(
                        ColumnDef::new(AdEvents::OccurredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdEvents::UserAgent)
                            .string_len(500)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(AdEvents::IpAddress).string_len(45).null())
                    .col(ColumnDef::new(AdEvents::Referrer).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_events_creative")
                            .from(AdEvents::Table, AdEvents::CreativeId)
                            .to(AdCreatives::Table, AdCreatives::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdEvents::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_ad_creatives_slot_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AdCreatives::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AdSlots::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum AdSlots {
    #[sea_orm(iden = "ad_slots")]
    Table,
    Id,
    Name,
    DisplayName,
    Location,
    Width,
    Height,
    IsResponsive,
    MaxCreatives,
    RotationStrategy,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum AdCreatives {
    #[sea_orm(iden = "ad_creatives")]
    Table,
    Id,
    SlotId,
    Name,
    Provider,
    CreativeType,
    Markup,
    ImageUrl,
    ImageAlt,
    TargetUrl,
    StartAt,
    EndAt,
    Priority,
    Weight,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum AdEvents {
    #[sea_orm(iden = "ad_events")]
    Table,
    Id,
    CreativeId,
    EventType,
    OccurredAt,
    UserAgent,
    IpAddress,
    Referrer,
}
