//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{
    creative_to_active_model, event_to_active_model, model_to_creative, model_to_slot,
    slot_to_active_model,
};
use crate::ads::{Creative, NewAdEvent, Slot};
use crate::errors::{AdslotError, Result};

use migration::entities::{ad_creative, ad_event, ad_slot};

impl SeaOrmStorage {
    pub async fn insert_slot(&self, slot: &Slot) -> Result<Slot> {
        if self.get_slot_by_name(&slot.name).await?.is_some() {
            return Err(AdslotError::conflict(format!(
                "广告位已存在: {}",
                slot.name
            )));
        }

        let mut fresh = slot.clone();
        fresh.id = 0;
        let model = slot_to_active_model(&fresh)
            .insert(&self.db)
            .await
            .map_err(|e| AdslotError::database_operation(format!("创建广告位失败: {}", e)))?;

        info!("Ad slot created: {}", model.name);
        Ok(model_to_slot(model))
    }

    pub async fn update_slot(&self, slot: &Slot) -> Result<Slot> {
        if let Some(existing) = self.get_slot_by_name(&slot.name).await?
            && existing.id != slot.id
        {
            return Err(AdslotError::conflict(format!(
                "广告位已存在: {}",
                slot.name
            )));
        }

        let mut changed = slot.clone();
        changed.updated_at = Utc::now();
        let model = slot_to_active_model(&changed)
            .update(&self.db)
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotUpdated => {
                    AdslotError::not_found(format!("广告位不存在: {}", slot.id))
                }
                other => AdslotError::database_operation(format!("更新广告位失败: {}", other)),
            })?;
        Ok(model_to_slot(model))
    }

    /// 删除广告位，连同其素材和事件（事务内完成）
    pub async fn delete_slot(&self, slot_id: i64) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AdslotError::database_operation(format!("开始事务失败: {}", e)))?;

        let creative_ids: Vec<i64> = ad_creative::Entity::find()
            .filter(ad_creative::Column::SlotId.eq(slot_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();

        if !creative_ids.is_empty() {
            ad_event::Entity::delete_many()
                .filter(ad_event::Column::CreativeId.is_in(creative_ids.iter().copied()))
                .exec(&txn)
                .await?;
            ad_creative::Entity::delete_many()
                .filter(ad_creative::Column::SlotId.eq(slot_id))
                .exec(&txn)
                .await?;
        }

        let result = ad_slot::Entity::delete_by_id(slot_id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(AdslotError::not_found(format!(
                "广告位不存在: {}",
                slot_id
            )));
        }

        txn.commit()
            .await
            .map_err(|e| AdslotError::database_operation(format!("提交事务失败: {}", e)))?;

        info!(
            "Ad slot {} deleted with {} creatives",
            slot_id,
            creative_ids.len()
        );
        Ok(())
    }

    pub async fn insert_creative(&self, creative: &Creative) -> Result<Creative> {
        let mut fresh = creative.clone();
        fresh.id = 0;
        let model = creative_to_active_model(&fresh)
            .insert(&self.db)
            .await
            .map_err(|e| AdslotError::database_operation(format!("创建素材失败: {}", e)))?;

        info!("Ad creative created: {} (slot {})", model.id, model.slot_id);
        Ok(model_to_creative(model))
    }

    pub async fn update_creative(&self, creative: &Creative) -> Result<Creative> {
        let mut changed = creative.clone();
        changed.updated_at = Utc::now();
        let model = creative_to_active_model(&changed)
            .update(&self.db)
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotUpdated => {
                    AdslotError::not_found(format!("素材不存在: {}", creative.id))
                }
                other => AdslotError::database_operation(format!("更新素材失败: {}", other)),
            })?;
        Ok(model_to_creative(model))
    }

    /// 删除素材及其事件
    pub async fn delete_creative(&self, creative_id: i64) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AdslotError::database_operation(format!("开始事务失败: {}", e)))?;

        ad_event::Entity::delete_many()
            .filter(ad_event::Column::CreativeId.eq(creative_id))
            .exec(&txn)
            .await?;

        let result = ad_creative::Entity::delete_by_id(creative_id)
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Err(AdslotError::not_found(format!(
                "素材不存在: {}",
                creative_id
            )));
        }

        txn.commit()
            .await
            .map_err(|e| AdslotError::database_operation(format!("提交事务失败: {}", e)))?;

        info!("Ad creative deleted: {}", creative_id);
        Ok(())
    }

    /// 追加一条曝光 / 点击事件
    pub async fn insert_event(&self, event: &NewAdEvent) -> Result<i64> {
        let model = event_to_active_model(event)
            .insert(&self.db)
            .await
            .map_err(|e| AdslotError::database_operation(format!("写入事件失败: {}", e)))?;
        Ok(model.id)
    }
}
