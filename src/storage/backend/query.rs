//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use tracing::trace;

use super::SeaOrmStorage;
use super::converters::{model_to_creative, model_to_event, model_to_slot};
use crate::ads::{AdEvent, AdRepository, Creative, CreativeStats, EventType, Slot};
use crate::errors::{AdslotError, Result};

use migration::entities::{ad_creative, ad_event, ad_slot};

impl SeaOrmStorage {
    pub async fn list_slots(&self) -> Result<Vec<Slot>> {
        let models = ad_slot::Entity::find()
            .order_by_asc(ad_slot::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| AdslotError::database_operation(format!("查询广告位失败: {}", e)))?;
        Ok(models.into_iter().map(model_to_slot).collect())
    }

    pub async fn get_slot_by_name(&self, name: &str) -> Result<Option<Slot>> {
        let model = ad_slot::Entity::find()
            .filter(ad_slot::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| AdslotError::database_operation(format!("查询广告位失败: {}", e)))?;
        Ok(model.map(model_to_slot))
    }

    pub async fn get_slot_by_id(&self, id: i64) -> Result<Option<Slot>> {
        let model = ad_slot::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AdslotError::database_operation(format!("查询广告位失败: {}", e)))?;
        Ok(model.map(model_to_slot))
    }

    /// 广告位下的全部素材，按优先级、权重倒序
    pub async fn list_creatives_for_slot(&self, slot_id: i64) -> Result<Vec<Creative>> {
        let models = ad_creative::Entity::find()
            .filter(ad_creative::Column::SlotId.eq(slot_id))
            .order_by_desc(ad_creative::Column::Priority)
            .order_by_desc(ad_creative::Column::Weight)
            .order_by_asc(ad_creative::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AdslotError::database_operation(format!("查询素材失败: {}", e)))?;
        Ok(models.into_iter().map(model_to_creative).collect())
    }

    pub async fn get_creative(&self, id: i64) -> Result<Option<Creative>> {
        let model = ad_creative::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AdslotError::database_operation(format!("查询素材失败: {}", e)))?;
        Ok(model.map(model_to_creative))
    }

    /// 曝光 / 点击计数
    pub async fn creative_stats(&self, creative_id: i64) -> Result<CreativeStats> {
        let impressions = self
            .count_events(creative_id, EventType::Impression)
            .await?;
        let clicks = self.count_events(creative_id, EventType::Click).await?;
        Ok(CreativeStats {
            impressions,
            clicks,
        })
    }

    pub async fn count_events(&self, creative_id: i64, event_type: EventType) -> Result<u64> {
        ad_event::Entity::find()
            .filter(ad_event::Column::CreativeId.eq(creative_id))
            .filter(ad_event::Column::EventType.eq(event_type.as_ref()))
            .count(&self.db)
            .await
            .map_err(|e| AdslotError::database_operation(format!("统计事件失败: {}", e)))
    }

    /// 最近的事件，新的在前
    pub async fn recent_events(&self, creative_id: i64, limit: u64) -> Result<Vec<AdEvent>> {
        use sea_orm::QuerySelect;

        let models = ad_event::Entity::find()
            .filter(ad_event::Column::CreativeId.eq(creative_id))
            .order_by_desc(ad_event::Column::OccurredAt)
            .order_by_desc(ad_event::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| AdslotError::database_operation(format!("查询事件失败: {}", e)))?;
        Ok(models.into_iter().map(model_to_event).collect())
    }
}

#[async_trait]
impl AdRepository for SeaOrmStorage {
    async fn find_active_slot(&self, name: &str) -> Result<Option<Slot>> {
        let slot = self.get_slot_by_name(name).await?;
        trace!("find_active_slot({}) -> {:?}", name, slot.as_ref().map(|s| s.id));
        Ok(slot.filter(|s| s.is_active))
    }

    async fn creatives_for_slot(&self, slot_id: i64) -> Result<Vec<Creative>> {
        self.list_creatives_for_slot(slot_id).await
    }
}
