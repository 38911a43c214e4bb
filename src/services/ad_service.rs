//! Ad management service
//!
//! Slot / creative CRUD shared by the admin API and the CLI seeder.
//! Every write that can change a slot's rendering invalidates the
//! resolver cache for that slot.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::info;

use crate::ads::{
    AdResolver, Creative, CreativeStats, CreativeType, EventType, NewAdEvent, ProviderKind,
    RotationStrategy, Slot,
};
use crate::errors::{AdslotError, Result};
use crate::storage::SeaOrmStorage;
use crate::utils::truncate_chars;

pub const USER_AGENT_MAX_CHARS: usize = 500;
pub const REFERRER_MAX_CHARS: usize = 200;

// ============ Request DTOs ============

/// Create / replace a slot
#[derive(Debug, Clone, Deserialize)]
pub struct SlotPayload {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub location: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub is_responsive: bool,
    #[serde(default = "default_max_creatives")]
    pub max_creatives: u32,
    #[serde(default)]
    pub rotation_strategy: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Create / replace a creative; `slot` is the owning slot's name
#[derive(Debug, Clone, Deserialize)]
pub struct CreativePayload {
    pub slot: String,
    pub name: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub creative_type: Option<String>,
    #[serde(default)]
    pub markup: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_alt: String,
    #[serde(default)]
    pub target_url: String,
    #[serde(default)]
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_max_creatives() -> u32 {
    1
}

fn default_weight() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl SlotPayload {
    fn into_slot(self, id: i64, created_at: DateTime<Utc>) -> Result<Slot> {
        let rotation_strategy = match self.rotation_strategy.as_deref() {
            None | Some("") => RotationStrategy::Priority,
            Some(s) => s.parse().map_err(AdslotError::validation)?,
        };
        let display_name = if self.display_name.trim().is_empty() {
            self.name.clone()
        } else {
            self.display_name
        };
        let slot = Slot {
            id,
            name: self.name.trim().to_string(),
            display_name,
            location: self.location,
            width: self.width,
            height: self.height,
            is_responsive: self.is_responsive,
            max_creatives: self.max_creatives,
            rotation_strategy,
            is_active: self.is_active,
            created_at,
            updated_at: Utc::now(),
        };
        slot.validate()?;
        Ok(slot)
    }
}

impl CreativePayload {
    fn into_creative(self, id: i64, slot_id: i64, created_at: DateTime<Utc>) -> Result<Creative> {
        let provider = match self.provider.as_deref() {
            None | Some("") => ProviderKind::House,
            Some(s) => s.parse().map_err(AdslotError::validation)?,
        };
        let creative_type = match self.creative_type.as_deref() {
            None | Some("") => CreativeType::Image,
            Some(s) => s.parse().map_err(AdslotError::validation)?,
        };
        let creative = Creative {
            id,
            slot_id,
            name: self.name.trim().to_string(),
            provider,
            creative_type,
            markup: self.markup,
            image_url: self.image_url.trim().to_string(),
            image_alt: self.image_alt,
            target_url: self.target_url.trim().to_string(),
            start_at: self.start_at.unwrap_or_else(Utc::now),
            end_at: self.end_at,
            priority: self.priority,
            weight: self.weight,
            is_active: self.is_active,
            created_at,
            updated_at: Utc::now(),
        };
        creative.validate()?;
        Ok(creative)
    }
}

// ============ AdService Implementation ============

pub struct AdService {
    storage: Arc<SeaOrmStorage>,
    resolver: Arc<AdResolver>,
}

impl AdService {
    pub fn new(storage: Arc<SeaOrmStorage>, resolver: Arc<AdResolver>) -> Self {
        Self { storage, resolver }
    }

    async fn invalidate(&self, slot_name: &str) {
        self.resolver.invalidate_slot(slot_name, Utc::now()).await;
    }

    // ============ Slots ============

    pub async fn list_slots(&self) -> Result<Vec<Slot>> {
        self.storage.list_slots().await
    }

    pub async fn get_slot(&self, name: &str) -> Result<Slot> {
        self.storage
            .get_slot_by_name(name)
            .await?
            .ok_or_else(|| AdslotError::not_found(format!("Slot '{}' not found", name)))
    }

    pub async fn create_slot(&self, payload: SlotPayload) -> Result<Slot> {
        let slot = payload.into_slot(0, Utc::now())?;
        let created = self.storage.insert_slot(&slot).await?;
        info!("AdService: created slot '{}'", created.name);
        Ok(created)
    }

    pub async fn update_slot(&self, name: &str, payload: SlotPayload) -> Result<Slot> {
        let existing = self.get_slot(name).await?;
        let slot = payload.into_slot(existing.id, existing.created_at)?;
        let updated = self.storage.update_slot(&slot).await?;

        self.invalidate(&existing.name).await;
        if updated.name != existing.name {
            self.invalidate(&updated.name).await;
        }
        info!("AdService: updated slot '{}'", updated.name);
        Ok(updated)
    }

    pub async fn delete_slot(&self, name: &str) -> Result<()> {
        let existing = self.get_slot(name).await?;
        self.storage.delete_slot(existing.id).await?;
        self.invalidate(&existing.name).await;
        info!("AdService: deleted slot '{}'", existing.name);
        Ok(())
    }

    // ============ Creatives ============

    pub async fn list_creatives(&self, slot_name: &str) -> Result<Vec<Creative>> {
        let slot = self.get_slot(slot_name).await?;
        self.storage.list_creatives_for_slot(slot.id).await
    }

    pub async fn get_creative(&self, id: i64) -> Result<Creative> {
        self.storage
            .get_creative(id)
            .await?
            .ok_or_else(|| AdslotError::not_found(format!("Creative {} not found", id)))
    }

    pub async fn create_creative(&self, payload: CreativePayload) -> Result<Creative> {
        let slot = self.get_slot(&payload.slot).await?;
        let creative = payload.into_creative(0, slot.id, Utc::now())?;
        let created = self.storage.insert_creative(&creative).await?;
        self.invalidate(&slot.name).await;
        info!(
            "AdService: created creative {} in slot '{}'",
            created.id, slot.name
        );
        Ok(created)
    }

    pub async fn update_creative(&self, id: i64, payload: CreativePayload) -> Result<Creative> {
        let existing = self.get_creative(id).await?;
        let old_slot = self.storage.get_slot_by_id(existing.slot_id).await?;
        let new_slot = self.get_slot(&payload.slot).await?;

        let creative = payload.into_creative(id, new_slot.id, existing.created_at)?;
        let updated = self.storage.update_creative(&creative).await?;

        self.invalidate(&new_slot.name).await;
        if let Some(old) = old_slot
            && old.id != new_slot.id
        {
            self.invalidate(&old.name).await;
        }
        info!("AdService: updated creative {}", id);
        Ok(updated)
    }

    pub async fn delete_creative(&self, id: i64) -> Result<()> {
        let existing = self.get_creative(id).await?;
        let slot = self.storage.get_slot_by_id(existing.slot_id).await?;
        self.storage.delete_creative(id).await?;
        if let Some(slot) = slot {
            self.invalidate(&slot.name).await;
        }
        info!("AdService: deleted creative {}", id);
        Ok(())
    }

    pub async fn creative_stats(&self, id: i64) -> Result<CreativeStats> {
        self.get_creative(id).await?;
        self.storage.creative_stats(id).await
    }

    // ============ Tracking / preview ============

    /// 记录一次曝光或点击；素材不存在时返回 NotFound
    pub async fn record_event(
        &self,
        creative_id: i64,
        event_type: EventType,
        user_agent: &str,
        ip_address: Option<String>,
        referrer: &str,
    ) -> Result<i64> {
        if self.storage.get_creative(creative_id).await?.is_none() {
            return Err(AdslotError::not_found(format!(
                "Creative {} not found",
                creative_id
            )));
        }

        let event = NewAdEvent {
            creative_id,
            event_type,
            occurred_at: Utc::now(),
            user_agent: truncate_chars(user_agent, USER_AGENT_MAX_CHARS),
            ip_address,
            referrer: truncate_chars(referrer, REFERRER_MAX_CHARS),
        };
        self.storage.insert_event(&event).await
    }

    pub async fn preview(&self, slot_name: &str) -> Result<String> {
        self.get_slot(slot_name).await?;
        Ok(self.resolver.get_or_resolve(slot_name, Utc::now()).await)
    }

    /// Creative schedule helper for callers that only know a duration.
    pub fn schedule_from_now(days: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let now = Utc::now();
        (now, now + Duration::days(days))
    }
}
