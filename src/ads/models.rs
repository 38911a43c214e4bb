use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

use crate::errors::{AdslotError, Result};
use crate::utils::url_validator::validate_target_url;

/// 广告位轮播策略
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RotationStrategy {
    /// First element of the priority-ordered pool
    #[default]
    Priority,
    /// Probability proportional to weight
    Weighted,
    /// Uniform choice
    Random,
    /// Deterministic per time bucket
    Sequential,
    /// Stored value we do not recognise; behaves like `Priority`
    #[serde(other)]
    Unknown,
}

impl RotationStrategy {
    /// 从存储中读取时使用，不认识的值落到 `Unknown`
    pub fn from_stored(s: &str) -> Self {
        s.parse().unwrap_or(Self::Unknown)
    }
}

impl std::fmt::Display for RotationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl std::str::FromStr for RotationStrategy {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "priority" => Ok(Self::Priority),
            "weighted" => Ok(Self::Weighted),
            "random" => Ok(Self::Random),
            "sequential" => Ok(Self::Sequential),
            _ => Err(format!(
                "Invalid rotation strategy: '{}'. Valid: priority, weighted, random, sequential",
                s
            )),
        }
    }
}

/// 素材来源，决定渲染方式
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    /// Third-party script block (e.g. AdSense), rendered verbatim
    Adsense,
    /// Direct-sold image with click-through
    Direct,
    /// Internally authored
    #[default]
    House,
    /// Sponsor image with a visible label
    Sponsor,
}

impl ProviderKind {
    /// Unknown providers render as house ads.
    pub fn from_stored(s: &str) -> Self {
        s.parse().unwrap_or(Self::House)
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "adsense" => Ok(Self::Adsense),
            "direct" => Ok(Self::Direct),
            "house" => Ok(Self::House),
            "sponsor" => Ok(Self::Sponsor),
            _ => Err(format!(
                "Invalid provider: '{}'. Valid: adsense, direct, house, sponsor",
                s
            )),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CreativeType {
    #[default]
    Image,
    Html,
    Text,
}

impl CreativeType {
    pub fn from_stored(s: &str) -> Self {
        s.parse().unwrap_or(Self::Image)
    }
}

impl std::fmt::Display for CreativeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl std::str::FromStr for CreativeType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "html" => Ok(Self::Html),
            "text" => Ok(Self::Text),
            _ => Err(format!(
                "Invalid creative type: '{}'. Valid: image, html, text",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventType {
    Impression,
    Click,
}

impl std::str::FromStr for EventType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "impression" => Ok(Self::Impression),
            "click" => Ok(Self::Click),
            _ => Err(format!("Invalid event type: '{}'", s)),
        }
    }
}

/// 整数列按 i32 落库，超出范围的值在写入前拒绝
pub const MAX_STORED_INT: u32 = i32::MAX as u32;

fn check_column_range(field: &str, value: u32) -> Result<()> {
    if value > MAX_STORED_INT {
        return Err(AdslotError::validation(format!(
            "{} must be at most {}",
            field, MAX_STORED_INT
        )));
    }
    Ok(())
}

/// 页面上的广告位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub location: String,
    pub width: u32,
    pub height: u32,
    pub is_responsive: bool,
    pub max_creatives: u32,
    pub rotation_strategy: RotationStrategy,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Slot {
    pub fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AdslotError::validation("Slot name cannot be empty"));
        }
        if name.len() > 100 {
            return Err(AdslotError::validation(
                "Slot name must be at most 100 characters",
            ));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(AdslotError::validation(format!(
                "Slot name '{}' may only contain letters, digits, '-' and '_'",
                name
            )));
        }
        if self.max_creatives < 1 {
            return Err(AdslotError::validation("max_creatives must be at least 1"));
        }
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("max_creatives", self.max_creatives),
        ] {
            check_column_range(field, value)?;
        }
        if self.rotation_strategy == RotationStrategy::Unknown {
            return Err(AdslotError::validation("Unknown rotation strategy"));
        }
        Ok(())
    }
}

/// 广告素材
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creative {
    pub id: i64,
    pub slot_id: i64,
    pub name: String,
    pub provider: ProviderKind,
    pub creative_type: CreativeType,
    /// Operator-authored HTML/JS, trusted and never escaped
    pub markup: String,
    /// Empty when the creative has no image
    pub image_url: String,
    pub image_alt: String,
    /// Empty when there is no click-through
    pub target_url: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub priority: i32,
    pub weight: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Creative {
    pub fn has_image(&self) -> bool {
        !self.image_url.trim().is_empty()
    }

    pub fn has_markup(&self) -> bool {
        !self.markup.trim().is_empty()
    }

    /// Whether `now` falls inside the schedule, both ends inclusive.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.start_at <= now && now <= self.end_at
    }

    /// 写入前校验，校验失败的素材不会进入解析流程
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AdslotError::validation("Creative name cannot be empty"));
        }
        if self.creative_type == CreativeType::Image && !self.has_image() {
            return Err(AdslotError::validation(
                "Image is required for image-type creatives.",
            ));
        }
        if self.creative_type == CreativeType::Html && !self.has_markup() {
            return Err(AdslotError::validation(
                "Markup is required for HTML-type creatives.",
            ));
        }
        if self.end_at <= self.start_at {
            return Err(AdslotError::validation("End date must be after start date."));
        }
        check_column_range("weight", self.weight)?;
        if !self.target_url.trim().is_empty() {
            validate_target_url(&self.target_url)
                .map_err(|e| AdslotError::validation(format!("target_url: {}", e)))?;
        }
        if self.has_image() {
            validate_target_url(&self.image_url)
                .map_err(|e| AdslotError::validation(format!("image_url: {}", e)))?;
        }
        Ok(())
    }
}

/// 已落库的曝光 / 点击事件
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdEvent {
    pub id: i64,
    pub creative_id: i64,
    pub event_type: EventType,
    pub occurred_at: DateTime<Utc>,
    pub user_agent: String,
    pub ip_address: Option<String>,
    pub referrer: String,
}

#[derive(Debug, Clone)]
pub struct NewAdEvent {
    pub creative_id: i64,
    pub event_type: EventType,
    pub occurred_at: DateTime<Utc>,
    pub user_agent: String,
    pub ip_address: Option<String>,
    pub referrer: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CreativeStats {
    pub impressions: u64,
    pub clicks: u64,
}
