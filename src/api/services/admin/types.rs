//! Admin API 类型定义

use serde::{Deserialize, Serialize};

use crate::ads::{Creative, CreativeStats, Slot};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

/// 广告位详情，附带素材数量
#[derive(Serialize, Clone, Debug)]
pub struct SlotResponse {
    #[serde(flatten)]
    pub slot: Slot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creative_count: Option<usize>,
}

impl From<Slot> for SlotResponse {
    fn from(slot: Slot) -> Self {
        Self {
            slot,
            creative_count: None,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct CreativeStatsResponse {
    pub creative_id: i64,
    pub name: String,
    #[serde(flatten)]
    pub stats: CreativeStats,
    /// clicks / impressions；没有曝光时为 0
    pub ctr: f64,
}

impl CreativeStatsResponse {
    pub fn new(creative: &Creative, stats: CreativeStats) -> Self {
        let ctr = if stats.impressions == 0 {
            0.0
        } else {
            stats.clicks as f64 / stats.impressions as f64
        };
        Self {
            creative_id: creative.id,
            name: creative.name.clone(),
            stats,
            ctr,
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct PreviewResponse {
    pub slot: String,
    pub html: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct SeedResponse {
    pub seeded: usize,
}
