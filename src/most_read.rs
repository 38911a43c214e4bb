//! Most-read popularity tracker
//!
//! 三个滑动窗口，各自一个有序集合：
//!   mostread:3h   trending
//!   mostread:24h  today
//!   mostread:7d   this week
//!
//! 去重 key `viewed:{card_id}:{fingerprint}`，90 秒内同一指纹只计一次。
//! 所有存储错误只记录日志，不影响页面。

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use xxhash_rust::xxh64::xxh64;

use crate::cache::KvStore;
use crate::config::MostReadConfig;
use crate::errors::{AdslotError, Result};

pub const MAX_COUNT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    Trending,
    Today,
    Week,
}

impl Window {
    pub const ALL: [Window; 3] = [Window::Trending, Window::Today, Window::Week];

    pub fn as_str(&self) -> &'static str {
        match self {
            Window::Trending => "3h",
            Window::Today => "24h",
            Window::Week => "7d",
        }
    }

    pub fn ttl(&self) -> Duration {
        match self {
            Window::Trending => Duration::from_secs(3 * 3600),
            Window::Today => Duration::from_secs(24 * 3600),
            Window::Week => Duration::from_secs(7 * 24 * 3600),
        }
    }

    fn set_key(&self) -> String {
        format!("mostread:{}", self.as_str())
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Window {
    type Err = AdslotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "3h" => Ok(Window::Trending),
            "24h" => Ok(Window::Today),
            "7d" => Ok(Window::Week),
            other => Err(AdslotError::validation(format!(
                "Unknown most-read window '{}'. Valid: 3h, 24h, 7d",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCard {
    pub card_id: i64,
    pub score: f64,
}

/// 编辑推荐的种子数据
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeedCard {
    pub id: i64,
    #[serde(default)]
    pub featured: bool,
}

/// 由 IP + UA 生成的短指纹（12 位十六进制）
pub fn fingerprint(ip: &str, user_agent: &str) -> String {
    let hash = xxh64(format!("{}:{}", ip, user_agent).as_bytes(), 0);
    format!("{:016x}", hash)[..12].to_string()
}

pub struct MostReadTracker {
    cache: Arc<dyn KvStore>,
    config: MostReadConfig,
}

impl MostReadTracker {
    pub fn new(cache: Arc<dyn KvStore>, config: MostReadConfig) -> Self {
        Self { cache, config }
    }

    /// Count one view of `card_id` in every window.
    ///
    /// Returns `false` when the view was de-duplicated or the store failed.
    pub async fn record_view(&self, card_id: i64, ip: &str, user_agent: &str) -> bool {
        let dedup_key = format!("viewed:{}:{}", card_id, fingerprint(ip, user_agent));
        let dedup_ttl = Duration::from_secs(self.config.dedup_ttl_secs.max(1));

        match self.cache.set_if_absent(&dedup_key, "1", dedup_ttl).await {
            Ok(true) => {}
            Ok(false) => {
                debug!("Duplicate view skipped: {}", dedup_key);
                return false;
            }
            Err(e) => {
                error!("Failed to record view for card {}: {}", card_id, e);
                return false;
            }
        }

        let member = card_id.to_string();
        for window in Window::ALL {
            if let Err(e) = self
                .cache
                .zincr(&window.set_key(), &member, 1.0, window.ttl())
                .await
            {
                error!(
                    "Failed to increment {} for card {}: {}",
                    window.set_key(),
                    card_id,
                    e
                );
                return false;
            }
        }
        true
    }

    /// Top `count` cards for the window, highest score first.
    ///
    /// An unknown window is a caller error; everything else degrades to an
    /// empty list.
    pub async fn most_read(&self, window: &str, count: usize) -> Result<Vec<RankedCard>> {
        let window: Window = window.parse()?;
        let count = count.clamp(1, MAX_COUNT);
        let cache_key = format!("most_read:{}:{}", window, count);

        match self.cache.get(&cache_key).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<RankedCard>>(&raw) {
                Ok(cards) => return Ok(cards),
                Err(e) => warn!("Discarding unreadable most-read cache {}: {}", cache_key, e),
            },
            Ok(None) => {}
            Err(e) => warn!("Most-read cache read failed for {}: {}", cache_key, e),
        }

        let ranked = match self.cache.ztop(&window.set_key(), count).await {
            Ok(ranked) => ranked,
            Err(e) => {
                error!("Failed to fetch most read for window {}: {}", window, e);
                return Ok(Vec::new());
            }
        };

        let cards: Vec<RankedCard> = ranked
            .into_iter()
            .filter_map(|(member, score)| {
                member
                    .parse::<i64>()
                    .ok()
                    .map(|card_id| RankedCard { card_id, score })
            })
            .collect();

        // 空结果不缓存，新数据进来后立刻可见
        if cards.is_empty() {
            return Ok(cards);
        }

        match serde_json::to_string(&cards) {
            Ok(raw) => {
                let ttl = Duration::from_secs(self.config.result_cache_secs.max(1));
                if let Err(e) = self.cache.set(&cache_key, &raw, ttl).await {
                    warn!("Most-read cache write failed for {}: {}", cache_key, e);
                }
            }
            Err(e) => warn!("Failed to serialize most-read result: {}", e),
        }
        Ok(cards)
    }

    /// 编辑推荐：越靠前分数越高，featured 额外 +50
    pub async fn seed(&self, cards: &[SeedCard]) -> Result<()> {
        let len = cards.len();
        for (i, card) in cards.iter().enumerate() {
            let mut score = ((len - i) * 10) as f64;
            if card.featured {
                score += 50.0;
            }
            let member = card.id.to_string();
            for window in Window::ALL {
                self.cache
                    .zadd(&window.set_key(), &member, score, window.ttl())
                    .await?;
            }
        }
        info!("Seeded most read with {} cards", len);
        Ok(())
    }
}
