//! Resolution cache
//!
//! 渲染结果按 `ad_slot:{name}:{bucket}` 缓存，bucket = floor(now / window)。
//! 任何存储错误都只记录日志，调用方拿到的最坏结果是空字符串。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error, trace, warn};

use super::eligibility::eligible;
use super::models::{Creative, Slot};
use super::render::render;
use super::rotation::select_with;
use crate::cache::KvStore;
use crate::config::AdsConfig;
use crate::errors::Result;

/// 模板渲染时的请求上下文；目前不参与选择
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub path: String,
    pub user_agent: String,
}

/// Read side of the creative store needed for resolution.
#[async_trait]
pub trait AdRepository: Send + Sync {
    /// Active slot by name; inactive or missing slots yield `None`.
    async fn find_active_slot(&self, name: &str) -> Result<Option<Slot>>;

    /// All creatives owned by the slot, in no particular order.
    async fn creatives_for_slot(&self, slot_id: i64) -> Result<Vec<Creative>>;
}

pub struct AdResolver {
    repo: Arc<dyn AdRepository>,
    cache: Arc<dyn KvStore>,
    config: AdsConfig,
}

impl AdResolver {
    pub fn new(repo: Arc<dyn AdRepository>, cache: Arc<dyn KvStore>, config: AdsConfig) -> Self {
        Self {
            repo,
            cache,
            config,
        }
    }

    pub fn bucket(&self, now: DateTime<Utc>) -> i64 {
        let window = self.config.cache_window_secs.max(1) as i64;
        now.timestamp().div_euclid(window)
    }

    pub fn cache_key(slot_name: &str, bucket: i64) -> String {
        format!("ad_slot:{}:{}", slot_name, bucket)
    }

    /// Template-tag entry point.
    pub async fn render_ad_slot(&self, slot_name: &str, ctx: &RenderContext) -> String {
        trace!(
            "render_ad_slot {} (path={}, ua_len={})",
            slot_name,
            ctx.path,
            ctx.user_agent.len()
        );
        self.get_or_resolve(slot_name, Utc::now()).await
    }

    /// 命中直接返回；未命中则解析、写缓存。永不返回错误。
    pub async fn get_or_resolve(&self, slot_name: &str, now: DateTime<Utc>) -> String {
        let key = Self::cache_key(slot_name, self.bucket(now));

        match self.cache.get(&key).await {
            Ok(Some(html)) => {
                trace!("Ad cache hit: {}", key);
                return html;
            }
            Ok(None) => {}
            Err(e) => warn!("Ad cache read failed for {}, resolving directly: {}", key, e),
        }

        let html = match self.resolve(slot_name, now).await {
            Ok(Some(html)) => html,
            // 广告位不存在或未启用：不缓存，避免新建广告位后要等一个窗口
            Ok(None) => return String::new(),
            Err(e) => {
                error!("Failed to resolve ad slot '{}': {}", slot_name, e);
                return String::new();
            }
        };

        let ttl = Duration::from_secs(self.config.cache_window_secs.max(1));
        if let Err(e) = self.cache.set(&key, &html, ttl).await {
            warn!("Ad cache write failed for {}: {}", key, e);
        }
        html
    }

    async fn resolve(&self, slot_name: &str, now: DateTime<Utc>) -> Result<Option<String>> {
        let Some(slot) = self.repo.find_active_slot(slot_name).await? else {
            debug!("Ad slot '{}' not found or inactive", slot_name);
            return Ok(None);
        };
        let creatives = self.repo.creatives_for_slot(slot.id).await?;
        let pool = eligible(&slot, &creatives, now);
        let picked = select_with(
            &pool,
            slot.rotation_strategy,
            now,
            self.config.rotation_bucket_secs,
            &mut |upper| rand::random_range(0..upper),
        );

        let html = match picked {
            Some(creative) => {
                debug!(
                    "Ad slot '{}' -> creative {} ({}, pool {})",
                    slot.name,
                    creative.id,
                    slot.rotation_strategy,
                    pool.len()
                );
                render(creative, &slot)
            }
            None => String::new(),
        };
        Ok(Some(html))
    }

    /// Drop the cached fragment for the current bucket and the configured
    /// number of preceding buckets.
    pub async fn invalidate_slot(&self, slot_name: &str, now: DateTime<Utc>) {
        let current = self.bucket(now);
        for offset in 0..=i64::from(self.config.invalidation_lookback) {
            let key = Self::cache_key(slot_name, current - offset);
            if let Err(e) = self.cache.delete(&key).await {
                warn!("Failed to invalidate {}: {}", key, e);
            }
        }
        debug!("Invalidated cached fragments for ad slot '{}'", slot_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MokaKvStore;
    use chrono::TimeZone;

    struct NoSlots;

    #[async_trait]
    impl AdRepository for NoSlots {
        async fn find_active_slot(&self, _name: &str) -> Result<Option<Slot>> {
            Ok(None)
        }

        async fn creatives_for_slot(&self, _slot_id: i64) -> Result<Vec<Creative>> {
            Ok(Vec::new())
        }
    }

    fn resolver() -> AdResolver {
        AdResolver::new(
            Arc::new(NoSlots),
            Arc::new(MokaKvStore::default()),
            AdsConfig::default(),
        )
    }

    #[test]
    fn test_bucket_is_five_minutes() {
        let r = resolver();
        let t = |s| Utc.timestamp_opt(s, 0).unwrap();
        assert_eq!(r.bucket(t(0)), 0);
        assert_eq!(r.bucket(t(299)), 0);
        assert_eq!(r.bucket(t(300)), 1);
        assert_eq!(r.bucket(t(-1)), -1);
        assert_eq!(AdResolver::cache_key("leaderboard", 7), "ad_slot:leaderboard:7");
    }

    #[tokio::test]
    async fn test_missing_slot_is_empty_and_not_cached() {
        let cache = Arc::new(MokaKvStore::default());
        let r = AdResolver::new(Arc::new(NoSlots), cache.clone(), AdsConfig::default());
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        assert_eq!(r.get_or_resolve("nowhere", now).await, "");
        let key = AdResolver::cache_key("nowhere", r.bucket(now));
        assert_eq!(cache.get(&key).await.unwrap(), None);
    }
}
