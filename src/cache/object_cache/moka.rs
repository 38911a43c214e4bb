use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::Expiry;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cache::KvStore;
use crate::errors::{AdslotError, Result};

#[derive(Clone)]
enum StoredValue {
    Text {
        value: Arc<str>,
        ttl: Duration,
    },
    Sorted {
        members: Arc<Mutex<HashMap<String, f64>>>,
        ttl: Duration,
    },
}

impl StoredValue {
    fn ttl(&self) -> Duration {
        match self {
            StoredValue::Text { ttl, .. } | StoredValue::Sorted { ttl, .. } => *ttl,
        }
    }
}

/// 每个条目自带 TTL；覆盖写入时按新值的 TTL 重新计时
struct EntryExpiry;

impl Expiry<String, StoredValue> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl())
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl())
    }
}

/// In-process store backed by moka.
///
/// Sorted sets are kept as a member map behind a mutex; increments mutate
/// the map in place so the expiry chosen at creation is preserved.
pub struct MokaKvStore {
    inner: Cache<String, StoredValue>,
}

impl MokaKvStore {
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryExpiry)
            .build();

        debug!(
            "MokaKvStore initialized with max capacity: {}",
            max_capacity
        );
        Self { inner }
    }

    /// 取出（必要时创建）有序集合；已有集合保留原来的过期时间
    async fn sorted_set(
        &self,
        key: &str,
        ttl_on_create: Duration,
    ) -> Result<Arc<Mutex<HashMap<String, f64>>>> {
        let entry = self
            .inner
            .entry(key.to_string())
            .or_insert_with(async move {
                StoredValue::Sorted {
                    members: Arc::new(Mutex::new(HashMap::new())),
                    ttl: ttl_on_create,
                }
            })
            .await;

        match entry.into_value() {
            StoredValue::Sorted { members, .. } => Ok(members),
            StoredValue::Text { .. } => Err(Self::wrong_type(key)),
        }
    }

    fn wrong_type(key: &str) -> AdslotError {
        AdslotError::validation(format!(
            "WRONGTYPE operation against key '{}' holding the wrong kind of value",
            key
        ))
    }
}

impl Default for MokaKvStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl KvStore for MokaKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match self.inner.get(key).await {
            Some(StoredValue::Text { value, .. }) => Ok(Some(value.to_string())),
            Some(StoredValue::Sorted { .. }) => Err(Self::wrong_type(key)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.inner
            .insert(
                key.to_string(),
                StoredValue::Text {
                    value: Arc::from(value),
                    ttl,
                },
            )
            .await;
        trace!("Stored key {} with ttl {:?}", key, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let value: Arc<str> = Arc::from(value);
        let entry = self
            .inner
            .entry(key.to_string())
            .or_insert_with(async move { StoredValue::Text { value, ttl } })
            .await;
        Ok(entry.is_fresh())
    }

    async fn zincr(
        &self,
        key: &str,
        member: &str,
        by: f64,
        ttl_on_create: Duration,
    ) -> Result<f64> {
        let members = self.sorted_set(key, ttl_on_create).await?;
        let mut members = members.lock();
        let score = members.entry(member.to_string()).or_insert(0.0);
        *score += by;
        Ok(*score)
    }

    async fn zadd(
        &self,
        key: &str,
        member: &str,
        score: f64,
        ttl_on_create: Duration,
    ) -> Result<()> {
        let members = self.sorted_set(key, ttl_on_create).await?;
        members.lock().insert(member.to_string(), score);
        Ok(())
    }

    async fn ztop(&self, key: &str, n: usize) -> Result<Vec<(String, f64)>> {
        let members = match self.inner.get(key).await {
            Some(StoredValue::Sorted { members, .. }) => members,
            Some(StoredValue::Text { .. }) => return Err(Self::wrong_type(key)),
            None => return Ok(Vec::new()),
        };

        let mut ranked: Vec<(String, f64)> = members
            .lock()
            .iter()
            .map(|(member, score)| (member.clone(), *score))
            .collect();
        // 分数相同时按成员倒序，与 Redis ZREVRANGE 一致
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
        ranked.truncate(n);
        Ok(ranked)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
