//! Key-value cache layer
//!
//! 广告位渲染结果、去重标记和热门排行都存放在这里。
//! 后端可选进程内 moka 或 Redis，由 `cache.type` 决定。

pub mod object_cache;
pub mod traits;

use std::sync::Arc;

use tracing::info;

use crate::config::CacheConfig;
use crate::errors::{AdslotError, Result};

pub use object_cache::{MokaKvStore, RedisKvStore};
pub use traits::KvStore;

pub struct KvStoreFactory;

impl KvStoreFactory {
    pub async fn create(config: &CacheConfig) -> Result<Arc<dyn KvStore>> {
        let store: Arc<dyn KvStore> = match config.cache_type.as_str() {
            "memory" => Arc::new(MokaKvStore::new(config.memory.max_capacity)),
            "redis" => Arc::new(RedisKvStore::connect(&config.redis).await?),
            other => {
                return Err(AdslotError::cache_connection(format!(
                    "Unknown cache type: '{}'. Valid: memory, redis",
                    other
                )));
            }
        };

        info!("Using KV cache backend: {}", store.backend_name());
        Ok(store)
    }
}
