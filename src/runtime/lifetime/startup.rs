use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::ads::{AdRepository, AdResolver};
use crate::api::services::{AppStartTime, AppState};
use crate::cache::KvStoreFactory;
use crate::config::StaticConfig;
use crate::most_read::MostReadTracker;
use crate::services::AdService;
use crate::storage::StorageFactory;

/// 准备服务器启动所需的全部组件
///
/// 顺序：存储（含迁移）→ KV 缓存 → 解析器 → 业务服务 → 热门统计
pub async fn prepare_server_startup(config: Arc<StaticConfig>) -> Result<AppState> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let cache = KvStoreFactory::create(&config.cache)
        .await
        .context("Failed to create KV cache")?;

    let repo: Arc<dyn AdRepository> = storage.clone();
    let resolver = Arc::new(AdResolver::new(repo, cache.clone(), config.ads));
    let ad_service = Arc::new(AdService::new(storage.clone(), resolver.clone()));
    let most_read = Arc::new(MostReadTracker::new(cache.clone(), config.most_read));

    if config.api.admin_token.is_empty() {
        info!("Admin API is disabled (api.admin_token not set)");
    } else {
        info!("Admin API available at: /admin/v1");
    }

    debug!("Pre-startup processing completed in {:?}", start_time.elapsed());

    Ok(AppState {
        config,
        storage,
        cache,
        resolver,
        ad_service,
        most_read,
        start_time: AppStartTime {
            start_datetime: chrono::Utc::now(),
        },
    })
}
