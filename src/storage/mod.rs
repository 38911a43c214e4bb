use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;

pub use backend::{SeaOrmStorage, infer_backend_from_url};

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        let database_url = &config.database_url;

        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(database_url)?;

        let storage =
            backend::SeaOrmStorage::new(database_url, &backend_type, config.pool_size).await?;
        Ok(Arc::new(storage))
    }
}
