use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::sync::RwLock;
use tracing::{debug, error, trace};

use crate::cache::KvStore;
use crate::config::RedisConfig;
use crate::errors::{AdslotError, Result};

pub struct RedisKvStore {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    key_prefix: String,
}

impl RedisKvStore {
    /// 创建客户端并 PING 一次，确认服务器可达
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.clone()).map_err(|e| {
            AdslotError::cache_connection(format!(
                "Failed to create Redis client for {}: {}",
                config.url, e
            ))
        })?;

        let store = Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            key_prefix: config.key_prefix.clone(),
        };

        let mut conn = store.get_connection().await.map_err(|e| {
            error!(
                "Failed to connect to Redis server: {}. Check Redis server status and URL: {}",
                e, config.url
            );
            AdslotError::cache_connection(format!("Redis connection failed: {e}"))
        })?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| AdslotError::cache_connection(format!("Redis ping failed: {e}")))?;
        debug!("Redis connection test successful: {}", pong);

        debug!("RedisKvStore created with prefix: '{}'", store.key_prefix);
        Ok(store)
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> std::result::Result<MultiplexedConnection, redis::RedisError> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用）
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    async fn connection_or_reset(&self) -> Result<MultiplexedConnection> {
        match self.get_connection().await {
            Ok(conn) => Ok(conn),
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }

    /// 命令失败时重置连接，再把错误交给调用方
    async fn checked<T>(&self, key: &str, result: redis::RedisResult<T>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                error!("Redis command on key '{}' failed: {}", key, e);
                self.reset_connection().await;
                Err(e.into())
            }
        }
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection_or_reset().await?;
        let result: redis::RedisResult<Option<String>> = conn.get(self.make_key(key)).await;
        let value = self.checked(key, result).await?;
        trace!("Redis get {} -> hit={}", key, value.is_some());
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.connection_or_reset().await?;
        let result = conn
            .set_ex::<String, &str, ()>(self.make_key(key), value, ttl.as_secs().max(1))
            .await;
        self.checked(key, result).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection_or_reset().await?;
        let result = conn.del::<String, i64>(self.make_key(key)).await;
        let deleted = self.checked(key, result).await?;
        trace!("Redis del {} -> {}", key, deleted);
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool> {
        let mut conn = self.connection_or_reset().await?;
        // SET key value NX EX ttl：写入成功返回 OK，已存在返回 nil
        let result: redis::RedisResult<Option<String>> = redis::cmd("SET")
            .arg(self.make_key(key))
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await;
        Ok(self.checked(key, result).await?.is_some())
    }

    async fn zincr(
        &self,
        key: &str,
        member: &str,
        by: f64,
        ttl_on_create: Duration,
    ) -> Result<f64> {
        let mut conn = self.connection_or_reset().await?;
        let redis_key = self.make_key(key);
        // EXPIRE ... NX 只在 key 没有过期时间时设置，保留已有窗口
        let result: redis::RedisResult<(f64,)> = redis::pipe()
            .zincr(&redis_key, member, by)
            .cmd("EXPIRE")
            .arg(&redis_key)
            .arg(ttl_on_create.as_secs().max(1))
            .arg("NX")
            .ignore()
            .query_async(&mut conn)
            .await;
        let (score,) = self.checked(key, result).await?;
        Ok(score)
    }

    async fn zadd(
        &self,
        key: &str,
        member: &str,
        score: f64,
        ttl_on_create: Duration,
    ) -> Result<()> {
        let mut conn = self.connection_or_reset().await?;
        let redis_key = self.make_key(key);
        let result: redis::RedisResult<()> = redis::pipe()
            .zadd(&redis_key, member, score)
            .ignore()
            .cmd("EXPIRE")
            .arg(&redis_key)
            .arg(ttl_on_create.as_secs().max(1))
            .arg("NX")
            .ignore()
            .query_async(&mut conn)
            .await;
        self.checked(key, result).await
    }

    async fn ztop(&self, key: &str, n: usize) -> Result<Vec<(String, f64)>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        let mut conn = self.connection_or_reset().await?;
        let stop = isize::try_from(n - 1).unwrap_or(isize::MAX);
        let result: redis::RedisResult<Vec<(String, f64)>> = conn
            .zrevrange_withscores(self.make_key(key), 0, stop)
            .await;
        self.checked(key, result).await
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
