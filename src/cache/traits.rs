use std::time::Duration;

use async_trait::async_trait;

use crate::errors::Result;

/// Key-value store shared by the ad resolver and the most-read tracker.
///
/// Operations are individually atomic; nothing here spans multiple keys.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    /// 仅在 key 不存在时写入，返回是否写入成功
    async fn set_if_absent(&self, key: &str, value: &str, ttl: Duration) -> Result<bool>;

    /// 有序集合自增，返回新分数。
    /// `ttl_on_create` 只在集合新建时生效，后续自增不会延长过期时间。
    async fn zincr(&self, key: &str, member: &str, by: f64, ttl_on_create: Duration)
    -> Result<f64>;

    /// 直接设置成员分数（覆盖旧值），TTL 规则同 `zincr`
    async fn zadd(&self, key: &str, member: &str, score: f64, ttl_on_create: Duration)
    -> Result<()>;

    /// 按分数从高到低返回前 `n` 个成员
    async fn ztop(&self, key: &str, n: usize) -> Result<Vec<(String, f64)>>;

    fn backend_name(&self) -> &'static str;
}
