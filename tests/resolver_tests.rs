//! AdResolver integration tests
//!
//! Cache bucketing, failure absorption and invalidation on writes.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use adslot::ads::{
    AdRepository, AdResolver, Creative, CreativeType, ProviderKind, RenderContext,
    RotationStrategy, Slot,
};
use adslot::cache::{KvStore, MokaKvStore};
use adslot::config::AdsConfig;
use adslot::errors::{AdslotError, Result};
use adslot::services::{AdService, CreativePayload, SlotPayload};
use adslot::storage::SeaOrmStorage;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use tempfile::TempDir;

// =============================================================================
// Mocks
// =============================================================================

/// In-memory repository whose creatives can be swapped between calls.
struct MockRepo {
    slot: Option<Slot>,
    creatives: Mutex<Vec<Creative>>,
    lookups: AtomicUsize,
}

impl MockRepo {
    fn new(slot: Option<Slot>, creatives: Vec<Creative>) -> Self {
        Self {
            slot,
            creatives: Mutex::new(creatives),
            lookups: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AdRepository for MockRepo {
    async fn find_active_slot(&self, name: &str) -> Result<Option<Slot>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.slot.clone().filter(|s| s.name == name && s.is_active))
    }

    async fn creatives_for_slot(&self, slot_id: i64) -> Result<Vec<Creative>> {
        Ok(self
            .creatives
            .lock()
            .iter()
            .filter(|c| c.slot_id == slot_id)
            .cloned()
            .collect())
    }
}

struct BrokenRepo;

#[async_trait]
impl AdRepository for BrokenRepo {
    async fn find_active_slot(&self, _name: &str) -> Result<Option<Slot>> {
        Err(AdslotError::database_connection("connection refused"))
    }

    async fn creatives_for_slot(&self, _slot_id: i64) -> Result<Vec<Creative>> {
        Err(AdslotError::database_connection("connection refused"))
    }
}

struct BrokenCache;

#[async_trait]
impl KvStore for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(AdslotError::cache_connection("redis down"))
    }
    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<()> {
        Err(AdslotError::cache_connection("redis down"))
    }
    async fn delete(&self, _key: &str) -> Result<()> {
        Err(AdslotError::cache_connection("redis down"))
    }
    async fn set_if_absent(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<bool> {
        Err(AdslotError::cache_connection("redis down"))
    }
    async fn zincr(&self, _key: &str, _member: &str, _by: f64, _ttl: Duration) -> Result<f64> {
        Err(AdslotError::cache_connection("redis down"))
    }
    async fn zadd(&self, _key: &str, _member: &str, _score: f64, _ttl: Duration) -> Result<()> {
        Err(AdslotError::cache_connection("redis down"))
    }
    async fn ztop(&self, _key: &str, _n: usize) -> Result<Vec<(String, f64)>> {
        Err(AdslotError::cache_connection("redis down"))
    }
    fn backend_name(&self) -> &'static str {
        "broken"
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn now() -> DateTime<Utc> {
    Utc.timestamp_opt(1_800_000_100, 0).unwrap()
}

fn slot() -> Slot {
    Slot {
        id: 1,
        name: "rail".to_string(),
        display_name: "Rail".to_string(),
        location: String::new(),
        width: 300,
        height: 250,
        is_responsive: false,
        max_creatives: 1,
        rotation_strategy: RotationStrategy::Priority,
        is_active: true,
        created_at: now(),
        updated_at: now(),
    }
}

fn house(id: i64, markup: &str) -> Creative {
    Creative {
        id,
        slot_id: 1,
        name: format!("house-{id}"),
        provider: ProviderKind::House,
        creative_type: CreativeType::Html,
        markup: markup.to_string(),
        image_url: String::new(),
        image_alt: String::new(),
        target_url: String::new(),
        start_at: now() - chrono::Duration::days(1),
        end_at: now() + chrono::Duration::days(1),
        priority: 0,
        weight: 1,
        is_active: true,
        created_at: now(),
        updated_at: now(),
    }
}

fn resolver(repo: Arc<dyn AdRepository>, cache: Arc<dyn KvStore>) -> AdResolver {
    AdResolver::new(repo, cache, AdsConfig::default())
}

// =============================================================================
// Resolution
// =============================================================================

#[tokio::test]
async fn test_missing_and_inactive_slots_render_empty() {
    let mut inactive = slot();
    inactive.is_active = false;
    let repo = Arc::new(MockRepo::new(Some(inactive), vec![house(1, "<p>x</p>")]));
    let r = resolver(repo, Arc::new(MokaKvStore::default()));

    assert_eq!(r.get_or_resolve("rail", now()).await, "");
    assert_eq!(r.get_or_resolve("nope", now()).await, "");
}

#[tokio::test]
async fn test_empty_pool_renders_empty_for_every_strategy() {
    use strum::IntoEnumIterator;

    for strategy in RotationStrategy::iter() {
        let mut s = slot();
        s.rotation_strategy = strategy;
        let repo = Arc::new(MockRepo::new(Some(s), Vec::new()));
        let r = resolver(repo, Arc::new(MokaKvStore::default()));
        assert_eq!(r.get_or_resolve("rail", now()).await, "", "{strategy:?}");
    }
}

#[tokio::test]
async fn test_storage_failure_degrades_to_empty() {
    let r = resolver(Arc::new(BrokenRepo), Arc::new(MokaKvStore::default()));
    assert_eq!(r.get_or_resolve("rail", now()).await, "");
}

#[tokio::test]
async fn test_cache_failure_still_resolves() {
    let repo = Arc::new(MockRepo::new(Some(slot()), vec![house(1, "<p>house</p>")]));
    let r = resolver(repo, Arc::new(BrokenCache));
    assert_eq!(r.get_or_resolve("rail", now()).await, "<p>house</p>");
    // 失效操作同样不能 panic
    r.invalidate_slot("rail", now()).await;
}

#[tokio::test]
async fn test_render_ad_slot_uses_the_wall_clock() {
    let mut live = house(1, "<p>live</p>");
    live.start_at = Utc::now() - chrono::Duration::hours(1);
    live.end_at = Utc::now() + chrono::Duration::hours(1);
    let repo = Arc::new(MockRepo::new(Some(slot()), vec![live]));
    let r = resolver(repo, Arc::new(MokaKvStore::default()));

    let ctx = RenderContext {
        path: "/news/council-budget".to_string(),
        user_agent: "Mozilla/5.0".to_string(),
    };
    assert_eq!(r.render_ad_slot("rail", &ctx).await, "<p>live</p>");
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn test_fragment_is_cached_within_the_bucket() {
    let repo = Arc::new(MockRepo::new(Some(slot()), vec![house(1, "<p>first</p>")]));
    let cache: Arc<dyn KvStore> = Arc::new(MokaKvStore::default());
    let r = resolver(repo.clone(), cache.clone());

    assert_eq!(r.get_or_resolve("rail", now()).await, "<p>first</p>");
    *repo.creatives.lock() = vec![house(2, "<p>second</p>")];

    // 同一个 5 分钟桶内命中缓存
    assert_eq!(
        r.get_or_resolve("rail", now() + chrono::Duration::seconds(30))
            .await,
        "<p>first</p>"
    );
    assert_eq!(repo.lookups.load(Ordering::SeqCst), 1);

    let key = AdResolver::cache_key("rail", r.bucket(now()));
    assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some("<p>first</p>"));
}

#[tokio::test]
async fn test_empty_fragment_for_existing_slot_is_cached() {
    let repo = Arc::new(MockRepo::new(Some(slot()), Vec::new()));
    let cache: Arc<dyn KvStore> = Arc::new(MokaKvStore::default());
    let r = resolver(repo, cache.clone());

    assert_eq!(r.get_or_resolve("rail", now()).await, "");
    let key = AdResolver::cache_key("rail", r.bucket(now()));
    assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some(""));
}

#[tokio::test]
async fn test_invalidation_clears_current_and_previous_buckets() {
    let repo = Arc::new(MockRepo::new(Some(slot()), vec![house(1, "<p>old</p>")]));
    let cache: Arc<dyn KvStore> = Arc::new(MokaKvStore::default());
    let r = resolver(repo.clone(), cache.clone());

    let t = now();
    let earlier = t - chrono::Duration::seconds(600);
    r.get_or_resolve("rail", earlier).await;
    r.get_or_resolve("rail", t).await;

    *repo.creatives.lock() = vec![house(2, "<p>new</p>")];
    r.invalidate_slot("rail", t).await;

    for when in [t, earlier] {
        let key = AdResolver::cache_key("rail", r.bucket(when));
        assert_eq!(cache.get(&key).await.unwrap(), None, "{key} survived");
    }
    assert_eq!(r.get_or_resolve("rail", t).await, "<p>new</p>");
}

// =============================================================================
// Service writes invalidate (SQLite)
// =============================================================================

async fn sqlite_service(dir: &TempDir) -> (Arc<AdService>, Arc<AdResolver>) {
    let db_path = dir.path().join("resolver_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite", 1)
            .await
            .expect("Failed to create storage"),
    );
    let cache: Arc<dyn KvStore> = Arc::new(MokaKvStore::default());
    let repo: Arc<dyn AdRepository> = storage.clone();
    let resolver = Arc::new(AdResolver::new(repo, cache, AdsConfig::default()));
    let service = Arc::new(AdService::new(storage, resolver.clone()));
    (service, resolver)
}

fn slot_payload() -> SlotPayload {
    serde_json::from_value(serde_json::json!({
        "name": "sidebar",
        "width": 300,
        "height": 250,
        "rotation_strategy": "priority"
    }))
    .unwrap()
}

fn creative_payload(markup: &str) -> CreativePayload {
    let (start, end) = AdService::schedule_from_now(30);
    serde_json::from_value(serde_json::json!({
        "slot": "sidebar",
        "name": "House promo",
        "provider": "house",
        "creative_type": "html",
        "markup": markup,
        "start_at": start - chrono::Duration::minutes(1),
        "end_at": end,
    }))
    .unwrap()
}

#[tokio::test]
async fn test_saving_a_creative_invalidates_its_slot() {
    let dir = TempDir::new().unwrap();
    let (service, resolver) = sqlite_service(&dir).await;

    service.create_slot(slot_payload()).await.unwrap();
    let created = service
        .create_creative(creative_payload("<p>before</p>"))
        .await
        .unwrap();

    let before = resolver.get_or_resolve("sidebar", Utc::now()).await;
    assert_eq!(before, "<p>before</p>");

    service
        .update_creative(created.id, creative_payload("<p>after</p>"))
        .await
        .unwrap();

    let after = resolver.get_or_resolve("sidebar", Utc::now()).await;
    assert_eq!(after, "<p>after</p>");
}

#[tokio::test]
async fn test_deleting_a_creative_invalidates_its_slot() {
    let dir = TempDir::new().unwrap();
    let (service, resolver) = sqlite_service(&dir).await;

    service.create_slot(slot_payload()).await.unwrap();
    let created = service
        .create_creative(creative_payload("<p>gone soon</p>"))
        .await
        .unwrap();
    assert_eq!(
        resolver.get_or_resolve("sidebar", Utc::now()).await,
        "<p>gone soon</p>"
    );

    service.delete_creative(created.id).await.unwrap();
    assert_eq!(resolver.get_or_resolve("sidebar", Utc::now()).await, "");
}
