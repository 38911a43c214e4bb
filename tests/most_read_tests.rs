//! MostReadTracker tests over the in-process store

use std::sync::Arc;

use adslot::cache::{KvStore, MokaKvStore};
use adslot::config::MostReadConfig;
use adslot::errors::AdslotError;
use adslot::most_read::{MAX_COUNT, MostReadTracker, RankedCard, SeedCard, Window};

fn tracker() -> (MostReadTracker, Arc<dyn KvStore>) {
    let cache: Arc<dyn KvStore> = Arc::new(MokaKvStore::default());
    (
        MostReadTracker::new(cache.clone(), MostReadConfig::default()),
        cache,
    )
}

#[tokio::test]
async fn test_repeat_views_from_same_reader_count_once() {
    let (tracker, _) = tracker();
    assert!(tracker.record_view(42, "198.51.100.1", "Firefox").await);
    assert!(!tracker.record_view(42, "198.51.100.1", "Firefox").await);
    // 不同 UA 视为不同读者
    assert!(tracker.record_view(42, "198.51.100.1", "Safari").await);
    // 同一读者看另一篇
    assert!(tracker.record_view(43, "198.51.100.1", "Firefox").await);

    let top = tracker.most_read("24h", 10).await.unwrap();
    assert_eq!(
        top,
        vec![
            RankedCard {
                card_id: 42,
                score: 2.0
            },
            RankedCard {
                card_id: 43,
                score: 1.0
            },
        ]
    );
}

#[tokio::test]
async fn test_views_land_in_every_window() {
    let (tracker, _) = tracker();
    tracker.record_view(7, "192.0.2.1", "ua").await;

    for window in Window::ALL {
        let top = tracker.most_read(window.as_str(), 5).await.unwrap();
        assert_eq!(top.len(), 1, "window {window}");
        assert_eq!(top[0].card_id, 7);
    }
}

#[tokio::test]
async fn test_unknown_window_is_a_validation_error() {
    let (tracker, _) = tracker();
    let err = tracker.most_read("30d", 5).await.unwrap_err();
    assert!(matches!(err, AdslotError::Validation(_)));
}

#[tokio::test]
async fn test_count_is_clamped() {
    let (tracker, _) = tracker();
    for card in 0..60 {
        tracker.record_view(card, "192.0.2.1", "ua").await;
    }
    assert_eq!(tracker.most_read("3h", 500).await.unwrap().len(), MAX_COUNT);
    assert_eq!(tracker.most_read("3h", 0).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_results_are_cached_but_empty_results_are_not() {
    let (tracker, cache) = tracker();

    assert!(tracker.most_read("7d", 5).await.unwrap().is_empty());
    assert_eq!(cache.get("most_read:7d:5").await.unwrap(), None);

    tracker.record_view(1, "192.0.2.1", "ua").await;
    let first = tracker.most_read("7d", 5).await.unwrap();
    assert_eq!(first.len(), 1);
    assert!(cache.get("most_read:7d:5").await.unwrap().is_some());

    // 缓存期内新的浏览不会立即反映
    tracker.record_view(2, "192.0.2.1", "ua").await;
    assert_eq!(tracker.most_read("7d", 5).await.unwrap(), first);
}

#[tokio::test]
async fn test_seed_orders_by_position_and_boosts_featured() {
    let (tracker, _) = tracker();
    tracker
        .seed(&[
            SeedCard {
                id: 100,
                featured: false,
            },
            SeedCard {
                id: 200,
                featured: false,
            },
            SeedCard {
                id: 300,
                featured: true,
            },
        ])
        .await
        .unwrap();

    let top = tracker.most_read("3h", 5).await.unwrap();
    let scored: Vec<(i64, f64)> = top.iter().map(|c| (c.card_id, c.score)).collect();
    assert_eq!(scored, vec![(300, 60.0), (100, 30.0), (200, 20.0)]);
}

#[tokio::test]
async fn test_store_failures_do_not_surface_from_record_view() {
    let cache: Arc<dyn KvStore> = Arc::new(MokaKvStore::default());
    // 占用集合 key，让 zincr 报 WRONGTYPE
    cache
        .set("mostread:3h", "oops", std::time::Duration::from_secs(60))
        .await
        .unwrap();
    let tracker = MostReadTracker::new(cache, MostReadConfig::default());
    assert!(!tracker.record_view(5, "192.0.2.1", "ua").await);
    assert!(tracker.most_read("3h", 5).await.unwrap().is_empty());
}
