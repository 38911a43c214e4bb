//! Eligibility, rotation and rendering tests
//!
//! Pure functions only: no storage, no cache.

use adslot::ads::{
    Creative, CreativeType, ProviderKind, RotationStrategy, Slot, eligible, render, select,
    select_with,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use strum::IntoEnumIterator;

// =============================================================================
// Fixtures
// =============================================================================

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 0).unwrap()
}

fn slot(strategy: RotationStrategy, max_creatives: u32) -> Slot {
    let now = fixed_now();
    Slot {
        id: 1,
        name: "leaderboard".to_string(),
        display_name: "Leaderboard".to_string(),
        location: "Below lead story".to_string(),
        width: 728,
        height: 90,
        is_responsive: true,
        max_creatives,
        rotation_strategy: strategy,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

fn creative(id: i64, priority: i32, weight: u32) -> Creative {
    let now = fixed_now();
    Creative {
        id,
        slot_id: 1,
        name: format!("creative-{id}"),
        provider: ProviderKind::Direct,
        creative_type: CreativeType::Image,
        markup: String::new(),
        image_url: format!("https://cdn.example.com/ads/{id}.png"),
        image_alt: format!("Ad {id}"),
        target_url: format!("https://advertiser.example.com/{id}"),
        start_at: now - Duration::days(1),
        end_at: now + Duration::days(1),
        priority,
        weight,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

// =============================================================================
// Empty pools
// =============================================================================

#[test]
fn test_empty_pool_selects_nothing_for_every_strategy() {
    let now = fixed_now();
    for strategy in RotationStrategy::iter() {
        assert!(
            select(&[], strategy, now).is_none(),
            "{strategy:?} picked from an empty pool"
        );
    }
}

#[test]
fn test_expired_and_inactive_creatives_are_not_eligible() {
    let now = fixed_now();
    let mut expired = creative(1, 0, 1);
    expired.end_at = now - Duration::hours(1);
    let mut inactive = creative(2, 0, 1);
    inactive.is_active = false;
    let mut future = creative(3, 0, 1);
    future.start_at = now + Duration::hours(1);
    let mut other_slot = creative(4, 0, 1);
    other_slot.slot_id = 99;

    let pool = eligible(
        &slot(RotationStrategy::Priority, 5),
        &[expired, inactive, future, other_slot],
        now,
    );
    assert!(pool.is_empty());
}

#[test]
fn test_schedule_bounds_are_inclusive() {
    let now = fixed_now();
    let mut starts_now = creative(1, 0, 1);
    starts_now.start_at = now;
    let mut ends_now = creative(2, 0, 1);
    ends_now.end_at = now;

    let pool = eligible(&slot(RotationStrategy::Priority, 5), &[starts_now, ends_now], now);
    assert_eq!(pool.len(), 2);
}

// =============================================================================
// Priority
// =============================================================================

#[test]
fn test_priority_picks_highest_priority_then_weight() {
    let now = fixed_now();
    let creatives = vec![
        creative(1, 1, 9),
        creative(2, 5, 1),
        creative(3, 5, 4),
        creative(4, 3, 7),
    ];
    let slot = slot(RotationStrategy::Priority, 10);
    let pool = eligible(&slot, &creatives, now);

    let picked = select(&pool, RotationStrategy::Priority, now).unwrap();
    assert_eq!(picked.id, 3);

    let max_priority = pool.iter().map(|c| c.priority).max().unwrap();
    assert_eq!(picked.priority, max_priority);
}

#[test]
fn test_pool_is_capped_after_ordering() {
    let now = fixed_now();
    let creatives = vec![creative(1, 1, 1), creative(2, 9, 1), creative(3, 5, 1)];
    let pool = eligible(&slot(RotationStrategy::Priority, 2), &creatives, now);
    let ids: Vec<i64> = pool.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

// =============================================================================
// Weighted
// =============================================================================

#[test]
fn test_weighted_ratio_approaches_one_to_three() {
    let now = fixed_now();
    let pool = vec![creative(1, 0, 1), creative(2, 0, 3)];

    let trials = 10_000;
    let mut heavy = 0;
    for _ in 0..trials {
        if select(&pool, RotationStrategy::Weighted, now).unwrap().id == 2 {
            heavy += 1;
        }
    }

    // 期望 7500，标准差约 43；±400 远超 5 个标准差
    assert!(
        (7_100..=7_900).contains(&heavy),
        "weight-3 creative picked {heavy} times out of {trials}"
    );
}

#[test]
fn test_weighted_roll_maps_to_cumulative_ranges() {
    let now = fixed_now();
    let pool = vec![creative(1, 0, 1), creative(2, 0, 3)];

    let pick = |point: u64| {
        select_with(&pool, RotationStrategy::Weighted, now, 60, &mut |upper| {
            assert_eq!(upper, 4);
            point
        })
        .map(|c| c.id)
    };
    assert_eq!(pick(0), Some(1));
    assert_eq!(pick(1), Some(2));
    assert_eq!(pick(3), Some(2));
}

#[test]
fn test_weighted_with_all_zero_weights_yields_nothing() {
    let now = fixed_now();
    let pool = vec![creative(1, 0, 0), creative(2, 0, 0)];
    assert!(select(&pool, RotationStrategy::Weighted, now).is_none());
}

// =============================================================================
// Sequential
// =============================================================================

#[test]
fn test_sequential_is_stable_within_a_minute_and_advances_after() {
    let pool = vec![creative(1, 0, 1), creative(2, 0, 1), creative(3, 0, 1)];
    let t0 = Utc.timestamp_opt(1_800_000_000, 0).unwrap();
    let index_of = |now: DateTime<Utc>| {
        let picked = select(&pool, RotationStrategy::Sequential, now).unwrap();
        pool.iter().position(|c| c.id == picked.id).unwrap()
    };

    let first = index_of(t0);
    assert_eq!(index_of(t0 + Duration::seconds(59)), first);
    assert_eq!(index_of(t0 + Duration::seconds(60)), (first + 1) % 3);
    assert_eq!(index_of(t0 + Duration::seconds(180)), first);
}

#[test]
fn test_sequential_uses_the_configured_bucket_width() {
    let pool = vec![creative(1, 0, 1), creative(2, 0, 1)];
    let t0 = Utc.timestamp_opt(0, 0).unwrap();
    let mut never = |_: u64| -> u64 { unreachable!("sequential must not roll") };

    let a = select_with(&pool, RotationStrategy::Sequential, t0, 10, &mut never).unwrap();
    let b = select_with(
        &pool,
        RotationStrategy::Sequential,
        t0 + Duration::seconds(10),
        10,
        &mut never,
    )
    .unwrap();
    assert_ne!(a.id, b.id);
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_render_never_fails_for_any_provider() {
    let slot = slot(RotationStrategy::Priority, 1);
    for provider in ProviderKind::iter() {
        for creative_type in CreativeType::iter() {
            let mut c = creative(7, 0, 1);
            c.provider = provider;
            c.creative_type = creative_type;
            c.markup = "<div class=\"promo\">Subscribe</div>".to_string();

            let html = render(&c, &slot);
            match provider {
                ProviderKind::Adsense => assert_eq!(html, c.markup),
                ProviderKind::House if creative_type != CreativeType::Image => {
                    assert_eq!(html, c.markup)
                }
                _ => assert!(
                    html.contains(&c.target_url),
                    "{provider:?}/{creative_type:?} lost the click URL: {html}"
                ),
            }
        }
    }
}

#[test]
fn test_render_image_kinds_without_image_are_empty() {
    let slot = slot(RotationStrategy::Priority, 1);
    for provider in [ProviderKind::Direct, ProviderKind::Sponsor] {
        let mut c = creative(8, 0, 1);
        c.provider = provider;
        c.image_url = String::new();
        assert_eq!(render(&c, &slot), "", "{provider:?}");
    }
}
