use chrono::{DateTime, Utc};

use super::models::{Creative, Slot};

/// Build the eligible pool for `slot` at `now`.
///
/// Keeps creatives owned by the slot that are active and scheduled around
/// `now` (inclusive), ordered by priority then weight (both descending),
/// capped at the slot's `max_creatives`.
pub fn eligible(slot: &Slot, creatives: &[Creative], now: DateTime<Utc>) -> Vec<Creative> {
    let mut pool: Vec<Creative> = creatives
        .iter()
        .filter(|c| c.slot_id == slot.id && c.is_live_at(now))
        .cloned()
        .collect();

    // sort_by 是稳定排序，同优先级同权重时保持存储顺序
    pool.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.weight.cmp(&a.weight))
    });
    pool.truncate(slot.max_creatives.max(1) as usize);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::models::{CreativeType, ProviderKind, RotationStrategy};
    use chrono::Duration;

    fn slot(max_creatives: u32) -> Slot {
        let now = Utc::now();
        Slot {
            id: 7,
            name: "leaderboard".to_string(),
            display_name: "Leaderboard".to_string(),
            location: String::new(),
            width: 728,
            height: 90,
            is_responsive: true,
            max_creatives,
            rotation_strategy: RotationStrategy::Priority,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn creative(id: i64, priority: i32, weight: u32, now: DateTime<Utc>) -> Creative {
        Creative {
            id,
            slot_id: 7,
            name: format!("creative-{id}"),
            provider: ProviderKind::House,
            creative_type: CreativeType::Html,
            markup: format!("<p>{id}</p>"),
            image_url: String::new(),
            image_alt: String::new(),
            target_url: String::new(),
            start_at: now - Duration::hours(1),
            end_at: now + Duration::hours(1),
            priority,
            weight,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn ids(pool: &[Creative]) -> Vec<i64> {
        pool.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_orders_by_priority_then_weight() {
        let now = Utc::now();
        let creatives = vec![
            creative(1, 0, 5, now),
            creative(2, 10, 1, now),
            creative(3, 10, 3, now),
            creative(4, 5, 9, now),
        ];
        let pool = eligible(&slot(10), &creatives, now);
        assert_eq!(ids(&pool), vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_filters_inactive_out_of_window_and_foreign() {
        let now = Utc::now();
        let mut inactive = creative(1, 0, 1, now);
        inactive.is_active = false;
        let mut future = creative(2, 0, 1, now);
        future.start_at = now + Duration::minutes(1);
        let mut expired = creative(3, 0, 1, now);
        expired.end_at = now - Duration::seconds(1);
        let mut other_slot = creative(4, 0, 1, now);
        other_slot.slot_id = 99;
        let live = creative(5, 0, 1, now);

        let pool = eligible(
            &slot(10),
            &[inactive, future, expired, other_slot, live],
            now,
        );
        assert_eq!(ids(&pool), vec![5]);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let now = Utc::now();
        let mut starts_now = creative(1, 0, 1, now);
        starts_now.start_at = now;
        let mut ends_now = creative(2, 0, 1, now);
        ends_now.end_at = now;

        let pool = eligible(&slot(10), &[starts_now, ends_now], now);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_truncates_to_max_creatives_after_ordering() {
        let now = Utc::now();
        let creatives = vec![
            creative(1, 1, 1, now),
            creative(2, 3, 1, now),
            creative(3, 2, 1, now),
        ];
        let pool = eligible(&slot(2), &creatives, now);
        assert_eq!(ids(&pool), vec![2, 3]);
    }

    #[test]
    fn test_empty_input_yields_empty_pool() {
        assert!(eligible(&slot(3), &[], Utc::now()).is_empty());
    }
}
