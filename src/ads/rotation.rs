use chrono::{DateTime, Utc};

use super::models::{Creative, RotationStrategy};

/// sequential 策略的默认时间桶宽度（秒）
pub const SEQUENTIAL_BUCKET_SECS: u64 = 60;

/// Pick one creative from an already ordered pool.
///
/// Uses the thread RNG for the random strategies and the default
/// 60-second bucket for `Sequential`.
pub fn select(
    pool: &[Creative],
    strategy: RotationStrategy,
    now: DateTime<Utc>,
) -> Option<&Creative> {
    select_with(pool, strategy, now, SEQUENTIAL_BUCKET_SECS, &mut |upper| {
        rand::random_range(0..upper)
    })
}

/// Same as [`select`] with an explicit bucket width and random source.
///
/// `roll(n)` must return a value in `0..n`; it is only called with `n > 0`.
pub fn select_with<'a>(
    pool: &'a [Creative],
    strategy: RotationStrategy,
    now: DateTime<Utc>,
    bucket_secs: u64,
    roll: &mut dyn FnMut(u64) -> u64,
) -> Option<&'a Creative> {
    if pool.is_empty() {
        return None;
    }

    match strategy {
        RotationStrategy::Priority | RotationStrategy::Unknown => pool.first(),
        RotationStrategy::Random => {
            let idx = roll(pool.len() as u64) as usize;
            pool.get(idx.min(pool.len() - 1))
        }
        RotationStrategy::Weighted => pick_weighted(pool, roll),
        RotationStrategy::Sequential => {
            let bucket = now.timestamp().div_euclid(bucket_secs.max(1) as i64);
            let idx = bucket.rem_euclid(pool.len() as i64) as usize;
            pool.get(idx)
        }
    }
}

/// 按权重累加后落点；权重为 0 的素材永远不会被选中
fn pick_weighted<'a>(
    pool: &'a [Creative],
    roll: &mut dyn FnMut(u64) -> u64,
) -> Option<&'a Creative> {
    let total: u64 = pool.iter().map(|c| u64::from(c.weight)).sum();
    if total == 0 {
        return None;
    }

    let mut point = roll(total).min(total - 1);
    for creative in pool {
        let weight = u64::from(creative.weight);
        if point < weight {
            return Some(creative);
        }
        point -= weight;
    }
    None
}
