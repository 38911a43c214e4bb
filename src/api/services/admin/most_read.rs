//! Admin API 热门统计种子

use actix_web::{Responder, web};
use std::sync::Arc;
use tracing::info;

use crate::most_read::{MostReadTracker, SeedCard};

use super::helpers::api_result;
use super::types::SeedResponse;

/// POST /most-read/seed
///
/// Body: `[{"id": 12, "featured": true}, {"id": 7}]`，按编辑排序，越靠前分数越高。
pub async fn seed_most_read(
    tracker: web::Data<Arc<MostReadTracker>>,
    cards: web::Json<Vec<SeedCard>>,
) -> impl Responder {
    let cards = cards.into_inner();
    info!("Admin API: seeding most read with {} cards", cards.len());
    api_result(
        tracker
            .seed(&cards)
            .await
            .map(|_| SeedResponse {
                seeded: cards.len(),
            }),
    )
}
