//! Initial slots and house ads
//!
//! Idempotent: slots and creatives are matched by name and left alone if
//! they already exist.

use tracing::info;

use super::ad_service::{AdService, CreativePayload, SlotPayload};
use crate::errors::Result;

struct SeedSlot {
    name: &'static str,
    display_name: &'static str,
    location: &'static str,
    width: u32,
    height: u32,
    is_responsive: bool,
    max_creatives: u32,
    rotation_strategy: &'static str,
}

struct SeedHouseAd {
    slot: &'static str,
    name: &'static str,
    markup: &'static str,
    target_url: &'static str,
    priority: i32,
}

const SLOTS: &[SeedSlot] = &[
    SeedSlot {
        name: "leaderboard",
        display_name: "Leaderboard (Below Lead Story)",
        location: "Below lead story, above content rail",
        width: 728,
        height: 90,
        is_responsive: true,
        max_creatives: 3,
        rotation_strategy: "sequential",
    },
    SeedSlot {
        name: "rail-mpu",
        display_name: "Rail MPU (Medium Rectangle)",
        location: "Sidebar rail, below Most Read",
        width: 300,
        height: 250,
        is_responsive: false,
        max_creatives: 5,
        rotation_strategy: "weighted",
    },
    SeedSlot {
        name: "section-break",
        display_name: "Section Break Leaderboard",
        location: "Between main content and teaser sections",
        width: 728,
        height: 90,
        is_responsive: true,
        max_creatives: 2,
        rotation_strategy: "random",
    },
];

const HOUSE_ADS: &[SeedHouseAd] = &[
    SeedHouseAd {
        slot: "leaderboard",
        name: "Newsletter Signup - Leaderboard",
        markup: concat!(
            r#"<div class="house-ad house-ad--dark">"#,
            r#"<strong>Get the weekly newsletter</strong>"#,
            r#"<span>Local stories, zero spam. Every Friday.</span>"#,
            r#"<a href="/subscribe/">Subscribe Free</a>"#,
            "</div>"
        ),
        target_url: "",
        priority: 10,
    },
    SeedHouseAd {
        slot: "rail-mpu",
        name: "Advertise With Us - Rail",
        markup: concat!(
            r#"<div class="house-ad house-ad--outline">"#,
            r#"<strong>Advertise Here</strong>"#,
            r#"<span>Reach the local community</span>"#,
            r#"<a href="/about/">Learn More &rarr;</a>"#,
            "</div>"
        ),
        target_url: "/about/",
        priority: 5,
    },
    SeedHouseAd {
        slot: "section-break",
        name: "Newsletter Signup - Section Break",
        markup: concat!(
            r#"<div class="house-ad house-ad--dark">"#,
            r#"<strong>Don&rsquo;t miss a thing</strong>"#,
            r#"<span>Local stories, delivered free every Friday.</span>"#,
            r#"<a href="/subscribe/">Subscribe</a>"#,
            "</div>"
        ),
        target_url: "",
        priority: 10,
    },
];

/// 种子数据的有效期（天）
pub const HOUSE_AD_DAYS: i64 = 365;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub slots_created: usize,
    pub creatives_created: usize,
}

pub async fn seed_ad_slots(service: &AdService) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    let existing: Vec<String> = service
        .list_slots()
        .await?
        .into_iter()
        .map(|s| s.name)
        .collect();

    for seed in SLOTS {
        if existing.iter().any(|name| name == seed.name) {
            continue;
        }
        service
            .create_slot(SlotPayload {
                name: seed.name.to_string(),
                display_name: seed.display_name.to_string(),
                location: seed.location.to_string(),
                width: seed.width,
                height: seed.height,
                is_responsive: seed.is_responsive,
                max_creatives: seed.max_creatives,
                rotation_strategy: Some(seed.rotation_strategy.to_string()),
                is_active: true,
            })
            .await?;
        info!("Created slot: {}", seed.name);
        report.slots_created += 1;
    }

    let (start_at, end_at) = AdService::schedule_from_now(HOUSE_AD_DAYS);
    for ad in HOUSE_ADS {
        let creatives = service.list_creatives(ad.slot).await?;
        if creatives.iter().any(|c| c.name == ad.name) {
            continue;
        }
        service
            .create_creative(CreativePayload {
                slot: ad.slot.to_string(),
                name: ad.name.to_string(),
                provider: Some("house".to_string()),
                creative_type: Some("html".to_string()),
                markup: ad.markup.to_string(),
                image_url: String::new(),
                image_alt: String::new(),
                target_url: ad.target_url.to_string(),
                start_at: Some(start_at),
                end_at,
                priority: ad.priority,
                weight: 1,
                is_active: true,
            })
            .await?;
        report.creatives_created += 1;
    }

    info!(
        "Ad slots and house ads seeded ({} slots, {} creatives created)",
        report.slots_created, report.creatives_created
    );
    Ok(report)
}
