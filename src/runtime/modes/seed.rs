//! Seed mode
//!
//! 创建初始广告位和 house 素材后退出。

use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::config::StaticConfig;
use crate::runtime::lifetime;
use crate::services::seed_ad_slots;

pub async fn run_seed(config: Arc<StaticConfig>) -> Result<()> {
    let state = lifetime::startup::prepare_server_startup(config).await?;
    let report = seed_ad_slots(&state.ad_service).await?;

    println!(
        "{} {} slot(s), {} creative(s) created",
        "Seed complete:".green().bold(),
        report.slots_created,
        report.creatives_created
    );
    Ok(())
}
