//! Service layer for business logic
//!
//! Shared between the HTTP handlers and the CLI.

mod ad_service;
pub mod seed;

pub use ad_service::*;
pub use seed::{SeedReport, seed_ad_slots};
