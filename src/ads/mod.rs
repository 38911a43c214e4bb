//! Ad slot resolution
//!
//! Page render → `AdResolver` (bucketed cache) → `eligibility` (active,
//! in-window, capped pool) → `rotation` (pick one) → `render` (HTML fragment).

pub mod eligibility;
pub mod models;
pub mod render;
pub mod resolver;
pub mod rotation;

pub use eligibility::eligible;
pub use models::{
    AdEvent, Creative, CreativeStats, CreativeType, EventType, NewAdEvent, ProviderKind,
    RotationStrategy, Slot,
};
pub use render::render;
pub use resolver::{AdRepository, AdResolver, RenderContext};
pub use rotation::{select, select_with};
