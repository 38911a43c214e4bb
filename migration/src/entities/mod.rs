pub mod ad_creative;
pub mod ad_event;
pub mod ad_slot;

pub use ad_creative::Entity as AdCreativeEntity;
pub use ad_event::Entity as AdEventEntity;
pub use ad_slot::Entity as AdSlotEntity;
