use sea_orm::ActiveValue::{NotSet, Set};

use crate::ads::{
    AdEvent, Creative, CreativeType, EventType, NewAdEvent, ProviderKind, RotationStrategy, Slot,
};
use migration::entities::{ad_creative, ad_event, ad_slot};

/// `validate()` 已保证不超过 i32::MAX
fn to_stored_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// 将 Sea-ORM Model 转换为 Slot
pub fn model_to_slot(model: ad_slot::Model) -> Slot {
    Slot {
        id: model.id,
        name: model.name,
        display_name: model.display_name,
        location: model.location,
        width: model.width.max(0) as u32,
        height: model.height.max(0) as u32,
        is_responsive: model.is_responsive,
        max_creatives: model.max_creatives.max(0) as u32,
        rotation_strategy: RotationStrategy::from_stored(&model.rotation_strategy),
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// 将 Slot 转换为 ActiveModel；`id == 0` 视为新记录
pub fn slot_to_active_model(slot: &Slot) -> ad_slot::ActiveModel {
    let is_new = slot.id == 0;
    ad_slot::ActiveModel {
        id: if is_new { NotSet } else { Set(slot.id) },
        name: Set(slot.name.clone()),
        display_name: Set(slot.display_name.clone()),
        location: Set(slot.location.clone()),
        width: Set(to_stored_int(slot.width)),
        height: Set(to_stored_int(slot.height)),
        is_responsive: Set(slot.is_responsive),
        max_creatives: Set(to_stored_int(slot.max_creatives)),
        rotation_strategy: Set(slot.rotation_strategy.to_string()),
        is_active: Set(slot.is_active),
        created_at: if is_new { Set(slot.created_at) } else { NotSet },
        updated_at: Set(slot.updated_at),
    }
}

pub fn model_to_creative(model: ad_creative::Model) -> Creative {
    Creative {
        id: model.id,
        slot_id: model.slot_id,
        name: model.name,
        provider: ProviderKind::from_stored(&model.provider),
        creative_type: CreativeType::from_stored(&model.creative_type),
        markup: model.markup,
        image_url: model.image_url,
        image_alt: model.image_alt,
        target_url: model.target_url,
        start_at: model.start_at,
        end_at: model.end_at,
        priority: model.priority,
        weight: model.weight.max(0) as u32,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn creative_to_active_model(creative: &Creative) -> ad_creative::ActiveModel {
    let is_new = creative.id == 0;
    ad_creative::ActiveModel {
        id: if is_new { NotSet } else { Set(creative.id) },
        slot_id: Set(creative.slot_id),
        name: Set(creative.name.clone()),
        provider: Set(creative.provider.to_string()),
        creative_type: Set(creative.creative_type.to_string()),
        markup: Set(creative.markup.clone()),
        image_url: Set(creative.image_url.clone()),
        image_alt: Set(creative.image_alt.clone()),
        target_url: Set(creative.target_url.clone()),
        start_at: Set(creative.start_at),
        end_at: Set(creative.end_at),
        priority: Set(creative.priority),
        weight: Set(to_stored_int(creative.weight)),
        is_active: Set(creative.is_active),
        created_at: if is_new {
            Set(creative.created_at)
        } else {
            NotSet
        },
        updated_at: Set(creative.updated_at),
    }
}

pub fn model_to_event(model: ad_event::Model) -> AdEvent {
    AdEvent {
        id: model.id,
        creative_id: model.creative_id,
        event_type: model.event_type.parse().unwrap_or(EventType::Impression),
        occurred_at: model.occurred_at,
        user_agent: model.user_agent,
        ip_address: model.ip_address,
        referrer: model.referrer,
    }
}

pub fn event_to_active_model(event: &NewAdEvent) -> ad_event::ActiveModel {
    ad_event::ActiveModel {
        id: NotSet,
        creative_id: Set(event.creative_id),
        event_type: Set(event.event_type.as_ref().to_string()),
        occurred_at: Set(event.occurred_at),
        user_agent: Set(event.user_agent.clone()),
        ip_address: Set(event.ip_address.clone()),
        referrer: Set(event.referrer.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::ActiveValue;

    fn slot_model() -> ad_slot::Model {
        let now = Utc::now();
        ad_slot::Model {
            id: 3,
            name: "leaderboard".to_string(),
            display_name: "Leaderboard".to_string(),
            location: "header".to_string(),
            width: 728,
            height: 90,
            is_responsive: true,
            max_creatives: 3,
            rotation_strategy: "sequential".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_model_to_slot() {
        let slot = model_to_slot(slot_model());
        assert_eq!(slot.id, 3);
        assert_eq!(slot.width, 728);
        assert_eq!(slot.rotation_strategy, RotationStrategy::Sequential);
    }

    #[test]
    fn test_unknown_strategy_survives_loading() {
        let mut model = slot_model();
        model.rotation_strategy = "round_robin".to_string();
        assert_eq!(
            model_to_slot(model).rotation_strategy,
            RotationStrategy::Unknown
        );
    }

    #[test]
    fn test_new_slot_leaves_id_unset() {
        let mut slot = model_to_slot(slot_model());
        slot.id = 0;
        let active = slot_to_active_model(&slot);
        assert!(matches!(active.id, ActiveValue::NotSet));
        assert!(matches!(active.created_at, ActiveValue::Set(_)));

        slot.id = 9;
        let active = slot_to_active_model(&slot);
        assert!(matches!(active.id, ActiveValue::Set(9)));
        assert!(matches!(active.created_at, ActiveValue::NotSet));
    }

    #[test]
    fn test_creative_round_trip_fields() {
        let now = Utc::now();
        let model = ad_creative::Model {
            id: 7,
            slot_id: 3,
            name: "Bakery".to_string(),
            provider: "sponsor".to_string(),
            creative_type: "image".to_string(),
            markup: String::new(),
            image_url: "/media/bakery.png".to_string(),
            image_alt: "Bakery".to_string(),
            target_url: "https://bakery.example.com".to_string(),
            start_at: now,
            end_at: now + Duration::days(30),
            priority: 5,
            weight: -2,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let creative = model_to_creative(model);
        assert_eq!(creative.provider, ProviderKind::Sponsor);
        assert_eq!(creative.weight, 0);

        let active = creative_to_active_model(&creative);
        assert!(matches!(&active.provider, ActiveValue::Set(p) if p == "sponsor"));
        assert!(matches!(active.weight, ActiveValue::Set(0)));
    }
}
