//! Renderer dispatch
//!
//! 每种 provider 对应一种 HTML 片段；alt / src / href 一律转义，
//! markup 是运营录入的可信内容，原样输出。渲染本身不会失败，
//! 素材不完整时返回空字符串。

use super::models::{Creative, CreativeType, ProviderKind, Slot};
use crate::utils::escape_html as escape;

pub fn render(creative: &Creative, slot: &Slot) -> String {
    match creative.provider {
        ProviderKind::Adsense => creative.markup.clone(),
        ProviderKind::Direct => render_direct(creative, slot),
        ProviderKind::House => render_house(creative, slot),
        ProviderKind::Sponsor => render_sponsor(creative, slot),
    }
}

fn img_tag(creative: &Creative, slot: &Slot) -> String {
    format!(
        r#"<img src="{}" alt="{}" width="{}" height="{}" loading="lazy""#,
        escape(&creative.image_url),
        escape(&creative.image_alt),
        slot.width,
        slot.height,
    )
}

fn render_direct(creative: &Creative, slot: &Slot) -> String {
    if !creative.has_image() {
        return String::new();
    }
    format!(
        r#"<a href="{}" target="_blank" rel="noopener sponsored" data-creative-id="{}">{}></a>"#,
        escape(&creative.target_url),
        creative.id,
        img_tag(creative, slot),
    )
}

fn render_house(creative: &Creative, slot: &Slot) -> String {
    if creative.creative_type == CreativeType::Image && creative.has_image() {
        if creative.target_url.trim().is_empty() {
            return format!(
                r#"{} data-creative-id="{}">"#,
                img_tag(creative, slot),
                creative.id
            );
        }
        return format!(
            r#"<a href="{}" data-creative-id="{}">{}></a>"#,
            escape(&creative.target_url),
            creative.id,
            img_tag(creative, slot),
        );
    }
    if creative.has_markup() {
        return creative.markup.clone();
    }
    String::new()
}

fn render_sponsor(creative: &Creative, slot: &Slot) -> String {
    if !creative.has_image() {
        return String::new();
    }
    format!(
        concat!(
            r#"<div class="sponsor-ad" data-creative-id="{}">"#,
            r#"<span class="sponsor-ad__label">Sponsored by</span>"#,
            r#"<a href="{}" target="_blank" rel="noopener sponsored">{}></a></div>"#,
        ),
        creative.id,
        escape(&creative.target_url),
        img_tag(creative, slot),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::models::RotationStrategy;
    use chrono::{Duration, Utc};

    fn slot() -> Slot {
        let now = Utc::now();
        Slot {
            id: 1,
            name: "rail-mpu".to_string(),
            display_name: "Rail MPU".to_string(),
            location: String::new(),
            width: 300,
            height: 250,
            is_responsive: false,
            max_creatives: 5,
            rotation_strategy: RotationStrategy::Weighted,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn creative(provider: ProviderKind) -> Creative {
        let now = Utc::now();
        Creative {
            id: 42,
            slot_id: 1,
            name: "test".to_string(),
            provider,
            creative_type: CreativeType::Image,
            markup: String::new(),
            image_url: "https://cdn.example.com/ads/a.png".to_string(),
            image_alt: "Fish & Chips <Friday>".to_string(),
            target_url: "https://chippy.example.com/?a=1&b=2".to_string(),
            start_at: now - Duration::days(1),
            end_at: now + Duration::days(1),
            priority: 0,
            weight: 1,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_adsense_markup_is_verbatim() {
        let mut c = creative(ProviderKind::Adsense);
        c.creative_type = CreativeType::Html;
        c.markup = r#"<script async src="https://ads.example.com/x.js"></script>"#.to_string();
        assert_eq!(render(&c, &slot()), c.markup);
    }

    #[test]
    fn test_direct_wraps_image_in_anchor() {
        let html = render(&creative(ProviderKind::Direct), &slot());
        assert_eq!(
            html,
            concat!(
                r#"<a href="https://chippy.example.com/?a=1&amp;b=2" target="_blank" rel="noopener sponsored" data-creative-id="42">"#,
                r#"<img src="https://cdn.example.com/ads/a.png" alt="Fish &amp; Chips &lt;Friday&gt;" width="300" height="250" loading="lazy">"#,
                "</a>"
            )
        );
    }

    #[test]
    fn test_direct_without_image_is_empty() {
        let mut c = creative(ProviderKind::Direct);
        c.image_url = String::new();
        assert_eq!(render(&c, &slot()), "");
    }

    #[test]
    fn test_house_image_with_link_has_no_target_attrs() {
        let html = render(&creative(ProviderKind::House), &slot());
        assert!(html.starts_with(r#"<a href="https://chippy.example.com/?a=1&amp;b=2" data-creative-id="42">"#));
        assert!(!html.contains("target="));
    }

    #[test]
    fn test_house_image_without_link_is_bare_img() {
        let mut c = creative(ProviderKind::House);
        c.target_url = String::new();
        let html = render(&c, &slot());
        assert!(html.starts_with("<img "));
        assert!(html.ends_with(r#"data-creative-id="42">"#));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn test_house_markup_fallback_and_empty() {
        let mut c = creative(ProviderKind::House);
        c.creative_type = CreativeType::Html;
        c.markup = "<div>Subscribe</div>".to_string();
        assert_eq!(render(&c, &slot()), "<div>Subscribe</div>");

        c.markup = String::new();
        assert_eq!(render(&c, &slot()), "");
    }

    #[test]
    fn test_sponsor_has_label() {
        let html = render(&creative(ProviderKind::Sponsor), &slot());
        assert!(html.starts_with(r#"<div class="sponsor-ad" data-creative-id="42">"#));
        assert!(html.contains("Sponsored by"));
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.ends_with("</a></div>"));
    }

    #[test]
    fn test_sponsor_without_image_is_empty() {
        let mut c = creative(ProviderKind::Sponsor);
        c.image_url = "  ".to_string();
        assert_eq!(render(&c, &slot()), "");
    }

    #[test]
    fn test_attribute_injection_is_escaped() {
        let mut c = creative(ProviderKind::Direct);
        c.image_alt = r#"" onerror="alert(1)"#.to_string();
        let html = render(&c, &slot());
        assert!(!html.contains(r#"" onerror=""#));
        assert!(html.contains("&quot; onerror=&quot;alert(1)"));
    }
}
