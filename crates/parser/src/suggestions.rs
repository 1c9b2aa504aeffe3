//! Derives the three image-prompt suggestions from a sealed campaign
//! record. Pure and deterministic; missing fields render as fixed
//! placeholder text, never as an error.

use adforge_core::types::{
    CampaignRecord, PromptSuggestions, SectionValue, CORE_MESSAGE, EMOTIONAL_APPEAL,
    PROMPT_SUGGESTIONS, SOCIAL_MEDIA_FOCUS, VISUAL_THEME,
};
use indexmap::IndexMap;

/// Produce the product-focused, brand-focused, and social-media prompt
/// variants for one record.
pub fn derive_prompts(record: &CampaignRecord) -> PromptSuggestions {
    let theme_desc = render_theme(record);
    let emotion_desc = render_emotion(record);
    let core_message = record.text(CORE_MESSAGE).unwrap_or_default();

    let product_focused = format!(
        "{theme_desc}. Focus on {core_message}. \
         Style: Professional photography, {emotion_desc}, photorealistic quality, \
         advertisement composition, product-centric, commercial lighting"
    )
    .trim()
    .to_string();

    let brand_focused = format!(
        "Scene capturing {emotion_desc} through {theme_desc}. \
         Emphasizing: {core_message}. \
         Style: Cinematic lighting, emotional depth, photorealistic quality, \
         lifestyle photography, brand storytelling"
    )
    .trim()
    .to_string();

    let (platforms, content_format) = social_focus(record);
    let social_media = format!(
        "Social media content for {platforms}. {theme_desc}. \
         Format: {content_format}. Style: {emotion_desc}, \
         high engagement, platform-optimized, scroll-stopping visuals"
    )
    .trim()
    .to_string();

    PromptSuggestions {
        product_focused,
        brand_focused,
        social_media,
    }
}

/// Derive the prompts and attach them to the record under
/// `prompt_suggestions`, the shape downstream asset generation reads.
pub fn enrich_with_suggestions(record: &mut CampaignRecord) {
    let prompts = derive_prompts(record);
    let mut subsection = IndexMap::new();
    subsection.insert("product_focused".to_string(), prompts.product_focused);
    subsection.insert("brand_focused".to_string(), prompts.brand_focused);
    subsection.insert("social_media".to_string(), prompts.social_media);
    record.set(PROMPT_SUGGESTIONS, SectionValue::Subsection(subsection));
}

/// Human-readable rendering of the visual theme in a fixed field order.
/// A scalar section is used verbatim; an absent one renders all
/// placeholders.
fn render_theme(record: &CampaignRecord) -> String {
    match record.get(VISUAL_THEME) {
        Some(SectionValue::Text(raw)) => raw.clone(),
        Some(SectionValue::Subsection(map)) => theme_from_fields(map),
        None => theme_from_fields(&IndexMap::new()),
    }
}

fn theme_from_fields(map: &IndexMap<String, String>) -> String {
    format!(
        "Color palette: {}. Style: {}. Elements: {}. Mood: {}",
        field(map, "color_palette", "professional"),
        field(map, "photography_illustration_style", "modern"),
        field(map, "key_visual_elements", "clean and minimal"),
        field(map, "mood_and_atmosphere", "professional"),
    )
}

fn render_emotion(record: &CampaignRecord) -> String {
    match record.get(EMOTIONAL_APPEAL) {
        Some(SectionValue::Text(raw)) => raw.clone(),
        Some(SectionValue::Subsection(map)) => emotion_from_fields(map),
        None => emotion_from_fields(&IndexMap::new()),
    }
}

fn emotion_from_fields(map: &IndexMap<String, String>) -> String {
    format!(
        "{} mood with {}",
        field(map, "primary_emotion", "professional"),
        field(map, "supporting_psychological_triggers", "trust and reliability"),
    )
}

/// Platform and content-format framing for the social-media prompt. A
/// scalar section stands in for the platform list.
fn social_focus(record: &CampaignRecord) -> (String, String) {
    match record.get(SOCIAL_MEDIA_FOCUS) {
        Some(SectionValue::Text(raw)) => {
            (raw.clone(), "engaging social media content".to_string())
        }
        Some(SectionValue::Subsection(map)) => (
            field(map, "primary_platforms", "").to_string(),
            field(map, "content_format_recommendations", "").to_string(),
        ),
        None => (String::new(), String::new()),
    }
}

fn field<'a>(map: &'a IndexMap<String, String>, key: &str, placeholder: &'a str) -> &'a str {
    map.get(key).map(String::as_str).unwrap_or(placeholder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::parse_campaigns;

    fn full_record() -> CampaignRecord {
        let raw = "\
Campaign: Launch Day
1. Core Message: Save energy
2. Visual Theme Description:
- Color Palette: forest green
- Photography Illustration Style: documentary
- Key Visual Elements: rooftop panels
- Mood and Atmosphere: hopeful
3. Key Emotional Appeal:
- Primary Emotion: optimism
- Supporting Psychological Triggers: belonging
4. Social Media Focus:
- Primary Platforms: Instagram
- Content Format Recommendations: short reels
";
        parse_campaigns(raw, 1).remove(0)
    }

    #[test]
    fn test_all_three_prompts_compose_from_sections() {
        let prompts = derive_prompts(&full_record());

        assert!(prompts.product_focused.starts_with("Color palette: forest green."));
        assert!(prompts.product_focused.contains("Focus on Save energy"));
        assert!(prompts.product_focused.ends_with("commercial lighting"));

        assert!(prompts.brand_focused.starts_with("Scene capturing optimism mood with belonging"));
        assert!(prompts.brand_focused.contains("Emphasizing: Save energy"));

        assert!(prompts.social_media.starts_with("Social media content for Instagram."));
        assert!(prompts.social_media.contains("Format: short reels"));
    }

    #[test]
    fn test_empty_record_renders_placeholders_not_errors() {
        let prompts = derive_prompts(&CampaignRecord::new());

        assert!(prompts.product_focused.contains("Color palette: professional"));
        assert!(prompts.product_focused.contains("Style: modern"));
        assert!(prompts.product_focused.contains("Elements: clean and minimal"));
        assert!(prompts.brand_focused.contains("professional mood with trust and reliability"));
        assert!(prompts.social_media.starts_with("Social media content for ."));
    }

    #[test]
    fn test_scalar_theme_used_verbatim() {
        let mut record = CampaignRecord::with_name("Scalar");
        record.set_text(VISUAL_THEME, "stark black and white");

        let prompts = derive_prompts(&record);
        assert!(prompts.product_focused.starts_with("stark black and white."));
    }

    #[test]
    fn test_scalar_social_focus_gets_default_format() {
        let mut record = CampaignRecord::with_name("Scalar");
        record.set_text(SOCIAL_MEDIA_FOCUS, "LinkedIn");

        let prompts = derive_prompts(&record);
        assert!(prompts.social_media.starts_with("Social media content for LinkedIn."));
        assert!(prompts.social_media.contains("Format: engaging social media content"));
    }

    #[test]
    fn test_enrich_attaches_subsection_with_exactly_three_keys() {
        let mut record = full_record();
        enrich_with_suggestions(&mut record);

        let attached = record.subsection(PROMPT_SUGGESTIONS).unwrap();
        let keys: Vec<&str> = attached.keys().map(String::as_str).collect();
        assert_eq!(keys, ["product_focused", "brand_focused", "social_media"]);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let record = full_record();
        assert_eq!(derive_prompts(&record), derive_prompts(&record));
    }
}
