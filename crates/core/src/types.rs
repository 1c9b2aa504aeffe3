use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Section keys the marketing agent requires on every sealed record.
pub const REQUIRED_SECTIONS: [&str; 3] =
    ["campaign_name", "core_message", "visual_theme_description"];

pub const CAMPAIGN_NAME: &str = "campaign_name";
pub const CORE_MESSAGE: &str = "core_message";
pub const VISUAL_THEME: &str = "visual_theme_description";
pub const EMOTIONAL_APPEAL: &str = "key_emotional_appeal";
pub const SOCIAL_MEDIA_FOCUS: &str = "social_media_focus";
pub const PROMPT_SUGGESTIONS: &str = "prompt_suggestions";

/// A section of a campaign record: either a scalar or a nested mapping of
/// sub-keys to scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionValue {
    Text(String),
    Subsection(IndexMap<String, String>),
}

impl SectionValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SectionValue::Text(s) => Some(s),
            SectionValue::Subsection(_) => None,
        }
    }

    pub fn as_subsection(&self) -> Option<&IndexMap<String, String>> {
        match self {
            SectionValue::Text(_) => None,
            SectionValue::Subsection(map) => Some(map),
        }
    }
}

/// One structured marketing-campaign description assembled from a model's
/// free-text output. Section order matches the order sections appeared in
/// the generated text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    #[serde(flatten)]
    sections: IndexMap<String, SectionValue>,
}

impl CampaignRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record with `campaign_name` already set.
    pub fn with_name(name: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.set_text(CAMPAIGN_NAME, name);
        record
    }

    pub fn set(&mut self, key: impl Into<String>, value: SectionValue) {
        self.sections.insert(key.into(), value);
    }

    pub fn set_text(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.sections
            .insert(key.into(), SectionValue::Text(text.into()));
    }

    pub fn get(&self, key: &str) -> Option<&SectionValue> {
        self.sections.get(key)
    }

    /// Scalar text for `key`, if the section exists and is a scalar.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.sections.get(key).and_then(SectionValue::as_text)
    }

    pub fn subsection(&self, key: &str) -> Option<&IndexMap<String, String>> {
        self.sections.get(key).and_then(SectionValue::as_subsection)
    }

    pub fn campaign_name(&self) -> Option<&str> {
        self.text(CAMPAIGN_NAME)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Required sections that are absent or empty. The parser never enforces
    /// these; the marketing agent rejects records where this is non-empty.
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_SECTIONS
            .iter()
            .filter(|key| match self.sections.get(**key) {
                None => true,
                Some(SectionValue::Text(s)) => s.is_empty(),
                Some(SectionValue::Subsection(map)) => map.is_empty(),
            })
            .copied()
            .collect()
    }
}

/// The three derived image-prompt suggestions attached to a sealed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSuggestions {
    pub product_focused: String,
    pub brand_focused: String,
    pub social_media: String,
}

/// Analysis kind a cached document was produced for. One cache-able unit of
/// work per purpose per subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    Research,
    BrandAnalysis,
    AudienceAnalysis,
    MarketAnalysis,
    CampaignIdeas,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Research => "research",
            Purpose::BrandAnalysis => "brand_analysis",
            Purpose::AudienceAnalysis => "audience_analysis",
            Purpose::MarketAnalysis => "market_analysis",
            Purpose::CampaignIdeas => "campaign_ideas",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (subject, purpose) pair identifying one cache-able unit of work,
/// e.g. ("EcoTech Solutions", Research).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeKey {
    pub subject: String,
    pub purpose: Purpose,
}

impl CompositeKey {
    pub fn new(subject: impl Into<String>, purpose: Purpose) -> Self {
        Self {
            subject: subject.into(),
            purpose,
        }
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.subject, self.purpose)
    }
}

/// Which tier (or fresh generation) produced a cache result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    VolatileHit,
    PersistentHit,
    FreshlyGenerated,
}

/// A result handed back by the tiered cache manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: String,
    pub provenance: Provenance,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_insertion_order() {
        let mut record = CampaignRecord::with_name("Launch Day");
        record.set_text("core_message", "Save energy");
        record.set_text("campaign_timeline", "6 weeks");

        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys, ["campaign_name", "core_message", "campaign_timeline"]);
    }

    #[test]
    fn test_missing_required_reports_absent_and_empty() {
        let mut record = CampaignRecord::with_name("Launch Day");
        record.set_text("core_message", "");

        let missing = record.missing_required();
        assert_eq!(missing, ["core_message", "visual_theme_description"]);
    }

    #[test]
    fn test_record_serializes_as_flat_mapping() {
        let mut record = CampaignRecord::with_name("Launch Day");
        let mut theme = indexmap::IndexMap::new();
        theme.insert("color_palette".to_string(), "green".to_string());
        record.set("visual_theme_description", SectionValue::Subsection(theme));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["campaign_name"], "Launch Day");
        assert_eq!(json["visual_theme_description"]["color_palette"], "green");
    }
}
