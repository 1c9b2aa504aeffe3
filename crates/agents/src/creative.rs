//! Creative agent: tagline, narrative story, and the final image prompt
//! for one sealed campaign record.

use std::sync::Arc;

use adforge_core::types::{
    CampaignRecord, SectionValue, CORE_MESSAGE, EMOTIONAL_APPEAL, PROMPT_SUGGESTIONS, VISUAL_THEME,
};

use crate::llm::TextGenerator;
use crate::prompts;
use crate::retry::RetryPolicy;

/// Text assets generated for one campaign.
#[derive(Debug, Clone)]
pub struct CreativeAssets {
    pub tagline: String,
    pub story: String,
    pub image_prompt: String,
}

pub struct CreativeAgent {
    llm: Arc<dyn TextGenerator>,
    retry: RetryPolicy,
}

impl CreativeAgent {
    pub fn new(llm: Arc<dyn TextGenerator>, retry: RetryPolicy) -> Self {
        Self { llm, retry }
    }

    pub async fn generate_tagline(&self, record: &CampaignRecord) -> anyhow::Result<String> {
        let request = prompts::tagline(
            record.text(CORE_MESSAGE).unwrap_or_default(),
            &section_as_text(record, VISUAL_THEME),
            &section_as_text(record, EMOTIONAL_APPEAL),
        );
        self.retry.generate(self.llm.as_ref(), &request).await
    }

    pub async fn generate_story(&self, record: &CampaignRecord) -> anyhow::Result<String> {
        let request = prompts::narrative(
            record.text(CORE_MESSAGE).unwrap_or_default(),
            &section_as_text(record, VISUAL_THEME),
            &section_as_text(record, EMOTIONAL_APPEAL),
        );
        self.retry.generate(self.llm.as_ref(), &request).await
    }

    pub async fn generate_image_prompt(&self, record: &CampaignRecord) -> anyhow::Result<String> {
        let suggestions = record.subsection(PROMPT_SUGGESTIONS);
        let suggestion = |key: &str| {
            suggestions
                .and_then(|map| map.get(key))
                .map(String::as_str)
                .unwrap_or_default()
        };
        let request = prompts::image_prompt(
            record.campaign_name().unwrap_or_default(),
            suggestion("product_focused"),
            suggestion("brand_focused"),
            suggestion("social_media"),
        );
        self.retry.generate(self.llm.as_ref(), &request).await
    }

    /// Generate all three text assets for a record.
    pub async fn generate_campaign_assets(
        &self,
        record: &CampaignRecord,
    ) -> anyhow::Result<CreativeAssets> {
        let tagline = self.generate_tagline(record).await?;
        let story = self.generate_story(record).await?;
        let image_prompt = self.generate_image_prompt(record).await?;
        Ok(CreativeAssets {
            tagline,
            story,
            image_prompt,
        })
    }
}

/// Flatten a section for prompt interpolation: scalars verbatim,
/// subsections as `key: value` lines, absent sections empty.
fn section_as_text(record: &CampaignRecord, key: &str) -> String {
    match record.get(key) {
        Some(SectionValue::Text(text)) => text.clone(),
        Some(SectionValue::Subsection(map)) => map
            .iter()
            .map(|(sub_key, value)| format!("{sub_key}: {value}"))
            .collect::<Vec<_>>()
            .join("\n"),
        None => String::new(),
    }
}
