//! Marketing agent: brand, audience, and market analyses over the tiered
//! cache, campaign idea generation, and structural validation of sealed
//! records.

use std::sync::Arc;

use adforge_cache::TieredCache;
use adforge_core::error::{AdForgeError, AdForgeResult};
use adforge_core::types::{CampaignRecord, CompositeKey, Purpose};
use adforge_parser::{enrich_with_suggestions, parse_campaigns, MAX_CAMPAIGNS};
use tracing::{info, warn};

use crate::llm::{GenerationRequest, TextGenerator};
use crate::prompts;
use crate::retry::RetryPolicy;

pub struct MarketingAgent {
    llm: Arc<dyn TextGenerator>,
    cache: Arc<TieredCache>,
    retry: RetryPolicy,
    num_campaigns: usize,
}

impl MarketingAgent {
    pub fn new(
        llm: Arc<dyn TextGenerator>,
        cache: Arc<TieredCache>,
        retry: RetryPolicy,
        num_campaigns: usize,
    ) -> Self {
        Self {
            llm,
            cache,
            retry,
            num_campaigns: num_campaigns.clamp(1, MAX_CAMPAIGNS),
        }
    }

    pub async fn analyze_brand(
        &self,
        subject: &str,
        research_data: &str,
        force_fresh: bool,
    ) -> AdForgeResult<String> {
        self.cached_analysis(
            subject,
            Purpose::BrandAnalysis,
            prompts::brand_analysis(research_data),
            force_fresh,
        )
        .await
    }

    pub async fn map_audience(
        &self,
        subject: &str,
        research_data: &str,
        force_fresh: bool,
    ) -> AdForgeResult<String> {
        self.cached_analysis(
            subject,
            Purpose::AudienceAnalysis,
            prompts::audience_mapping(research_data),
            force_fresh,
        )
        .await
    }

    pub async fn assess_market_position(
        &self,
        subject: &str,
        research_data: &str,
        force_fresh: bool,
    ) -> AdForgeResult<String> {
        self.cached_analysis(
            subject,
            Purpose::MarketAnalysis,
            prompts::market_position(research_data),
            force_fresh,
        )
        .await
    }

    /// Generate campaign ideas from the three analyses, parse them into
    /// records, attach prompt suggestions, and drop structurally
    /// incomplete records.
    pub async fn generate_campaign_ideas(
        &self,
        subject: &str,
        brand_analysis: &str,
        audience_profiles: &str,
        market_analysis: &str,
        force_fresh: bool,
    ) -> AdForgeResult<Vec<CampaignRecord>> {
        let request = prompts::campaign_generation(
            market_analysis,
            audience_profiles,
            brand_analysis,
            self.num_campaigns,
        );
        let key = CompositeKey::new(subject, Purpose::CampaignIdeas);
        let entry = self
            .cache
            .get_or_generate(
                &key,
                move || async move { self.retry.generate(self.llm.as_ref(), &request).await },
                force_fresh,
            )
            .await?;

        let mut records = parse_campaigns(&entry.value, self.num_campaigns);
        if records.is_empty() {
            // An unparsable response is a retryable condition for the
            // caller, never something to pass through silently.
            return Err(AdForgeError::Validation(format!(
                "campaign response for {subject} contained no campaign blocks"
            )));
        }

        for record in &mut records {
            enrich_with_suggestions(record);
        }
        Ok(self.validate(records))
    }

    /// Run the full marketing flow over one research report.
    pub async fn run(
        &self,
        subject: &str,
        research_report: &str,
        force_fresh: bool,
    ) -> AdForgeResult<Vec<CampaignRecord>> {
        let brand = self.analyze_brand(subject, research_report, force_fresh).await?;
        let audience = self.map_audience(subject, research_report, force_fresh).await?;
        let market = self
            .assess_market_position(subject, research_report, force_fresh)
            .await?;

        let records = self
            .generate_campaign_ideas(subject, &brand, &audience, &market, force_fresh)
            .await?;
        if records.is_empty() {
            return Err(AdForgeError::Validation(format!(
                "every campaign record for {subject} failed validation"
            )));
        }

        info!(subject, count = records.len(), "campaign records ready");
        Ok(records)
    }

    async fn cached_analysis(
        &self,
        subject: &str,
        purpose: Purpose,
        request: GenerationRequest,
        force_fresh: bool,
    ) -> AdForgeResult<String> {
        let key = CompositeKey::new(subject, purpose);
        let entry = self
            .cache
            .get_or_generate(
                &key,
                move || async move { self.retry.generate(self.llm.as_ref(), &request).await },
                force_fresh,
            )
            .await?;
        Ok(entry.value)
    }

    /// Structural completeness check. Incomplete records are rejected and
    /// excluded from downstream asset generation, never patched.
    fn validate(&self, records: Vec<CampaignRecord>) -> Vec<CampaignRecord> {
        records
            .into_iter()
            .filter(|record| {
                let missing = record.missing_required();
                if missing.is_empty() {
                    return true;
                }
                warn!(
                    campaign = record.campaign_name().unwrap_or("<unnamed>"),
                    missing = ?missing,
                    "rejecting structurally incomplete campaign record"
                );
                metrics::counter!("campaigns.rejected").increment(1);
                false
            })
            .collect()
    }
}
