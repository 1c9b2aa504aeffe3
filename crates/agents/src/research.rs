//! Research agent: question generation, optional web search, findings
//! analysis, combined into one report. The report is obtained through the
//! tiered cache, so repeat runs for the same company skip generation.

use std::sync::Arc;

use adforge_cache::TieredCache;
use adforge_core::error::AdForgeResult;
use adforge_core::types::{CompositeKey, Purpose};
use tracing::{info, warn};

use crate::llm::{SearchProvider, TextGenerator};
use crate::prompts;
use crate::retry::RetryPolicy;

pub struct ResearchAgent {
    llm: Arc<dyn TextGenerator>,
    search: Option<Arc<dyn SearchProvider>>,
    cache: Arc<TieredCache>,
    retry: RetryPolicy,
}

impl ResearchAgent {
    pub fn new(
        llm: Arc<dyn TextGenerator>,
        search: Option<Arc<dyn SearchProvider>>,
        cache: Arc<TieredCache>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            llm,
            search,
            cache,
            retry,
        }
    }

    pub async fn generate_questions(&self, company_name: &str) -> anyhow::Result<String> {
        let request = prompts::research_questions(company_name);
        self.retry.generate(self.llm.as_ref(), &request).await
    }

    pub async fn analyze_data(&self, collected_data: &str) -> anyhow::Result<String> {
        let request = prompts::data_analysis(collected_data);
        self.retry.generate(self.llm.as_ref(), &request).await
    }

    /// Produce the research report for `company_name` through the cache
    /// under `(company, research)`.
    pub async fn run(&self, company_name: &str, force_fresh: bool) -> AdForgeResult<String> {
        let key = CompositeKey::new(company_name, Purpose::Research);
        let entry = self
            .cache
            .get_or_generate(&key, move || self.produce_report(company_name), force_fresh)
            .await?;
        info!(
            company = company_name,
            provenance = ?entry.provenance,
            "research report ready"
        );
        Ok(entry.value)
    }

    async fn produce_report(&self, company_name: &str) -> anyhow::Result<String> {
        let questions = self.generate_questions(company_name).await?;

        let findings = match &self.search {
            Some(search) => {
                let query = format!(
                    "{company_name} company brand market position target audience"
                );
                match search.search(&query).await {
                    Ok(results) => results,
                    Err(e) => {
                        // Search is an enrichment, not a dependency.
                        warn!(company = company_name, error = %e, "web search failed, continuing without findings");
                        String::new()
                    }
                }
            }
            None => String::new(),
        };

        let report_request = prompts::research_report(company_name, &findings);
        let raw_findings = self
            .retry
            .generate(self.llm.as_ref(), &report_request)
            .await?;

        let analysis = self.analyze_data(&raw_findings).await?;

        Ok(format!(
            "Research Questions:\n{questions}\n\nRaw Findings:\n{raw_findings}\n\nAnalysis:\n{analysis}"
        ))
    }
}
