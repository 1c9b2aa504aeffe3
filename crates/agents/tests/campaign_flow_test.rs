//! Integration test for the full research → marketing → asset flow,
//! driven by scripted providers so no network access is required.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use adforge_agents::{
    AdOrchestrator, CreativeAgent, GenerationRequest, ImageGenerator, MarketingAgent,
    ResearchAgent, RetryPolicy, TextGenerator,
};
use adforge_cache::{AnalysisStore, MemoryStore, TieredCache};
use adforge_core::types::{CompositeKey, Provenance, Purpose};
use async_trait::async_trait;
use parking_lot::Mutex;

const CAMPAIGN_RESPONSE: &str = "\
Campaign: Grid Positive
1. Core Message: Give energy back
2. Visual Theme Description:
- Color Palette: amber and slate
- Mood and Atmosphere: confident
3. Key Emotional Appeal:
- Primary Emotion: pride
4. Social Media Focus:
- Primary Platforms: Instagram
- Content Format Recommendations: carousel posts

Campaign: Quiet Savings
1. Core Message: Lower bills without thinking
2. Visual Theme Description:
- Color Palette: soft neutrals
";

/// Hands out one scripted response per call, in order, then repeats the
/// final entry.
struct ScriptedLlm {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<usize>,
}

impl ScriptedLlm {
    fn new(responses: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            calls: Mutex::new(0),
        })
    }

    fn call_count(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl TextGenerator for ScriptedLlm {
    async fn generate(&self, _request: &GenerationRequest) -> anyhow::Result<String> {
        *self.calls.lock() += 1;
        let mut responses = self.responses.lock();
        if responses.len() > 1 {
            Ok(responses.pop_front().unwrap_or_default())
        } else {
            Ok(responses.front().cloned().unwrap_or_default())
        }
    }
}

struct FakeImageGenerator;

#[async_trait]
impl ImageGenerator for FakeImageGenerator {
    async fn generate(&self, _prompt: &str, output_dir: &Path) -> anyhow::Result<PathBuf> {
        let path = output_dir.join("render.png");
        tokio::fs::write(&path, b"png").await?;
        Ok(path)
    }
}

fn no_backoff() -> RetryPolicy {
    RetryPolicy::new(1, std::time::Duration::ZERO, std::time::Duration::ZERO)
}

#[tokio::test]
async fn test_end_to_end_flow_produces_assets_for_each_valid_campaign() {
    let store = Arc::new(MemoryStore::new());
    let cache = Arc::new(TieredCache::new(store.clone(), "session-e2e", 64));

    // research: questions, report, analysis; marketing: brand, audience,
    // market, campaigns; creative: everything after.
    let llm = ScriptedLlm::new(&[
        "questions",
        "raw findings",
        "analysis",
        "brand voice",
        "audience profiles",
        "market position",
        CAMPAIGN_RESPONSE,
        "creative copy",
    ]);

    let research = ResearchAgent::new(llm.clone(), None, cache.clone(), no_backoff());
    let report = research.run("EcoTech Solutions", false).await.unwrap();
    assert!(report.contains("Raw Findings:\nraw findings"));

    let marketing = MarketingAgent::new(llm.clone(), cache.clone(), no_backoff(), 5);
    let records = marketing.run("EcoTech Solutions", &report, false).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].campaign_name(), Some("Grid Positive"));
    assert_eq!(records[1].campaign_name(), Some("Quiet Savings"));

    let out = tempfile::tempdir().unwrap();
    let orchestrator = AdOrchestrator::new(
        CreativeAgent::new(llm.clone(), no_backoff()),
        Arc::new(FakeImageGenerator),
        out.path(),
    );
    let assets = orchestrator.generate_campaign_assets(&records).await.unwrap();

    assert_eq!(assets.len(), 2);
    for campaign in &assets {
        assert!(campaign.tagline_path.exists());
        assert!(campaign.story_path.exists());
        assert!(campaign.image_path.as_ref().unwrap().exists());
    }

    // Every analysis was persisted for later sessions.
    let research_key = CompositeKey::new("EcoTech Solutions", Purpose::Research);
    let filter = adforge_cache::StoreFilter::from_key(&research_key);
    assert_eq!(store.query(&filter, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_second_session_reuses_persisted_research() {
    let store = Arc::new(MemoryStore::new());

    let first_cache = Arc::new(TieredCache::new(store.clone(), "session-1", 64));
    let first_llm = ScriptedLlm::new(&["questions", "raw findings", "analysis"]);
    let first_agent = ResearchAgent::new(first_llm.clone(), None, first_cache, no_backoff());
    let first_report = first_agent.run("EcoTech Solutions", false).await.unwrap();
    assert_eq!(first_llm.call_count(), 3);

    // A new session with an empty volatile tier finds the persisted
    // report; its generator never runs.
    let second_cache = Arc::new(TieredCache::new(store.clone(), "session-2", 64));
    let second_llm = ScriptedLlm::new(&["should not be used"]);
    let second_agent =
        ResearchAgent::new(second_llm.clone(), None, second_cache.clone(), no_backoff());
    let second_report = second_agent.run("EcoTech Solutions", false).await.unwrap();

    assert_eq!(second_report, first_report);
    assert_eq!(second_llm.call_count(), 0);

    let key = CompositeKey::new("EcoTech Solutions", Purpose::Research);
    let entry = second_cache
        .get_or_generate(&key, || async { anyhow::bail!("must not generate") }, false)
        .await
        .unwrap();
    assert_eq!(entry.provenance, Provenance::VolatileHit);
}
