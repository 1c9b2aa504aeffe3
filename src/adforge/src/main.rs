//! AdForge — generative marketing campaign asset pipeline.
//!
//! Main entry point: wires the analysis store, tiered cache, provider
//! clients, and agents, then runs research → marketing → asset generation.

use adforge_agents::{
    AdOrchestrator, CreativeAgent, MarketingAgent, ResearchAgent, RetryPolicy, SearchProvider,
};
use adforge_cache::{JsonlStore, TieredCache};
use adforge_core::config::AppConfig;
use adforge_providers::{AnthropicClient, StabilityClient, TavilyClient};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "adforge")]
#[command(about = "Generative marketing campaign asset pipeline")]
#[command(version)]
struct Cli {
    /// Company to build campaigns for
    company: String,

    /// Target audience description
    audience: String,

    /// Number of campaign ideas to request (overrides config)
    #[arg(long, env = "ADFORGE__NUM_CAMPAIGNS")]
    campaigns: Option<usize>,

    /// Directory for generated assets (overrides config)
    #[arg(long, env = "ADFORGE__OUTPUT_DIR")]
    output_dir: Option<String>,

    /// Analysis store file (overrides config)
    #[arg(long, env = "ADFORGE__STORE__PATH")]
    store_path: Option<String>,

    /// Regenerate everything, ignoring both cache tiers
    #[arg(long, default_value_t = false)]
    force_fresh: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adforge=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("AdForge starting up");

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(campaigns) = cli.campaigns {
        config.num_campaigns = campaigns;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(store_path) = cli.store_path {
        config.store.path = store_path;
    }

    anyhow::ensure!(
        !config.llm.api_key.is_empty(),
        "ADFORGE__LLM__API_KEY must be set"
    );

    let session_id = chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string();
    info!(
        session = %session_id,
        company = %cli.company,
        num_campaigns = config.num_campaigns,
        store = %config.store.path,
        "Configuration loaded"
    );

    let store = Arc::new(JsonlStore::new(&config.store.path));
    let cache = Arc::new(TieredCache::new(
        store,
        session_id,
        config.cache.max_entries,
    ));
    let retry = RetryPolicy::from_config(&config.retry);

    let llm = Arc::new(AnthropicClient::new(config.llm.clone()));
    let search: Option<Arc<dyn SearchProvider>> =
        if config.search.enabled && !config.search.api_key.is_empty() {
            Some(Arc::new(TavilyClient::new(config.search.clone())))
        } else {
            warn!("web search disabled, research will rely on the model alone");
            None
        };
    let image = Arc::new(StabilityClient::new(config.image.clone()));

    // Phase 1: research
    let research_agent = ResearchAgent::new(llm.clone(), search, cache.clone(), retry.clone());
    let report = research_agent.run(&cli.company, cli.force_fresh).await?;

    // Phase 2: marketing analyses and campaign ideas
    let marketing_agent = MarketingAgent::new(
        llm.clone(),
        cache.clone(),
        retry.clone(),
        config.num_campaigns,
    );
    let context = format!(
        "{report}\n\nTarget Audience (operator provided):\n{}",
        cli.audience
    );
    let records = marketing_agent
        .run(&cli.company, &context, cli.force_fresh)
        .await?;

    // Phase 3: asset generation
    let orchestrator = AdOrchestrator::new(
        CreativeAgent::new(llm, retry),
        image,
        &config.output_dir,
    );
    let assets = orchestrator.generate_campaign_assets(&records).await?;

    println!("\nGenerated Campaign Assets:");
    println!("{}", "-".repeat(50));
    for campaign in &assets {
        println!("\nCampaign: {}", campaign.campaign_name);
        println!("Directory: {}", campaign.campaign_dir.display());
        println!("- tagline: {}", campaign.tagline_path.display());
        println!("- story: {}", campaign.story_path.display());
        println!("- details: {}", campaign.details_path.display());
        match &campaign.image_path {
            Some(path) => println!("- image: {}", path.display()),
            None => println!("- image: (generation failed)"),
        }
    }

    info!(campaigns = assets.len(), "AdForge run complete");
    Ok(())
}
