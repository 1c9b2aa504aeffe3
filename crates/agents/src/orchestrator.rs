//! Orchestrates per-campaign asset generation: creative text assets, image
//! rendering, and the on-disk campaign directory layout.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use adforge_core::error::{AdForgeError, AdForgeResult};
use adforge_core::types::CampaignRecord;
use chrono::Utc;
use tracing::{error, info, warn};

use crate::creative::CreativeAgent;
use crate::llm::ImageGenerator;

/// Paths of everything written for one campaign. `image_path` is `None`
/// when image generation failed; the text assets stand on their own.
#[derive(Debug, Clone)]
pub struct CampaignAssets {
    pub campaign_name: String,
    pub campaign_dir: PathBuf,
    pub tagline_path: PathBuf,
    pub story_path: PathBuf,
    pub details_path: PathBuf,
    pub image_path: Option<PathBuf>,
}

pub struct AdOrchestrator {
    creative: CreativeAgent,
    image: Arc<dyn ImageGenerator>,
    output_dir: PathBuf,
}

impl AdOrchestrator {
    pub fn new(
        creative: CreativeAgent,
        image: Arc<dyn ImageGenerator>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            creative,
            image,
            output_dir: output_dir.into(),
        }
    }

    /// Generate assets for every record. A record whose text generation
    /// fails is skipped with an error log; the rest proceed.
    pub async fn generate_campaign_assets(
        &self,
        records: &[CampaignRecord],
    ) -> AdForgeResult<Vec<CampaignAssets>> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let mut results = Vec::with_capacity(records.len());
        for record in records {
            match self.generate_single(record).await {
                Ok(assets) => results.push(assets),
                Err(e) => {
                    error!(
                        campaign = record.campaign_name().unwrap_or("<unnamed>"),
                        error = %e,
                        "asset generation failed for campaign"
                    );
                    metrics::counter!("assets.campaign_failures").increment(1);
                }
            }
        }
        Ok(results)
    }

    /// Generate assets for one record.
    pub async fn generate_single(&self, record: &CampaignRecord) -> AdForgeResult<CampaignAssets> {
        let name = record.campaign_name().unwrap_or("untitled").to_string();
        let campaign_dir = self.create_campaign_dir(&name).await?;

        let assets = self
            .creative
            .generate_campaign_assets(record)
            .await
            .map_err(|e| AdForgeError::Generation(e.to_string()))?;

        let tagline_path = save_text_asset(&campaign_dir, "tagline.txt", &assets.tagline).await?;
        let story_path = save_text_asset(&campaign_dir, "story.txt", &assets.story).await?;

        // An image failure never invalidates the text assets already on
        // disk for this record.
        let image_path = match self.image.generate(&assets.image_prompt, &campaign_dir).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(campaign = %name, error = %e, "image generation failed, keeping text assets");
                metrics::counter!("assets.image_failures").increment(1);
                None
            }
        };

        let mut details = serde_json::to_value(record)?;
        if let Some(object) = details.as_object_mut() {
            object.insert(
                "generated_assets".to_string(),
                serde_json::json!({
                    "tagline": assets.tagline,
                    "story": assets.story,
                    "image_prompt": assets.image_prompt,
                    "image_path": image_path,
                }),
            );
        }
        let details_path = save_text_asset(
            &campaign_dir,
            "campaign_details.json",
            &serde_json::to_string_pretty(&details)?,
        )
        .await?;

        info!(campaign = %name, dir = %campaign_dir.display(), "campaign assets written");
        Ok(CampaignAssets {
            campaign_name: name,
            campaign_dir,
            tagline_path,
            story_path,
            details_path,
            image_path,
        })
    }

    async fn create_campaign_dir(&self, campaign_name: &str) -> AdForgeResult<PathBuf> {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let dir = self
            .output_dir
            .join(format!("{}_{timestamp}", sanitize_filename(campaign_name)));
        tokio::fs::create_dir_all(&dir).await?;
        Ok(dir)
    }
}

async fn save_text_asset(dir: &Path, filename: &str, content: &str) -> AdForgeResult<PathBuf> {
    let path = dir.join(filename);
    tokio::fs::write(&path, content).await?;
    Ok(path)
}

/// Replace anything non-alphanumeric so the name is safe on every
/// filesystem.
fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    sanitized.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{GenerationRequest, TextGenerator};
    use crate::retry::RetryPolicy;
    use async_trait::async_trait;

    struct StaticGenerator;

    #[async_trait]
    impl TextGenerator for StaticGenerator {
        async fn generate(&self, _request: &GenerationRequest) -> anyhow::Result<String> {
            Ok("generated copy".to_string())
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

    struct BrokenImageGenerator;

    #[async_trait]
    impl ImageGenerator for BrokenImageGenerator {
        async fn generate(&self, _prompt: &str, _output_dir: &Path) -> anyhow::Result<PathBuf> {
            anyhow::bail!("render farm offline")
        }
    }

    fn record() -> CampaignRecord {
        adforge_parser::parse_campaigns(
            "Campaign: Launch Day\n1. Core Message: Save energy",
            1,
        )
        .remove(0)
    }

    fn creative() -> CreativeAgent {
        CreativeAgent::new(
            Arc::new(StaticGenerator),
            RetryPolicy::new(1, std::time::Duration::ZERO, std::time::Duration::ZERO),
        )
    }

    #[tokio::test]
    async fn test_assets_land_in_a_sanitized_campaign_dir() {
        let out = tempfile::tempdir().unwrap();
        let orchestrator =
            AdOrchestrator::new(creative(), Arc::new(FakeImageGenerator), out.path());

        let results = orchestrator
            .generate_campaign_assets(&[record()])
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        let assets = &results[0];
        let dir_name = assets.campaign_dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(dir_name.starts_with("Launch_Day_"));
        assert!(assets.tagline_path.exists());
        assert!(assets.story_path.exists());
        assert!(assets.details_path.exists());
        assert!(assets.image_path.as_ref().unwrap().exists());

        let details: serde_json::Value = serde_json::from_str(
            &tokio::fs::read_to_string(&assets.details_path).await.unwrap(),
        )
        .unwrap();
        assert_eq!(details["campaign_name"], "Launch Day");
        assert_eq!(details["generated_assets"]["tagline"], "generated copy");
    }

    #[tokio::test]
    async fn test_image_failure_keeps_text_assets() {
        let out = tempfile::tempdir().unwrap();
        let orchestrator =
            AdOrchestrator::new(creative(), Arc::new(BrokenImageGenerator), out.path());

        let assets = orchestrator.generate_single(&record()).await.unwrap();
        assert!(assets.image_path.is_none());
        assert!(assets.tagline_path.exists());
        assert!(assets.story_path.exists());
    }

    #[test]
    fn test_sanitize_filename_strips_special_characters() {
        assert_eq!(sanitize_filename("Launch Day: Go!"), "Launch_Day__Go");
        assert_eq!(sanitize_filename("  edges  "), "edges");
    }
}
