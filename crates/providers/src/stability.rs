//! Stability text-to-image API client implementing the image generation
//! capability.

use std::path::{Path, PathBuf};

use adforge_agents::ImageGenerator;
use adforge_core::config::ImageConfig;
use anyhow::Context;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct StabilityClient {
    http: reqwest::Client,
    config: ImageConfig,
}

impl StabilityClient {
    pub fn new(config: ImageConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Serialize)]
struct TextToImageRequest<'a> {
    text_prompts: Vec<TextPrompt<'a>>,
    cfg_scale: f64,
    steps: u32,
    width: u32,
    height: u32,
    samples: u32,
}

#[derive(Serialize)]
struct TextPrompt<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct TextToImageResponse {
    artifacts: Vec<Artifact>,
}

#[derive(Deserialize)]
struct Artifact {
    base64: String,
}

#[async_trait]
impl ImageGenerator for StabilityClient {
    async fn generate(&self, prompt: &str, output_dir: &Path) -> anyhow::Result<PathBuf> {
        let url = format!(
            "{}/v1/generation/{}/text-to-image",
            self.config.api_host, self.config.engine_id
        );
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_key)
            .header("Accept", "application/json")
            .json(&TextToImageRequest {
                text_prompts: vec![TextPrompt { text: prompt }],
                cfg_scale: self.config.cfg_scale,
                steps: self.config.steps,
                width: self.config.width,
                height: self.config.height,
                samples: 1,
            })
            .send()
            .await
            .context("sending image generation request")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("image generation failed with {status}: {detail}");
        }

        let parsed: TextToImageResponse = response
            .json()
            .await
            .context("decoding image generation response")?;
        let artifact = parsed
            .artifacts
            .into_iter()
            .next()
            .context("image generation returned no artifacts")?;

        let bytes = STANDARD
            .decode(artifact.base64)
            .context("decoding image artifact")?;

        tokio::fs::create_dir_all(output_dir).await?;
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
        let path = output_dir.join(format!("sdxl_{timestamp}.png"));
        tokio::fs::write(&path, bytes).await?;

        debug!(path = %path.display(), "image artifact written");
        Ok(path)
    }
}
