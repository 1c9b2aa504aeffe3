//! Capability traits for the external generation services. Network clients
//! implementing these live in `adforge-providers`; tests use scripted
//! fakes.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A prompt-shaped request to the text generation service.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
        }
    }

    pub fn with_system(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            prompt: prompt.into(),
        }
    }
}

/// Asynchronous text generation. Errors on transport or provider failure;
/// retrying is the caller's concern.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String>;
}

/// Web search returning formatted top results for a query.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> anyhow::Result<String>;
}

/// Text-to-image generation. Renders `prompt` to a file under
/// `output_dir` and returns its path.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, output_dir: &Path) -> anyhow::Result<PathBuf>;
}
