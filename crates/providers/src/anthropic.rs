//! Anthropic messages API client implementing the text generation
//! capability.

use adforge_agents::{GenerationRequest, TextGenerator};
use adforge_core::config::LlmConfig;
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub struct AnthropicClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl AnthropicClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: request.system.as_deref(),
            messages: vec![Message {
                role: "user",
                content: &request.prompt,
            }],
        };

        let response = self
            .http
            .post(format!("{}/v1/messages", self.config.api_base))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(&body)
            .send()
            .await
            .context("sending generation request")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("generation request failed with {status}: {detail}");
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .context("decoding generation response")?;
        let text: String = parsed
            .content
            .into_iter()
            .map(|block| block.text)
            .collect();
        anyhow::ensure!(!text.is_empty(), "generation response contained no text");

        debug!(model = %self.config.model, chars = text.len(), "generation complete");
        Ok(text)
    }
}
