//! Tavily search API client implementing the search capability.

use adforge_agents::SearchProvider;
use adforge_core::config::SearchConfig;
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Number of results formatted into the summary handed to the model.
const TOP_RESULTS: usize = 5;

pub struct TavilyClient {
    http: reqwest::Client,
    config: SearchConfig,
}

impl TavilyClient {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    num_results: usize,
    search_depth: &'static str,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(&self, query: &str) -> anyhow::Result<String> {
        let response = self
            .http
            .post(format!("{}/search", self.config.api_base))
            .bearer_auth(&self.config.api_key)
            .json(&SearchRequest {
                query,
                num_results: self.config.num_results,
                search_depth: "advanced",
            })
            .send()
            .await
            .context("sending search request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("search request failed with {status}");
        }

        let parsed: SearchResponse = response.json().await.context("decoding search response")?;
        Ok(format_results(&parsed.results))
    }
}

fn format_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .take(TOP_RESULTS)
        .map(|result| {
            let content = if result.content.is_empty() {
                "No content available"
            } else {
                result.content.as_str()
            };
            format!(
                "Title: {}\nContent: {}\nURL: {}\n",
                result.title, content, result.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_caps_results_and_fills_missing_content() {
        let results: Vec<SearchResult> = (0..8)
            .map(|i| SearchResult {
                title: format!("Result {i}"),
                url: format!("https://example.com/{i}"),
                content: if i == 0 { String::new() } else { format!("snippet {i}") },
            })
            .collect();

        let formatted = format_results(&results);
        assert!(formatted.contains("Title: Result 0"));
        assert!(formatted.contains("Content: No content available"));
        assert!(formatted.contains("Title: Result 4"));
        assert!(!formatted.contains("Title: Result 5"));
    }
}
