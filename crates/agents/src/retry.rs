//! Bounded exponential backoff around generation calls.

use adforge_core::config::RetryConfig;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::llm::{GenerationRequest, TextGenerator};

/// Retries an async operation up to a fixed attempt ceiling with doubling,
/// capped backoff, returning the last error once the ceiling is exhausted.
///
/// Every error is treated as retryable; no attempt is made to classify
/// transient from permanent failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.base_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }

    /// Run `operation` until it succeeds or the attempt ceiling is hit.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> anyhow::Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let mut delay = self.base_delay;
        let mut attempt = 1u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "generation attempt failed, backing off"
                    );
                    metrics::counter!("retry.attempts").increment(1);
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(self.max_delay);
                    attempt += 1;
                }
                Err(e) => {
                    metrics::counter!("retry.exhausted").increment(1);
                    return Err(e);
                }
            }
        }
    }

    /// The common case: one text-generation call under this policy.
    pub async fn generate(
        &self,
        llm: &dyn TextGenerator,
        request: &GenerationRequest,
    ) -> anyhow::Result<String> {
        self.run(move || llm.generate(request)).await
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
