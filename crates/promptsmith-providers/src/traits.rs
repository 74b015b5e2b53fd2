//! Provider trait — the seam between the dispatcher and each calling family.
//!
//! `HttpProvider` covers OpenAI and every OpenAI-compatible API,
//! `AnthropicProvider` the messages API, `GeminiProvider` `generateContent`.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::UpstreamError;

/// Sampling and timeout settings passed to each generation call.
#[derive(Clone, Debug)]
pub struct RequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Total time allowed for the round trip.
    pub timeout: Duration,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 2000,
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Trait that all provider adapters implement.
///
/// The credential is passed per call and never kept by the adapter.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Run one completion and return the raw reply text.
    ///
    /// # Arguments
    /// * `credential`  — Caller's API key.
    /// * `instruction` — Rendered system instruction.
    /// * `message`     — User message.
    /// * `model`       — Resolved model id.
    /// * `config`      — Sampling and timeout settings.
    async fn complete(
        &self,
        credential: &str,
        instruction: &str,
        message: &str,
        model: &str,
        config: &RequestConfig,
    ) -> Result<String, UpstreamError>;

    /// Make the cheapest authenticated call the provider offers.
    async fn probe(&self, credential: &str, timeout: Duration) -> Result<(), UpstreamError>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
