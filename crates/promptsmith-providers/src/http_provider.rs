//! HTTP provider for OpenAI and every OpenAI-compatible `/chat/completions` API.
//!
//! Covers: OpenAI, OpenRouter, Groq, DeepSeek, Mistral, Cohere, Perplexity,
//!         Together.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, error, warn};

use promptsmith_core::config::schema::ProviderConfig;
use promptsmith_core::types::{ChatCompletionRequest, ChatCompletionResponse, Message};

use crate::error::{ensure_success, UpstreamError};
use crate::registry::{ProviderDescriptor, ProviderFamily};
use crate::traits::{ChatProvider, RequestConfig};

/// Endpoint used by the OpenAI client when no override is configured.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Merge the descriptor's identifying headers with configured extras.
///
/// Configured headers win on name clashes. Invalid names or values are
/// skipped with a warning.
pub(crate) fn build_headers(descriptor: &ProviderDescriptor, config: &ProviderConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();
    let mut insert = |key: &str, value: &str| {
        if let (Ok(name), Ok(val)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, val);
        } else {
            warn!(provider = descriptor.display_name, "Invalid header: {}", key);
        }
    };

    for (key, value) in descriptor.extra_headers {
        insert(key, value);
    }
    for (key, value) in config.extra_headers.iter().flatten() {
        insert(key, value);
    }
    headers
}

// ─────────────────────────────────────────────
// HttpProvider
// ─────────────────────────────────────────────

/// Talks to an OpenAI-compatible HTTP API.
///
/// The OpenAI descriptor probes by listing models; every other descriptor
/// probes with a 5-token completion against its default model.
pub struct HttpProvider {
    /// HTTP client (shared, connection-pooled).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.groq.com/openai/v1"`).
    api_base: String,
    /// Headers sent with every request (e.g. OpenRouter identification).
    extra_headers: HeaderMap,
    descriptor: &'static ProviderDescriptor,
}

impl std::fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProvider")
            .field("api_base", &self.api_base)
            .field("provider", &self.descriptor.display_name)
            .finish()
    }
}

impl HttpProvider {
    /// Create a provider from a descriptor and its config block.
    ///
    /// API base resolution: config > descriptor > standard OpenAI endpoint.
    pub fn new(
        client: reqwest::Client,
        descriptor: &'static ProviderDescriptor,
        config: &ProviderConfig,
    ) -> Self {
        let api_base = config
            .api_base
            .clone()
            .or_else(|| descriptor.base_url.map(String::from))
            .unwrap_or_else(|| OPENAI_API_BASE.to_string());

        HttpProvider {
            client,
            api_base,
            extra_headers: build_headers(descriptor, config),
            descriptor,
        }
    }

    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }

    fn models_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/models", base)
    }

    async fn post_completion(
        &self,
        credential: &str,
        body: &ChatCompletionRequest,
        timeout: Duration,
    ) -> Result<reqwest::Response, UpstreamError> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(credential)
            .headers(self.extra_headers.clone())
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.descriptor.display_name, error = %e, "HTTP request failed");
                UpstreamError::from(e)
            })?;

        ensure_success(self.descriptor.display_name, response).await
    }
}

#[async_trait]
impl ChatProvider for HttpProvider {
    async fn complete(
        &self,
        credential: &str,
        instruction: &str,
        message: &str,
        model: &str,
        config: &RequestConfig,
    ) -> Result<String, UpstreamError> {
        debug!(provider = self.descriptor.display_name, model, "Calling LLM");

        let body = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![Message::system(instruction), Message::user(message)],
            max_tokens: Some(config.max_tokens),
            temperature: Some(config.temperature),
        };

        let response = self.post_completion(credential, &body, config.timeout).await?;

        let chat: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!(provider = self.descriptor.display_name, error = %e, "Failed to parse LLM response");
            UpstreamError::Malformed(e.to_string())
        })?;

        if chat.choices.is_empty() {
            return Err(UpstreamError::Malformed("no choices in response".into()));
        }

        // A null content parses to the fallback prompt downstream.
        let content = chat.first_content().unwrap_or_default();
        debug!(
            provider = self.descriptor.display_name,
            chars = content.chars().count(),
            "LLM response received"
        );
        Ok(content)
    }

    async fn probe(&self, credential: &str, timeout: Duration) -> Result<(), UpstreamError> {
        if self.descriptor.family == ProviderFamily::OpenAi {
            let response = self
                .client
                .get(self.models_url())
                .bearer_auth(credential)
                .headers(self.extra_headers.clone())
                .timeout(timeout)
                .send()
                .await?;
            ensure_success(self.descriptor.display_name, response).await?;
            return Ok(());
        }

        let body = ChatCompletionRequest {
            model: self.descriptor.default_model.to_string(),
            messages: vec![Message::user("Hi")],
            max_tokens: Some(5),
            temperature: None,
        };
        self.post_completion(credential, &body, timeout).await?;
        Ok(())
    }

    fn display_name(&self) -> &str {
        self.descriptor.display_name
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
