//! Anthropic messages API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use promptsmith_core::config::schema::ProviderConfig;
use promptsmith_core::types::Message;

use crate::error::{ensure_success, UpstreamError};
use crate::http_provider::build_headers;
use crate::registry::ProviderDescriptor;
use crate::traits::{ChatProvider, RequestConfig};

pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Cheapest model, used for key probes.
const PROBE_MODEL: &str = "claude-3-haiku-20240307";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// Text of the first text block; empty when the reply has none.
    fn into_text(self) -> String {
        self.content
            .into_iter()
            .find(|b| b.kind == "text")
            .and_then(|b| b.text)
            .unwrap_or_default()
    }
}

pub struct AnthropicProvider {
    client: reqwest::Client,
    api_base: String,
    extra_headers: HeaderMap,
    descriptor: &'static ProviderDescriptor,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(
        client: reqwest::Client,
        descriptor: &'static ProviderDescriptor,
        config: &ProviderConfig,
    ) -> Self {
        AnthropicProvider {
            client,
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| ANTHROPIC_API_BASE.to_string()),
            extra_headers: build_headers(descriptor, config),
            descriptor,
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.api_base.trim_end_matches('/'))
    }

    async fn send(
        &self,
        credential: &str,
        body: &MessagesRequest<'_>,
        timeout: Duration,
    ) -> Result<reqwest::Response, UpstreamError> {
        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", credential)
            .header("anthropic-version", ANTHROPIC_VERSION)
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
impl ChatProvider for AnthropicProvider {
    async fn complete(
        &self,
        credential: &str,
        instruction: &str,
        message: &str,
        model: &str,
        config: &RequestConfig,
    ) -> Result<String, UpstreamError> {
        debug!(provider = self.descriptor.display_name, model, "Calling LLM");

        let body = MessagesRequest {
            model,
            max_tokens: config.max_tokens,
            system: Some(instruction),
            messages: vec![Message::user(message)],
            temperature: Some(config.temperature),
        };
        let response = self.send(credential, &body, config.timeout).await?;

        let reply: MessagesResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Malformed(e.to_string()))?;
        Ok(reply.into_text())
    }

    async fn probe(&self, credential: &str, timeout: Duration) -> Result<(), UpstreamError> {
        let body = MessagesRequest {
            model: PROBE_MODEL,
            max_tokens: 10,
            system: None,
            messages: vec![Message::user("Hi")],
            temperature: None,
        };
        self.send(credential, &body, timeout).await?;
        Ok(())
    }

    fn display_name(&self) -> &str {
        self.descriptor.display_name
    }
}
