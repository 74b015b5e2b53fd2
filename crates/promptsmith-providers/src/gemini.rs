//! Gemini `generateContent` client.
//!
//! Gemini takes a single prompt here, so the instruction and the user message
//! are joined with a blank line.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use promptsmith_core::config::schema::ProviderConfig;

use crate::error::{ensure_success, UpstreamError};
use crate::http_provider::build_headers;
use crate::registry::ProviderDescriptor;
use crate::traits::{ChatProvider, RequestConfig};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

pub struct GeminiProvider {
    client: reqwest::Client,
    api_base: String,
    extra_headers: HeaderMap,
    descriptor: &'static ProviderDescriptor,
}

impl std::fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GeminiProvider {
    pub fn new(
        client: reqwest::Client,
        descriptor: &'static ProviderDescriptor,
        config: &ProviderConfig,
    ) -> Self {
        GeminiProvider {
            client,
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| GEMINI_API_BASE.to_string()),
            extra_headers: build_headers(descriptor, config),
            descriptor,
        }
    }

    fn base(&self) -> &str {
        self.api_base.trim_end_matches('/')
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base(), model)
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    async fn complete(
        &self,
        credential: &str,
        instruction: &str,
        message: &str,
        model: &str,
        config: &RequestConfig,
    ) -> Result<String, UpstreamError> {
        debug!(provider = self.descriptor.display_name, model, "Calling LLM");

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(format!("{instruction}\n\n{message}")),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_tokens,
            },
        };

        let response = self
            .client
            .post(self.generate_url(model))
            .header("x-goog-api-key", credential)
            .headers(self.extra_headers.clone())
            .timeout(config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.descriptor.display_name, error = %e, "HTTP request failed");
                UpstreamError::from(e)
            })?;
        let response = ensure_success(self.descriptor.display_name, response).await?;

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Malformed(e.to_string()))?;

        // Blocked prompts come back without candidates.
        let candidate = reply
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::Malformed("no candidates in response".into()))?;

        Ok(candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default())
    }

    async fn probe(&self, credential: &str, timeout: Duration) -> Result<(), UpstreamError> {
        let response = self
            .client
            .get(format!("{}/models", self.base()))
            .header("x-goog-api-key", credential)
            .headers(self.extra_headers.clone())
            .timeout(timeout)
            .send()
            .await?;
        ensure_success(self.descriptor.display_name, response).await?;
        Ok(())
    }

    fn display_name(&self) -> &str {
        self.descriptor.display_name
    }
}
