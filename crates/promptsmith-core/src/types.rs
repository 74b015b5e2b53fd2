//! Core types for Promptsmith.
//!
//! Two groups live here:
//! - the OpenAI chat completions wire format spoken by most providers,
//! - the JSON payloads of the public HTTP API (`/api/generate`, `/api/providers`, …).

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Messages (OpenAI chat completions format)
// ─────────────────────────────────────────────

/// A chat message in the OpenAI format.
///
/// Each variant maps to a `role` field value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role")]
pub enum Message {
    #[serde(rename = "system")]
    System { content: String },

    #[serde(rename = "user")]
    User { content: String },
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message::User {
            content: content.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Chat completion request / response
// ─────────────────────────────────────────────

/// Request body for an OpenAI-compatible chat completion API.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

/// Raw chat completion response from an OpenAI-compatible API.
/// Used internally for deserialization.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    pub choices: Vec<ChatChoice>,
}

/// A single choice in a chat completion response.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
    pub finish_reason: Option<String>,
}

/// The assistant message within a chat completion choice.
#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if the provider returned any.
    pub fn first_content(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}

// ─────────────────────────────────────────────
// Public API payloads
// ─────────────────────────────────────────────

/// Bounds on the free-text fields of a generation request, in characters.
pub const BUSINESS_MIN_CHARS: usize = 10;
pub const BUSINESS_MAX_CHARS: usize = 2000;
pub const ROLE_MIN_CHARS: usize = 2;
pub const ROLE_MAX_CHARS: usize = 100;

/// `POST /api/generate` body.
#[derive(Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Business description (10–2000 chars).
    pub business: String,
    /// Employee role (2–100 chars).
    pub role: String,
    /// Provider id, e.g. `"openrouter"`.
    pub provider: String,
    /// Caller's API key for the provider. Never stored or logged.
    #[serde(default)]
    pub api_key: String,
    /// Model id; empty means the provider default.
    #[serde(default)]
    pub model: String,
    /// Custom instruction template; empty means the built-in one.
    #[serde(default)]
    pub system_prompt: String,
}

impl std::fmt::Debug for GenerateRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerateRequest")
            .field("business", &self.business)
            .field("role", &self.role)
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("custom_template", &!self.system_prompt.is_empty())
            .finish()
    }
}

impl GenerateRequest {
    /// Check the length bounds of `business` and `role`.
    ///
    /// Returns a human-readable message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        check_len("business", &self.business, BUSINESS_MIN_CHARS, BUSINESS_MAX_CHARS)?;
        check_len("role", &self.role, ROLE_MIN_CHARS, ROLE_MAX_CHARS)?;
        Ok(())
    }
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(format!(
            "field '{field}' must be {min}-{max} characters long (got {len})"
        ));
    }
    Ok(())
}

/// `POST /api/generate` response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    /// 1–5 generated prompts, in the order the model produced them.
    pub prompts: Vec<String>,
    pub role: String,
    pub business: String,
    /// Provider display label, e.g. `"OpenRouter"`.
    pub provider: String,
    /// Model id actually used.
    pub model: String,
}

/// One selectable model of a provider.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
}

/// One entry of `GET /api/providers`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProviderInfo {
    /// Provider id to send back in requests.
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}

/// `POST /api/test-api` body.
#[derive(Clone, Serialize, Deserialize)]
pub struct KeyCheckRequest {
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
}

impl std::fmt::Debug for KeyCheckRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyCheckRequest")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// `POST /api/test-api` response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KeyCheckResponse {
    pub success: bool,
    pub message: String,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
