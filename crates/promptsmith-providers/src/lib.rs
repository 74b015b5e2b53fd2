//! LLM provider layer for Promptsmith.
//!
//! # Architecture
//!
//! - [`registry`] — static descriptors for the 10 supported providers
//! - [`traits::ChatProvider`] — trait every calling family implements
//! - [`http_provider::HttpProvider`] — OpenAI and OpenAI-compatible chat completions
//! - [`anthropic::AnthropicProvider`] — Anthropic messages API
//! - [`gemini::GeminiProvider`] — Gemini `generateContent`
//! - [`dispatcher::Dispatcher`] — template → one upstream call → normalized prompts
//! - [`validator::KeyValidator`] — credential probes with human-readable verdicts

pub mod anthropic;
pub mod dispatcher;
pub mod error;
pub mod gemini;
pub mod http_provider;
pub mod normalizer;
pub mod registry;
pub mod template;
pub mod traits;
pub mod validator;

// Re-export main types for convenience
pub use dispatcher::{Dispatcher, Generation, ProviderCatalog};
pub use error::{GenerateError, UpstreamError};
pub use registry::{ProviderDescriptor, ProviderFamily, ProviderId, PROVIDERS};
pub use traits::{ChatProvider, RequestConfig};
pub use validator::{KeyCheck, KeyValidator};
