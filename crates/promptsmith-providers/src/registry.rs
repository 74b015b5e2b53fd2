//! Provider registry — static descriptors for the 10 supported LLM providers.
//!
//! Each `ProviderDescriptor` says how to reach one provider: which calling
//! family it belongs to, its base URL (for the generic family), the models a
//! caller may pick from, and any identifying headers it expects.

use std::fmt;
use std::str::FromStr;

use promptsmith_core::types::{ModelInfo, ProviderInfo};

use crate::error::GenerateError;

// ─────────────────────────────────────────────
// ProviderId
// ─────────────────────────────────────────────

/// Stable provider tag, as sent by callers (`"openai"`, `"groq"`, …).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenAi,
    Anthropic,
    Google,
    OpenRouter,
    Groq,
    DeepSeek,
    Mistral,
    Cohere,
    Perplexity,
    Together,
}

impl ProviderId {
    /// Every provider, in presentation order.
    pub const ALL: [ProviderId; 10] = [
        ProviderId::OpenAi,
        ProviderId::Anthropic,
        ProviderId::Google,
        ProviderId::OpenRouter,
        ProviderId::Groq,
        ProviderId::DeepSeek,
        ProviderId::Mistral,
        ProviderId::Cohere,
        ProviderId::Perplexity,
        ProviderId::Together,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::OpenAi => "openai",
            ProviderId::Anthropic => "anthropic",
            ProviderId::Google => "google",
            ProviderId::OpenRouter => "openrouter",
            ProviderId::Groq => "groq",
            ProviderId::DeepSeek => "deepseek",
            ProviderId::Mistral => "mistral",
            ProviderId::Cohere => "cohere",
            ProviderId::Perplexity => "perplexity",
            ProviderId::Together => "together",
        }
    }

    /// The static descriptor for this provider.
    pub fn descriptor(self) -> &'static ProviderDescriptor {
        // PROVIDERS is laid out in `ALL` order (checked by a test).
        &PROVIDERS[self as usize]
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| GenerateError::UnknownProvider(s.to_string()))
    }
}

// ─────────────────────────────────────────────
// ProviderDescriptor — static metadata for one provider
// ─────────────────────────────────────────────

/// How a provider is called.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderFamily {
    /// Dedicated OpenAI client: chat completions, key probe by listing models.
    OpenAi,
    /// Dedicated Anthropic client: messages API with a top-level `system` field.
    Anthropic,
    /// Single-prompt `generateContent` API (Gemini). System and user text are
    /// concatenated into one prompt.
    Gemini,
    /// Any OpenAI-compatible `/chat/completions` endpoint at `base_url`.
    OpenAiCompatible,
}

impl ProviderFamily {
    /// Whether the provider is reached through a dedicated client rather than
    /// the generic chat completions call.
    pub fn is_native(self) -> bool {
        !matches!(self, ProviderFamily::OpenAiCompatible)
    }
}

/// One selectable model.
#[derive(Clone, Debug)]
pub struct ModelSpec {
    pub id: &'static str,
    pub name: &'static str,
}

/// Static descriptor of one LLM provider.
#[derive(Clone, Debug)]
pub struct ProviderDescriptor {
    pub id: ProviderId,
    /// Human-readable label, echoed back in generation results.
    pub display_name: &'static str,
    pub family: ProviderFamily,
    /// Base URL for the generic family. `None` for dedicated clients, which
    /// carry their own default endpoint.
    pub base_url: Option<&'static str>,
    /// Model used when the caller leaves the model empty.
    pub default_model: &'static str,
    /// Selectable models, in presentation order.
    pub models: &'static [ModelSpec],
    /// Identifying headers sent verbatim on every call.
    pub extra_headers: &'static [(&'static str, &'static str)],
}

impl ProviderDescriptor {
    /// Whether `model` is one of this provider's listed models.
    pub fn has_model(&self, model: &str) -> bool {
        self.models.iter().any(|m| m.id == model)
    }

    /// Resolve an optional caller model to the one actually used.
    pub fn resolve_model<'a>(&'a self, model: &'a str) -> &'a str {
        if model.is_empty() {
            self.default_model
        } else {
            model
        }
    }

    /// Entry for the provider listing endpoint.
    pub fn to_info(&self) -> ProviderInfo {
        ProviderInfo {
            value: self.id.as_str().to_string(),
            label: self.display_name.to_string(),
            models: self
                .models
                .iter()
                .map(|m| ModelInfo {
                    id: m.id.to_string(),
                    name: m.name.to_string(),
                })
                .collect(),
        }
    }
}

// ─────────────────────────────────────────────
// All 10 providers (in presentation order)
// ─────────────────────────────────────────────

const fn model(id: &'static str, name: &'static str) -> ModelSpec {
    ModelSpec { id, name }
}

/// Complete list of supported provider descriptors, in `ProviderId::ALL` order.
pub static PROVIDERS: &[ProviderDescriptor] = &[
    // 1. OpenAI — dedicated client
    ProviderDescriptor {
        id: ProviderId::OpenAi,
        display_name: "OpenAI",
        family: ProviderFamily::OpenAi,
        base_url: None,
        default_model: "gpt-5",
        models: &[
            model("gpt-5", "GPT-5"),
            model("gpt-5-turbo", "GPT-5 Turbo"),
            model("gpt-5-mini", "GPT-5 Mini"),
            model("gpt-5.2", "GPT-5.2"),
            model("gpt-5.1", "GPT-5.1"),
            model("gpt-4o", "GPT-4o"),
            model("gpt-4o-mini", "GPT-4o Mini"),
            model("gpt-4-turbo", "GPT-4 Turbo"),
            model("gpt-4-turbo-preview", "GPT-4 Turbo Preview"),
            model("gpt-4", "GPT-4"),
            model("gpt-4-32k", "GPT-4 32K"),
            model("gpt-3.5-turbo", "GPT-3.5 Turbo"),
            model("gpt-3.5-turbo-16k", "GPT-3.5 Turbo 16K"),
            model("o1", "o1"),
            model("o1-preview", "o1 Preview"),
            model("o1-mini", "o1 Mini"),
            model("o3-mini", "o3 Mini"),
        ],
        extra_headers: &[],
    },
    // 2. Anthropic — dedicated client
    ProviderDescriptor {
        id: ProviderId::Anthropic,
        display_name: "Anthropic",
        family: ProviderFamily::Anthropic,
        base_url: None,
        default_model: "claude-opus-4-20250514",
        models: &[
            model("claude-opus-4-20250514", "Claude Opus 4"),
            model("claude-sonnet-4-20250514", "Claude Sonnet 4"),
            model("claude-3-5-sonnet-20241022", "Claude 3.5 Sonnet v2"),
            model("claude-3-5-sonnet-20240620", "Claude 3.5 Sonnet"),
            model("claude-3-5-haiku-20241022", "Claude 3.5 Haiku"),
            model("claude-3-opus-20240229", "Claude 3 Opus"),
            model("claude-3-sonnet-20240229", "Claude 3 Sonnet"),
            model("claude-3-haiku-20240307", "Claude 3 Haiku"),
        ],
        extra_headers: &[],
    },
    // 3. Google Gemini — single-prompt generateContent
    ProviderDescriptor {
        id: ProviderId::Google,
        display_name: "Google AI (Gemini)",
        family: ProviderFamily::Gemini,
        base_url: None,
        default_model: "gemini-1.5-flash",
        models: &[
            model("gemini-2.0-flash-exp", "Gemini 2.0 Flash (Experimental)"),
            model("gemini-2.0-flash-thinking-exp", "Gemini 2.0 Flash Thinking"),
            model("gemini-1.5-pro", "Gemini 1.5 Pro"),
            model("gemini-1.5-flash", "Gemini 1.5 Flash"),
            model("gemini-1.5-flash-8b", "Gemini 1.5 Flash 8B"),
            model("gemini-pro", "Gemini Pro"),
        ],
        extra_headers: &[],
    },
    // 4. OpenRouter — gateway, wants referer/title identification
    ProviderDescriptor {
        id: ProviderId::OpenRouter,
        display_name: "OpenRouter",
        family: ProviderFamily::OpenAiCompatible,
        base_url: Some("https://openrouter.ai/api/v1"),
        default_model: "qwen/qwen3-coder:free",
        models: &[
            model("qwen/qwen3-coder:free", "Qwen3 Coder (FREE)"),
            model("qwen/qwen3-next-80b-a3b-instruct:free", "Qwen3 80B (FREE)"),
            model("openai/gpt-oss-120b:free", "GPT-OSS 120B (FREE)"),
            model("openai/gpt-oss-20b:free", "GPT-OSS 20B (FREE)"),
            model("nvidia/nemotron-nano-9b-v2:free", "Nemotron Nano 9B (FREE)"),
            model("nvidia/nemotron-3-nano-30b-a3b:free", "Nemotron 30B (FREE)"),
            model("z-ai/glm-4.5-air:free", "GLM 4.5 Air (FREE)"),
            model("upstage/solar-pro-3:free", "Solar Pro 3 (FREE)"),
            model("liquid/lfm-2.5-1.2b-instruct:free", "LFM 1.2B (FREE)"),
            model("arcee-ai/trinity-large-preview:free", "Trinity Large (FREE)"),
            model("openai/gpt-5", "GPT-5"),
            model("openai/gpt-4o", "GPT-4o"),
            model("openai/gpt-4o-mini", "GPT-4o Mini"),
            model("openai/o1", "o1"),
            model("openai/o1-mini", "o1 Mini"),
            model("anthropic/claude-opus-4", "Claude Opus 4"),
            model("anthropic/claude-sonnet-4", "Claude Sonnet 4"),
            model("anthropic/claude-3.5-sonnet", "Claude 3.5 Sonnet"),
            model("anthropic/claude-3-haiku", "Claude 3 Haiku"),
            model("google/gemini-2.0-flash", "Gemini 2.0 Flash"),
            model("google/gemini-pro-1.5", "Gemini Pro 1.5"),
            model("google/gemini-flash-1.5", "Gemini Flash 1.5"),
            model("meta-llama/llama-3.3-70b-instruct", "Llama 3.3 70B"),
            model("meta-llama/llama-3.1-405b-instruct", "Llama 3.1 405B"),
            model("deepseek/deepseek-chat", "DeepSeek Chat"),
            model("deepseek/deepseek-r1", "DeepSeek R1"),
            model("mistralai/mistral-large", "Mistral Large"),
            model("qwen/qwen-2.5-72b-instruct", "Qwen 2.5 72B"),
        ],
        extra_headers: &[
            ("HTTP-Referer", "https://prompt-generator.local"),
            ("X-Title", "Prompt Generator"),
        ],
    },
    // 5. Groq
    ProviderDescriptor {
        id: ProviderId::Groq,
        display_name: "Groq",
        family: ProviderFamily::OpenAiCompatible,
        base_url: Some("https://api.groq.com/openai/v1"),
        default_model: "llama-3.3-70b-versatile",
        models: &[
            model("llama-3.3-70b-versatile", "Llama 3.3 70B"),
            model("llama-3.1-70b-versatile", "Llama 3.1 70B"),
            model("llama-3.1-8b-instant", "Llama 3.1 8B (Instant)"),
            model("llama-guard-3-8b", "Llama Guard 3 8B"),
            model("mixtral-8x7b-32768", "Mixtral 8x7B"),
            model("gemma2-9b-it", "Gemma 2 9B"),
            model("gemma-7b-it", "Gemma 7B"),
        ],
        extra_headers: &[],
    },
    // 6. DeepSeek
    ProviderDescriptor {
        id: ProviderId::DeepSeek,
        display_name: "DeepSeek",
        family: ProviderFamily::OpenAiCompatible,
        base_url: Some("https://api.deepseek.com/v1"),
        default_model: "deepseek-chat",
        models: &[
            model("deepseek-chat", "DeepSeek Chat (V3)"),
            model("deepseek-reasoner", "DeepSeek Reasoner (R1)"),
            model("deepseek-coder", "DeepSeek Coder"),
        ],
        extra_headers: &[],
    },
    // 7. Mistral
    ProviderDescriptor {
        id: ProviderId::Mistral,
        display_name: "Mistral AI",
        family: ProviderFamily::OpenAiCompatible,
        base_url: Some("https://api.mistral.ai/v1"),
        default_model: "mistral-large-latest",
        models: &[
            model("mistral-large-latest", "Mistral Large (Latest)"),
            model("mistral-large-2411", "Mistral Large 2411"),
            model("mistral-medium-latest", "Mistral Medium"),
            model("mistral-small-latest", "Mistral Small"),
            model("open-mistral-nemo", "Mistral Nemo (12B)"),
            model("open-mixtral-8x7b", "Mixtral 8x7B"),
            model("open-mixtral-8x22b", "Mixtral 8x22B"),
        ],
        extra_headers: &[],
    },
    // 8. Cohere — OpenAI compatibility endpoint
    ProviderDescriptor {
        id: ProviderId::Cohere,
        display_name: "Cohere",
        family: ProviderFamily::OpenAiCompatible,
        base_url: Some("https://api.cohere.ai/compatibility/v1"),
        default_model: "command-r-plus",
        models: &[
            model("command-r-plus", "Command R+"),
            model("command-r", "Command R"),
            model("command", "Command"),
            model("command-light", "Command Light"),
        ],
        extra_headers: &[],
    },
    // 9. Perplexity
    ProviderDescriptor {
        id: ProviderId::Perplexity,
        display_name: "Perplexity",
        family: ProviderFamily::OpenAiCompatible,
        base_url: Some("https://api.perplexity.ai"),
        default_model: "llama-3.1-sonar-large-128k-online",
        models: &[
            model("llama-3.1-sonar-large-128k-online", "Sonar Large 128K (Online)"),
            model("llama-3.1-sonar-small-128k-online", "Sonar Small 128K (Online)"),
            model("llama-3.1-sonar-large-128k-chat", "Sonar Large 128K (Chat)"),
            model("llama-3.1-sonar-small-128k-chat", "Sonar Small 128K (Chat)"),
        ],
        extra_headers: &[],
    },
    // 10. Together
    ProviderDescriptor {
        id: ProviderId::Together,
        display_name: "Together AI",
        family: ProviderFamily::OpenAiCompatible,
        base_url: Some("https://api.together.xyz/v1"),
        default_model: "meta-llama/Meta-Llama-3.1-70B-Instruct-Turbo",
        models: &[
            model("meta-llama/Meta-Llama-3.1-405B-Instruct-Turbo", "Llama 3.1 405B Turbo"),
            model("meta-llama/Meta-Llama-3.1-70B-Instruct-Turbo", "Llama 3.1 70B Turbo"),
            model("meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo", "Llama 3.1 8B Turbo"),
            model("Qwen/Qwen2.5-72B-Instruct-Turbo", "Qwen 2.5 72B Turbo"),
            model("Qwen/Qwen2.5-7B-Instruct-Turbo", "Qwen 2.5 7B Turbo"),
            model("mistralai/Mixtral-8x7B-Instruct-v0.1", "Mixtral 8x7B"),
            model("mistralai/Mixtral-8x22B-Instruct-v0.1", "Mixtral 8x22B"),
        ],
        extra_headers: &[],
    },
];

// ─────────────────────────────────────────────
// Lookup
// ─────────────────────────────────────────────

/// Find a provider descriptor by its string tag.
pub fn lookup(provider_id: &str) -> Result<&'static ProviderDescriptor, GenerateError> {
    provider_id.parse::<ProviderId>().map(ProviderId::descriptor)
}

/// All descriptors, in presentation order.
pub fn list_all() -> &'static [ProviderDescriptor] {
    PROVIDERS
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_providers_follow_id_order() {
        assert_eq!(PROVIDERS.len(), ProviderId::ALL.len());
        for (idx, id) in ProviderId::ALL.iter().enumerate() {
            assert_eq!(PROVIDERS[idx].id, *id);
            assert_eq!(id.descriptor().id, *id);
        }
    }

    #[test]
    fn test_default_model_is_listed() {
        for spec in list_all() {
            assert!(
                spec.has_model(spec.default_model),
                "{} default model {} missing from its model list",
                spec.id,
                spec.default_model
            );
        }
    }

    #[test]
    fn test_lookup_known() {
        let spec = lookup("deepseek").unwrap();
        assert_eq!(spec.display_name, "DeepSeek");
        assert_eq!(spec.base_url, Some("https://api.deepseek.com/v1"));
    }

    #[test]
    fn test_lookup_unknown() {
        let err = lookup("xai").unwrap_err();
        assert!(matches!(err, GenerateError::UnknownProvider(ref id) if id == "xai"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(lookup("OpenAI").is_err());
    }

    #[test]
    fn test_native_providers_have_no_base_url() {
        for spec in list_all() {
            assert_eq!(spec.family.is_native(), spec.base_url.is_none(), "{}", spec.id);
        }
    }

    #[test]
    fn test_only_openrouter_sends_identification_headers() {
        for spec in list_all() {
            if spec.id == ProviderId::OpenRouter {
                let names: Vec<&str> = spec.extra_headers.iter().map(|(k, _)| *k).collect();
                assert_eq!(names, vec!["HTTP-Referer", "X-Title"]);
            } else {
                assert!(spec.extra_headers.is_empty(), "{}", spec.id);
            }
        }
    }

    #[test]
    fn test_resolve_model() {
        let spec = ProviderId::Groq.descriptor();
        assert_eq!(spec.resolve_model(""), "llama-3.3-70b-versatile");
        assert_eq!(spec.resolve_model("gemma2-9b-it"), "gemma2-9b-it");
        // Unlisted models pass through untouched.
        assert_eq!(spec.resolve_model("brand-new-model"), "brand-new-model");
    }

    #[test]
    fn test_to_info() {
        let info = ProviderId::Google.descriptor().to_info();
        assert_eq!(info.value, "google");
        assert_eq!(info.label, "Google AI (Gemini)");
        assert_eq!(info.models[0].id, "gemini-2.0-flash-exp");
    }

    #[test]
    fn test_model_catalog_is_complete() {
        let counts: Vec<(&str, usize)> = PROVIDERS
            .iter()
            .map(|s| (s.id.as_str(), s.models.len()))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("openai", 17),
                ("anthropic", 8),
                ("google", 6),
                ("openrouter", 28),
                ("groq", 7),
                ("deepseek", 3),
                ("mistral", 7),
                ("cohere", 4),
                ("perplexity", 4),
                ("together", 7),
            ]
        );

        for (provider, model) in [
            ("openai", "gpt-5-turbo"),
            ("openai", "gpt-5.2"),
            ("openai", "o1-preview"),
            ("anthropic", "claude-3-5-sonnet-20240620"),
            ("google", "gemini-pro"),
            ("groq", "llama-guard-3-8b"),
            ("openrouter", "nvidia/nemotron-nano-9b-v2:free"),
            ("together", "Qwen/Qwen2.5-7B-Instruct-Turbo"),
        ] {
            assert!(lookup(provider).unwrap().has_model(model), "{provider}/{model}");
        }
    }

    #[test]
    fn test_all_providers_have_unique_ids() {
        let mut names: Vec<&str> = PROVIDERS.iter().map(|s| s.id.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), PROVIDERS.len(), "Duplicate provider ids found");
    }
}
