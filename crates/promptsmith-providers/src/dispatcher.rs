//! Provider catalog and generation dispatch.
//!
//! The catalog is built once at startup from the registry and config, then
//! shared read-only behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use promptsmith_core::config::schema::ProviderConfig;
use promptsmith_core::config::Config;

use crate::anthropic::AnthropicProvider;
use crate::error::GenerateError;
use crate::gemini::GeminiProvider;
use crate::http_provider::HttpProvider;
use crate::normalizer;
use crate::registry::{self, ProviderDescriptor, ProviderFamily, ProviderId};
use crate::template::{self, USER_MESSAGE};
use crate::traits::{ChatProvider, RequestConfig};

// ─────────────────────────────────────────────
// ProviderCatalog
// ─────────────────────────────────────────────

/// One adapter per registered provider, plus the shared call settings.
pub struct ProviderCatalog {
    adapters: HashMap<ProviderId, Arc<dyn ChatProvider>>,
    request: RequestConfig,
    probe_timeout: Duration,
}

impl ProviderCatalog {
    /// Build adapters for every provider, applying per-provider config
    /// overrides (API base, extra headers).
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("promptsmith/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut adapters: HashMap<ProviderId, Arc<dyn ChatProvider>> = HashMap::new();
        for descriptor in registry::list_all() {
            let provider_config = config
                .providers
                .get_by_name(descriptor.id.as_str())
                .cloned()
                .unwrap_or_default();
            adapters.insert(
                descriptor.id,
                build_adapter(client.clone(), descriptor, &provider_config),
            );
        }

        info!(providers = adapters.len(), "Provider catalog ready");

        Ok(ProviderCatalog {
            adapters,
            request: RequestConfig {
                max_tokens: config.generation.max_tokens,
                temperature: config.generation.temperature,
                timeout: Duration::from_secs(config.generation.timeout_secs),
            },
            probe_timeout: Duration::from_secs(config.generation.probe_timeout_secs),
        })
    }

    /// Replace the adapter for one provider.
    pub fn with_adapter(mut self, id: ProviderId, adapter: Arc<dyn ChatProvider>) -> Self {
        self.adapters.insert(id, adapter);
        self
    }

    pub fn adapter(&self, id: ProviderId) -> Option<&Arc<dyn ChatProvider>> {
        self.adapters.get(&id)
    }

    pub fn request_config(&self) -> &RequestConfig {
        &self.request
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }
}

fn build_adapter(
    client: reqwest::Client,
    descriptor: &'static ProviderDescriptor,
    config: &ProviderConfig,
) -> Arc<dyn ChatProvider> {
    match descriptor.family {
        ProviderFamily::Anthropic => Arc::new(AnthropicProvider::new(client, descriptor, config)),
        ProviderFamily::Gemini => Arc::new(GeminiProvider::new(client, descriptor, config)),
        ProviderFamily::OpenAi | ProviderFamily::OpenAiCompatible => {
            Arc::new(HttpProvider::new(client, descriptor, config))
        }
    }
}

// ─────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────

/// Outcome of a successful generation.
#[derive(Clone, Debug)]
pub struct Generation {
    pub prompts: Vec<String>,
    /// Model id actually used.
    pub model: String,
    pub provider: &'static ProviderDescriptor,
}

/// Routes generation requests to the right adapter.
#[derive(Clone)]
pub struct Dispatcher {
    catalog: Arc<ProviderCatalog>,
}

impl Dispatcher {
    pub fn new(catalog: Arc<ProviderCatalog>) -> Self {
        Self { catalog }
    }

    /// Generate up to five prompts for `role` in `business`.
    ///
    /// Exactly one upstream call is made when the provider is known and the
    /// credential is non-empty. Nothing is retried.
    pub async fn generate(
        &self,
        provider_id: &str,
        credential: &str,
        model: &str,
        business: &str,
        role: &str,
        template: &str,
    ) -> Result<Generation, GenerateError> {
        let descriptor = registry::lookup(provider_id)?;
        if credential.is_empty() {
            return Err(GenerateError::MissingCredential);
        }
        let adapter = self
            .catalog
            .adapter(descriptor.id)
            .ok_or_else(|| GenerateError::UnknownProvider(provider_id.to_string()))?;

        let model = descriptor.resolve_model(model).to_string();
        let instruction = template::render(template, role, business);

        debug!(
            provider = adapter.display_name(),
            model = %model,
            custom_template = !template.is_empty(),
            "Dispatching generation"
        );

        let raw = adapter
            .complete(
                credential,
                &instruction,
                USER_MESSAGE,
                &model,
                self.catalog.request_config(),
            )
            .await?;

        let prompts = normalizer::parse(&raw);
        info!(
            provider = descriptor.id.as_str(),
            model = %model,
            prompts = prompts.len(),
            "Generation complete"
        );

        Ok(Generation {
            prompts,
            model,
            provider: descriptor,
        })
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpstreamError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Records every call and replies with a canned result.
    struct ScriptedProvider {
        reply: Result<String, u16>,
        calls: Mutex<Vec<(String, String, String)>>,
    }

    impl ScriptedProvider {
        fn new(reply: Result<&str, u16>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(String::from),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatProvider for ScriptedProvider {
        async fn complete(
            &self,
            _credential: &str,
            instruction: &str,
            message: &str,
            model: &str,
            _config: &RequestConfig,
        ) -> Result<String, UpstreamError> {
            self.calls.lock().unwrap().push((
                instruction.to_string(),
                message.to_string(),
                model.to_string(),
            ));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(UpstreamError::Status {
                    status: *status,
                    body: "upstream says no".into(),
                }),
            }
        }

        async fn probe(&self, _credential: &str, _timeout: Duration) -> Result<(), UpstreamError> {
            Ok(())
        }

        fn display_name(&self) -> &str {
            "Scripted"
        }
    }

    fn dispatcher_with(id: ProviderId, adapter: Arc<ScriptedProvider>) -> Dispatcher {
        let catalog = ProviderCatalog::from_config(&Config::default())
            .unwrap()
            .with_adapter(id, adapter);
        Dispatcher::new(Arc::new(catalog))
    }

    #[tokio::test]
    async fn test_generate_resolves_default_model() {
        let scripted = ScriptedProvider::new(Ok("1. One\n2. Two"));
        let dispatcher = dispatcher_with(ProviderId::Groq, scripted.clone());

        let result = dispatcher
            .generate("groq", "gsk", "", "Кофейня в центре Казани", "Бариста", "")
            .await
            .unwrap();

        assert_eq!(result.prompts, vec!["One", "Two"]);
        assert_eq!(result.model, "llama-3.3-70b-versatile");
        assert_eq!(result.provider.display_name, "Groq");

        let calls = scripted.calls();
        assert_eq!(calls.len(), 1);
        let (instruction, message, model) = &calls[0];
        assert!(instruction.contains("Роль сотрудника: Бариста"));
        assert_eq!(message, USER_MESSAGE);
        assert_eq!(model, "llama-3.3-70b-versatile");
    }

    #[tokio::test]
    async fn test_generate_keeps_explicit_model_and_template() {
        let scripted = ScriptedProvider::new(Ok("Prompt"));
        let dispatcher = dispatcher_with(ProviderId::Anthropic, scripted.clone());

        let result = dispatcher
            .generate(
                "anthropic",
                "sk-ant",
                "claude-3-haiku-20240307",
                "Bakery in Lyon",
                "Owner",
                "Help the {role} of {business}",
            )
            .await
            .unwrap();

        assert_eq!(result.model, "claude-3-haiku-20240307");
        assert_eq!(scripted.calls()[0].0, "Help the Owner of Bakery in Lyon");
    }

    #[tokio::test]
    async fn test_unknown_provider_checked_first() {
        let dispatcher = Dispatcher::new(Arc::new(
            ProviderCatalog::from_config(&Config::default()).unwrap(),
        ));
        let err = dispatcher
            .generate("xai", "", "", "Bakery in Lyon", "Owner", "")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::UnknownProvider(ref id) if id == "xai"));
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_call() {
        let scripted = ScriptedProvider::new(Ok("unused"));
        let dispatcher = dispatcher_with(ProviderId::OpenAi, scripted.clone());

        let err = dispatcher
            .generate("openai", "", "", "Bakery in Lyon", "Owner", "")
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingCredential));
        assert!(scripted.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_generation_failed() {
        let scripted = ScriptedProvider::new(Err(503));
        let dispatcher = dispatcher_with(ProviderId::Mistral, scripted);

        let err = dispatcher
            .generate("mistral", "key", "", "Bakery in Lyon", "Owner", "")
            .await
            .unwrap_err();
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_empty_reply_yields_fallback() {
        let scripted = ScriptedProvider::new(Ok(""));
        let dispatcher = dispatcher_with(ProviderId::Cohere, scripted);

        let result = dispatcher
            .generate("cohere", "key", "", "Bakery in Lyon", "Owner", "")
            .await
            .unwrap();
        assert_eq!(result.prompts, vec![normalizer::FALLBACK_PROMPT]);
    }

    #[tokio::test]
    async fn test_config_api_base_reaches_adapter() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-1",
                "choices": [{ "message": { "content": "1. Через прокси" }, "finish_reason": "stop" }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut config = Config::default();
        config.providers.deepseek.api_base = Some(mock_server.uri());
        let dispatcher = Dispatcher::new(Arc::new(ProviderCatalog::from_config(&config).unwrap()));

        let result = dispatcher
            .generate("deepseek", "ds-key", "", "Bakery in Lyon", "Owner", "")
            .await
            .unwrap();
        assert_eq!(result.prompts, vec!["Через прокси"]);
        assert_eq!(result.model, "deepseek-chat");
    }

    #[test]
    fn test_catalog_uses_generation_config() {
        let mut config = Config::default();
        config.generation.max_tokens = 512;
        config.generation.probe_timeout_secs = 7;
        let catalog = ProviderCatalog::from_config(&config).unwrap();
        assert_eq!(catalog.request_config().max_tokens, 512);
        assert_eq!(catalog.probe_timeout(), Duration::from_secs(7));
        for id in ProviderId::ALL {
            assert!(catalog.adapter(id).is_some(), "{id} has no adapter");
        }
    }
}
