//! Configuration schema.
//!
//! Hierarchy: `Config` → `ServerConfig`, `DatabaseConfig`, `GenerationConfig`,
//! `ProvidersConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.promptsmith/config.json` + env vars.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub generation: GenerationConfig,
    pub providers: ProvidersConfig,
    /// Provider used by CLI commands when `--provider` is omitted.
    pub default_provider: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            generation: GenerationConfig::default(),
            providers: ProvidersConfig::default(),
            default_provider: "openai".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// Server
// ─────────────────────────────────────────────

/// HTTP server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated list of allowed CORS origins.
    pub cors_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: "http://localhost:3000,http://localhost:5173".to_string(),
        }
    }
}

impl ServerConfig {
    /// The CORS allow-list, split on commas with blanks dropped.
    pub fn cors_origins_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ─────────────────────────────────────────────
// Database
// ─────────────────────────────────────────────

/// Request log storage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseConfig {
    /// SQLite file path. `~` is expanded.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "~/.promptsmith/prompting.db".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// The database path with `~` expanded.
    pub fn resolved_path(&self) -> PathBuf {
        crate::utils::expand_home(&self.path)
    }
}

// ─────────────────────────────────────────────
// Generation
// ─────────────────────────────────────────────

/// Parameters applied to every outbound generation call.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    /// Maximum tokens to generate per response.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Timeout for a generation call, in seconds.
    pub timeout_secs: u64,
    /// Timeout for a credential probe, in seconds.
    pub probe_timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 2000,
            temperature: 0.7,
            timeout_secs: 60,
            probe_timeout_secs: 30,
        }
    }
}

// ─────────────────────────────────────────────
// Providers
// ─────────────────────────────────────────────

/// Configuration for a single LLM provider (API key, base URL, headers).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderConfig {
    /// API key used by CLI commands. The HTTP API always takes the caller's key.
    #[serde(default)]
    pub api_key: String,
    /// Custom API base URL (overrides provider default).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
    /// Extra HTTP headers to send with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_headers: Option<HashMap<String, String>>,
}

impl ProviderConfig {
    /// Whether this provider has a configured API key.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// All provider configurations, one per supported provider id.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: ProviderConfig,
    #[serde(default)]
    pub anthropic: ProviderConfig,
    #[serde(default)]
    pub google: ProviderConfig,
    #[serde(default)]
    pub openrouter: ProviderConfig,
    #[serde(default)]
    pub groq: ProviderConfig,
    #[serde(default)]
    pub deepseek: ProviderConfig,
    #[serde(default)]
    pub mistral: ProviderConfig,
    #[serde(default)]
    pub cohere: ProviderConfig,
    #[serde(default)]
    pub perplexity: ProviderConfig,
    #[serde(default)]
    pub together: ProviderConfig,
}

impl ProvidersConfig {
    /// Get a provider config by name (e.g. `"anthropic"`).
    pub fn get_by_name(&self, name: &str) -> Option<&ProviderConfig> {
        match name {
            "openai" => Some(&self.openai),
            "anthropic" => Some(&self.anthropic),
            "google" => Some(&self.google),
            "openrouter" => Some(&self.openrouter),
            "groq" => Some(&self.groq),
            "deepseek" => Some(&self.deepseek),
            "mistral" => Some(&self.mistral),
            "cohere" => Some(&self.cohere),
            "perplexity" => Some(&self.perplexity),
            "together" => Some(&self.together),
            _ => None,
        }
    }

    /// Mutable access by name, used by env overrides and tests.
    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut ProviderConfig> {
        match name {
            "openai" => Some(&mut self.openai),
            "anthropic" => Some(&mut self.anthropic),
            "google" => Some(&mut self.google),
            "openrouter" => Some(&mut self.openrouter),
            "groq" => Some(&mut self.groq),
            "deepseek" => Some(&mut self.deepseek),
            "mistral" => Some(&mut self.mistral),
            "cohere" => Some(&mut self.cohere),
            "perplexity" => Some(&mut self.perplexity),
            "together" => Some(&mut self.together),
            _ => None,
        }
    }

    /// Convert to a HashMap<String, ProviderConfig> keyed by provider id.
    pub fn to_map(&self) -> HashMap<String, ProviderConfig> {
        let entries: &[(&str, &ProviderConfig)] = &[
            ("openai", &self.openai),
            ("anthropic", &self.anthropic),
            ("google", &self.google),
            ("openrouter", &self.openrouter),
            ("groq", &self.groq),
            ("deepseek", &self.deepseek),
            ("mistral", &self.mistral),
            ("cohere", &self.cohere),
            ("perplexity", &self.perplexity),
            ("together", &self.together),
        ];
        entries
            .iter()
            .map(|(name, config)| (name.to_string(), (*config).clone()))
            .collect()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.generation.max_tokens, 2000);
        assert_eq!(config.generation.temperature, 0.7);
        assert_eq!(config.default_provider, "openai");
    }

    #[test]
    fn test_database_path_expands_home() {
        let db = DatabaseConfig::default();
        let path = db.resolved_path();
        assert!(path.ends_with(".promptsmith/prompting.db"));
        assert!(!path.starts_with("~"));

        let db = DatabaseConfig {
            path: "/var/lib/promptsmith.db".to_string(),
        };
        assert_eq!(db.resolved_path(), PathBuf::from("/var/lib/promptsmith.db"));
    }

    #[test]
    fn test_cors_origins_list() {
        let server = ServerConfig {
            cors_origins: " http://a.test , http://b.test,,".to_string(),
            ..Default::default()
        };
        assert_eq!(
            server.cors_origins_list(),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn test_bind_addr() {
        let server = ServerConfig::default();
        assert_eq!(server.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_providers_get_by_name() {
        let mut providers = ProvidersConfig::default();
        providers.groq.api_key = "gsk-1".to_string();
        assert!(providers.get_by_name("groq").unwrap().is_configured());
        assert!(!providers.get_by_name("openai").unwrap().is_configured());
        assert!(providers.get_by_name("xai").is_none());
    }

    #[test]
    fn test_to_map_contains_every_provider() {
        let map = ProvidersConfig::default().to_map();
        assert_eq!(map.len(), 10);
        assert!(map.contains_key("perplexity"));
    }

    #[test]
    fn test_camel_case_serialization() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert!(json["generation"].get("maxTokens").is_some());
        assert!(json["server"].get("corsOrigins").is_some());
        assert!(json.get("defaultProvider").is_some());
    }
}
