//! Config loader — reads `~/.promptsmith/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.promptsmith/config.json`
//! 3. Environment variables `PROMPTSMITH_<SECTION>__<FIELD>` (override JSON)

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::schema::{Config, ProviderConfig};

/// Provider ids with an env override block, paired with their env segment.
const PROVIDER_ENV_NAMES: &[(&str, &str)] = &[
    ("openai", "OPENAI"),
    ("anthropic", "ANTHROPIC"),
    ("google", "GOOGLE"),
    ("openrouter", "OPENROUTER"),
    ("groq", "GROQ"),
    ("deepseek", "DEEPSEEK"),
    ("mistral", "MISTRAL"),
    ("cohere", "COHERE"),
    ("perplexity", "PERPLEXITY"),
    ("together", "TOGETHER"),
];

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the default path + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    load_config_from_path(&config_path)
}

/// Load config from a specific file path.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return apply_env_overrides(Config::default());
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return apply_env_overrides(Config::default());
        }
    };

    let config: Config = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config JSON: {}", e);
            return apply_env_overrides(Config::default());
        }
    };

    apply_env_overrides(config)
}

/// Apply environment variable overrides on top of a loaded config.
///
/// Env var format: `PROMPTSMITH_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `PROMPTSMITH_SERVER__HOST`, `PROMPTSMITH_SERVER__PORT`, `PROMPTSMITH_SERVER__CORS_ORIGINS`
/// - `PROMPTSMITH_DATABASE__PATH`
/// - `PROMPTSMITH_GENERATION__MAX_TOKENS`, `PROMPTSMITH_GENERATION__TEMPERATURE`,
///   `PROMPTSMITH_GENERATION__TIMEOUT_SECS`, `PROMPTSMITH_GENERATION__PROBE_TIMEOUT_SECS`
/// - `PROMPTSMITH_DEFAULT_PROVIDER`
/// - `PROMPTSMITH_PROVIDERS__<NAME>__API_KEY` / `__API_BASE`
fn apply_env_overrides(mut config: Config) -> Config {
    // Server
    if let Ok(val) = std::env::var("PROMPTSMITH_SERVER__HOST") {
        config.server.host = val;
    }
    if let Ok(val) = std::env::var("PROMPTSMITH_SERVER__PORT") {
        if let Ok(p) = val.parse::<u16>() {
            config.server.port = p;
        }
    }
    if let Ok(val) = std::env::var("PROMPTSMITH_SERVER__CORS_ORIGINS") {
        config.server.cors_origins = val;
    }

    // Database
    if let Ok(val) = std::env::var("PROMPTSMITH_DATABASE__PATH") {
        config.database.path = val;
    }

    // Generation
    if let Ok(val) = std::env::var("PROMPTSMITH_GENERATION__MAX_TOKENS") {
        if let Ok(n) = val.parse::<u32>() {
            config.generation.max_tokens = n;
        }
    }
    if let Ok(val) = std::env::var("PROMPTSMITH_GENERATION__TEMPERATURE") {
        if let Ok(t) = val.parse::<f64>() {
            config.generation.temperature = t;
        }
    }
    if let Ok(val) = std::env::var("PROMPTSMITH_GENERATION__TIMEOUT_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.generation.timeout_secs = n;
        }
    }
    if let Ok(val) = std::env::var("PROMPTSMITH_GENERATION__PROBE_TIMEOUT_SECS") {
        if let Ok(n) = val.parse::<u64>() {
            config.generation.probe_timeout_secs = n;
        }
    }

    if let Ok(val) = std::env::var("PROMPTSMITH_DEFAULT_PROVIDER") {
        config.default_provider = val;
    }

    // Provider API keys and bases (by provider name)
    for (name, env_name) in PROVIDER_ENV_NAMES {
        if let Some(provider) = config.providers.get_by_name_mut(name) {
            apply_provider_env(provider, env_name);
        }
    }

    config
}

/// Apply env var overrides for a single provider.
fn apply_provider_env(provider: &mut ProviderConfig, name: &str) {
    if let Ok(val) = std::env::var(format!("PROMPTSMITH_PROVIDERS__{name}__API_KEY")) {
        provider.api_key = val;
    }
    if let Ok(val) = std::env::var(format!("PROMPTSMITH_PROVIDERS__{name}__API_BASE")) {
        provider.api_base = Some(val);
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp_json(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_missing_file() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.json"));
        assert_eq!(config.generation.max_tokens, 2000);
        assert_eq!(config.generation.timeout_secs, 60);
    }

    #[test]
    fn test_load_valid_json() {
        let file = write_temp_json(
            r#"{
            "server": { "host": "127.0.0.1" },
            "generation": { "maxTokens": 1024 }
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.generation.max_tokens, 1024);
        // Default preserved
        assert_eq!(config.generation.temperature, 0.7);
    }

    #[test]
    fn test_load_invalid_json_returns_defaults() {
        let file = write_temp_json("not valid json {{{");
        let config = load_config_from_path(file.path());
        assert_eq!(config.generation.max_tokens, 2000);
    }

    #[test]
    fn test_load_empty_json() {
        let file = write_temp_json("{}");
        let config = load_config_from_path(file.path());
        assert_eq!(config.database.path, "~/.promptsmith/prompting.db");
    }

    #[test]
    fn test_env_override_provider_key() {
        std::env::set_var("PROMPTSMITH_PROVIDERS__MISTRAL__API_KEY", "mistral-env-key");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.providers.mistral.api_key, "mistral-env-key");
        std::env::remove_var("PROMPTSMITH_PROVIDERS__MISTRAL__API_KEY");
    }

    #[test]
    fn test_env_override_provider_base() {
        std::env::set_var("PROMPTSMITH_PROVIDERS__TOGETHER__API_BASE", "http://proxy.local/v1");
        let config = apply_env_overrides(Config::default());
        assert_eq!(
            config.providers.together.api_base.as_deref(),
            Some("http://proxy.local/v1")
        );
        std::env::remove_var("PROMPTSMITH_PROVIDERS__TOGETHER__API_BASE");
    }

    #[test]
    fn test_env_override_server_port() {
        std::env::set_var("PROMPTSMITH_SERVER__PORT", "9999");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.server.port, 9999);
        std::env::remove_var("PROMPTSMITH_SERVER__PORT");
    }

    #[test]
    fn test_env_override_bad_number_ignored() {
        std::env::set_var("PROMPTSMITH_GENERATION__PROBE_TIMEOUT_SECS", "soon");
        let config = apply_env_overrides(Config::default());
        assert_eq!(config.generation.probe_timeout_secs, 30);
        std::env::remove_var("PROMPTSMITH_GENERATION__PROBE_TIMEOUT_SECS");
    }

    #[test]
    fn test_full_config_with_providers() {
        let file = write_temp_json(
            r#"{
            "providers": {
                "anthropic": { "apiKey": "sk-ant-123" },
                "openrouter": { "apiKey": "sk-or-456", "apiBase": "https://custom.io/v1" },
                "deepseek": { "apiKey": "ds-789" }
            },
            "defaultProvider": "openrouter"
        }"#,
        );

        let config = load_config_from_path(file.path());
        assert!(config.providers.anthropic.is_configured());
        assert!(config.providers.openrouter.is_configured());
        assert_eq!(
            config.providers.openrouter.api_base.as_deref(),
            Some("https://custom.io/v1")
        );
        assert!(config.providers.deepseek.is_configured());
        assert!(!config.providers.openai.is_configured());
        assert_eq!(config.default_provider, "openrouter");
    }
}
