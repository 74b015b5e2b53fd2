//! Shared CLI helpers — key resolution and terminal output.

use colored::Colorize;

use promptsmith_core::config::Config;
use promptsmith_providers::ProviderDescriptor;

/// Pick the API key for `provider`: the explicit flag, else the configured key.
///
/// Returns an empty string when neither is set; the dispatcher and validator
/// report that case themselves.
pub fn resolve_api_key(config: &Config, provider: &str, flag: Option<String>) -> String {
    flag.filter(|k| !k.is_empty())
        .or_else(|| {
            config
                .providers
                .get_by_name(provider)
                .filter(|p| p.is_configured())
                .map(|p| p.api_key.clone())
        })
        .unwrap_or_default()
}

/// Print the banner shown when the server starts.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "✎ Promptsmith".cyan().bold(), version.dimmed());
    println!();
}

/// Print generated prompts, numbered.
pub fn print_prompts(provider_label: &str, model: &str, prompts: &[String]) {
    println!();
    println!(
        "{} {}",
        provider_label.cyan().bold(),
        format!("({model})").dimmed()
    );
    println!();
    for (i, prompt) in prompts.iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).bold(), prompt);
        println!();
    }
}

/// Print every provider with its models, marking the default.
pub fn print_providers(providers: &[ProviderDescriptor]) {
    println!();
    for spec in providers {
        println!(
            "{} {}",
            spec.display_name.bold(),
            format!("[{}]", spec.id).dimmed()
        );
        for model in spec.models {
            let marker = if model.id == spec.default_model {
                "*".green().to_string()
            } else {
                " ".to_string()
            };
            println!("  {} {:<48} {}", marker, model.id, model.name.dimmed());
        }
        println!();
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_groq_key() -> Config {
        let mut config = Config::default();
        config.providers.groq.api_key = "gsk-config".to_string();
        config
    }

    #[test]
    fn flag_wins_over_config() {
        let config = config_with_groq_key();
        let key = resolve_api_key(&config, "groq", Some("gsk-flag".to_string()));
        assert_eq!(key, "gsk-flag");
    }

    #[test]
    fn config_used_without_flag() {
        let config = config_with_groq_key();
        assert_eq!(resolve_api_key(&config, "groq", None), "gsk-config");
        assert_eq!(resolve_api_key(&config, "groq", Some(String::new())), "gsk-config");
    }

    #[test]
    fn missing_key_is_empty() {
        let config = config_with_groq_key();
        assert_eq!(resolve_api_key(&config, "openai", None), "");
        assert_eq!(resolve_api_key(&config, "xai", None), "");
    }
}
