//! `promptsmith status` — show configuration and provider status.
//!
//! - Shows config path, request log, server and generation settings
//! - Shows API key and endpoint override status for each provider

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use promptsmith_core::config::{get_config_path, Config};
use promptsmith_core::history::HistoryStore;
use promptsmith_providers::registry::PROVIDERS;

fn presence(exists: bool) -> String {
    if exists {
        "✓".green().to_string()
    } else {
        "(not found)".red().to_string()
    }
}

/// Run the status command.
pub fn run(config: &Config, config_path: Option<&Path>) -> Result<()> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);

    println!();
    println!("{}", "✎ Promptsmith Status".cyan().bold());
    println!();

    // Config
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        presence(config_path.exists())
    );

    // Request log
    let db_path = config.database.resolved_path();
    let db_exists = db_path.exists();
    let entries = if db_exists {
        HistoryStore::open(&db_path)
            .and_then(|store| store.count())
            .map(|n| format!("{n} entries").dimmed().to_string())
            .unwrap_or_else(|e| format!("error: {e}").red().to_string())
    } else {
        String::new()
    };
    println!(
        "  {:<18} {} {} {}",
        "Request log:".bold(),
        db_path.display(),
        presence(db_exists),
        entries
    );

    // Server
    println!(
        "  {:<18} {} {}",
        "Server:".bold(),
        config.server.bind_addr(),
        format!("CORS: {}", config.server.cors_origins).dimmed()
    );

    // Generation parameters
    let generation = &config.generation;
    println!(
        "  {:<18} {} | max_tokens: {} | timeout: {}s | probe: {}s",
        "Parameters:".bold(),
        format!("temp: {}", generation.temperature).dimmed(),
        generation.max_tokens,
        generation.timeout_secs,
        generation.probe_timeout_secs,
    );

    println!(
        "  {:<18} {}",
        "Default provider:".bold(),
        config.default_provider
    );

    // Providers
    println!();
    println!("  {}", "Providers:".bold());
    let providers_map = config.providers.to_map();

    for spec in PROVIDERS {
        let prov_config = providers_map.get(spec.id.as_str());
        let mut status = match prov_config {
            Some(p) if p.is_configured() => format!("{} (key set)", "✓".green()),
            _ => format!("{}", "· no key".dimmed()),
        };
        if let Some(base) = prov_config.and_then(|p| p.api_base.as_deref()) {
            status.push_str(&format!(" {}", format!("→ {base}").yellow()));
        }
        println!("    {:<20} {}", spec.display_name, status);
    }

    println!();

    Ok(())
}
