//! Promptsmith CLI — entry point.
//!
//! # Commands
//!
//! - `promptsmith serve [--no-history]` — run the HTTP API
//! - `promptsmith generate -b BUSINESS -r ROLE [-p PROVIDER] [-m MODEL]` — one-off generation
//! - `promptsmith check-key [-p PROVIDER]` — probe an API key
//! - `promptsmith providers` — list providers and models
//! - `promptsmith history list|show|delete` — inspect the request log
//! - `promptsmith status` — show configuration and provider status

mod helpers;
mod history_cmd;
mod serve;
mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use promptsmith_core::config::{load_config, Config};
use promptsmith_core::history::HistoryStore;
use promptsmith_core::types::GenerateRequest;
use promptsmith_providers::registry;
use promptsmith_providers::{Dispatcher, KeyValidator, ProviderCatalog};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Promptsmith — role-specific AI prompt generator backed by 10 LLM providers
#[derive(Parser)]
#[command(name = "promptsmith", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.promptsmith/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    logs: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Keep the request log in memory only
        #[arg(long, default_value_t = false)]
        no_history: bool,
    },

    /// Generate prompts once and print them
    Generate {
        /// Business description (10–2000 characters)
        #[arg(short, long)]
        business: String,

        /// Employee role (2–100 characters)
        #[arg(short, long)]
        role: String,

        /// Provider id (default: `defaultProvider` from config)
        #[arg(short, long)]
        provider: Option<String>,

        /// Model id (default: the provider's default model)
        #[arg(short, long, default_value = "")]
        model: String,

        /// API key (default: the provider's key from config)
        #[arg(short = 'k', long)]
        api_key: Option<String>,

        /// File with a custom instruction template using {role} and {business}
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Do not write the result to the request log
        #[arg(long, default_value_t = false)]
        no_history: bool,
    },

    /// Check that an API key is accepted by a provider
    CheckKey {
        /// Provider id (default: `defaultProvider` from config)
        #[arg(short, long)]
        provider: Option<String>,

        /// API key (default: the provider's key from config)
        #[arg(short = 'k', long)]
        api_key: Option<String>,
    },

    /// List providers and their selectable models
    Providers,

    /// Inspect the request log
    History {
        #[command(subcommand)]
        action: history_cmd::HistoryCommands,
    },

    /// Show configuration and provider status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let quiet_default = !matches!(cli.command, Commands::Serve { .. });
    init_logging(cli.logs, cli.json_logs, quiet_default);

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Serve { no_history } => serve::run(&config, no_history).await,
        Commands::Generate {
            business,
            role,
            provider,
            model,
            api_key,
            template,
            no_history,
        } => {
            let request = GenerateRequest {
                provider: provider.unwrap_or_else(|| config.default_provider.clone()),
                business,
                role,
                api_key: String::new(),
                model,
                system_prompt: match template {
                    Some(path) => std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read template {}", path.display()))?,
                    None => String::new(),
                },
            };
            let api_key = helpers::resolve_api_key(&config, &request.provider, api_key);
            run_generate(&config, GenerateRequest { api_key, ..request }, no_history).await
        }
        Commands::CheckKey { provider, api_key } => {
            let provider = provider.unwrap_or_else(|| config.default_provider.clone());
            let api_key = helpers::resolve_api_key(&config, &provider, api_key);
            run_check_key(&config, &provider, &api_key).await
        }
        Commands::Providers => {
            helpers::print_providers(registry::list_all());
            Ok(())
        }
        Commands::History { action } => history_cmd::dispatch(&config, action).await,
        Commands::Status => status::run(&config, cli.config.as_deref()),
    }
}

// ─────────────────────────────────────────────
// generate / check-key
// ─────────────────────────────────────────────

fn build_catalog(config: &Config) -> Result<Arc<ProviderCatalog>> {
    let catalog = ProviderCatalog::from_config(config).context("failed to build HTTP client")?;
    Ok(Arc::new(catalog))
}

async fn run_generate(config: &Config, request: GenerateRequest, no_history: bool) -> Result<()> {
    if let Err(msg) = request.validate() {
        bail!(msg);
    }

    let dispatcher = Dispatcher::new(build_catalog(config)?);
    let generation = dispatcher
        .generate(
            &request.provider,
            &request.api_key,
            &request.model,
            &request.business,
            &request.role,
            &request.system_prompt,
        )
        .await
        .map_err(|e| {
            if e.is_client_error() {
                anyhow::anyhow!(e)
            } else {
                anyhow::anyhow!("Ошибка генерации: {e}")
            }
        })?;

    helpers::print_prompts(
        generation.provider.display_name,
        &generation.model,
        &generation.prompts,
    );

    if !no_history {
        let path = config.database.resolved_path();
        let prompts = generation.prompts;
        let logged = tokio::task::spawn_blocking(move || {
            HistoryStore::open(&path)?.record(&request.business, &request.role, &prompts)
        })
        .await?
        .context("failed to write request log")?;
        info!(request_id = %logged.id, "generation logged");
        println!("  {}", format!("logged as {}", logged.id).dimmed());
        println!();
    }

    Ok(())
}

async fn run_check_key(config: &Config, provider: &str, api_key: &str) -> Result<()> {
    let validator = KeyValidator::new(build_catalog(config)?);
    let check = validator.check(provider, api_key).await;

    if check.ok {
        println!("{} {}", "✓".green(), check.message);
        Ok(())
    } else {
        bail!(check.message)
    }
}

/// Initialize tracing/logging.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` enables debug output for
/// Promptsmith crates, and `quiet` limits one-shot commands to warnings.
fn init_logging(verbose: bool, json: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("promptsmith=debug,tower_http=debug,info")
        } else if quiet {
            EnvFilter::new("warn")
        } else {
            EnvFilter::new("info")
        }
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
