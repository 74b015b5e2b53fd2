//! `promptsmith history` — inspect the request log.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::Colorize;
use uuid::Uuid;

use promptsmith_core::config::Config;
use promptsmith_core::history::{HistoryStore, LoggedRequest};
use promptsmith_core::utils::truncate_string;

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List the most recent generations
    List {
        /// How many entries to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Show one generation with all its prompts
    Show {
        /// Request id (from `history list`)
        id: Uuid,
    },

    /// Delete a generation and its prompts
    Delete {
        /// Request id (from `history list`)
        id: Uuid,
    },
}

pub async fn dispatch(config: &Config, action: HistoryCommands) -> Result<()> {
    let path = config.database.resolved_path();
    let store = tokio::task::spawn_blocking(move || HistoryStore::open(&path))
        .await?
        .context("failed to open request log")?;

    match action {
        HistoryCommands::List { limit } => {
            let rows = tokio::task::spawn_blocking(move || store.list_recent(limit)).await??;
            print_list(&rows);
        }
        HistoryCommands::Show { id } => {
            match tokio::task::spawn_blocking(move || store.get(id)).await?? {
                Some(entry) => print_entry(&entry),
                None => bail!("no logged request with id {id}"),
            }
        }
        HistoryCommands::Delete { id } => {
            if tokio::task::spawn_blocking(move || store.delete(id)).await?? {
                println!("{} deleted {}", "✓".green(), id);
            } else {
                bail!("no logged request with id {id}");
            }
        }
    }
    Ok(())
}

fn print_list(rows: &[LoggedRequest]) {
    if rows.is_empty() {
        println!("{}", "(request log is empty)".dimmed());
        return;
    }
    println!();
    for row in rows {
        println!(
            "{}  {}  {:<20} {}",
            row.id.to_string().dimmed(),
            row.created_at.format("%Y-%m-%d %H:%M"),
            truncate_string(&row.role, 20).bold(),
            truncate_string(&row.business, 50),
        );
    }
    println!();
}

fn print_entry(entry: &LoggedRequest) {
    println!();
    println!("  {:<10} {}", "Id:".bold(), entry.id);
    println!("  {:<10} {}", "Created:".bold(), entry.created_at.to_rfc3339());
    println!("  {:<10} {}", "Role:".bold(), entry.role);
    println!("  {:<10} {}", "Business:".bold(), entry.business);
    println!();
    for (i, prompt) in entry.prompts.iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).bold(), prompt.content);
        println!();
    }
}
