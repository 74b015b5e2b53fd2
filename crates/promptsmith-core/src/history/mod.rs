//! Request log — every successful generation and the prompts it produced.
//!
//! # Storage (SQLite)
//!
//! - `prompt_requests`: one row per generation (business, role, created_at)
//! - `generated_prompts`: the prompts of a request, ordered by `position`,
//!   `request_id` references `prompt_requests(id) ON DELETE CASCADE`
//!
//! A request and its prompts are written in a single transaction, so a
//! failed write never leaves a request without its prompts.

pub mod store;

pub use store::{HistoryError, HistoryStore, LoggedPrompt, LoggedRequest};
