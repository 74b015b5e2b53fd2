//! Core building blocks shared by every Promptsmith crate.
//!
//! - [`config`] — JSON config file + `PROMPTSMITH_*` env overrides
//! - [`types`] — chat completion wire types and the public API payloads
//! - [`history`] — SQLite request log (requests + generated prompts)
//! - [`utils`] — paths, timestamps, string helpers

pub mod config;
pub mod history;
pub mod types;
pub mod utils;
