//! Configuration system — schema, loading, and env var overrides.
//!
//! # Usage
//! ```no_run
//! use promptsmith_core::config;
//!
//! let cfg = config::load_config(None);
//! println!("Listening on {}:{}", cfg.server.host, cfg.server.port);
//! ```

pub mod loader;
pub mod schema;

// Re-export key types
pub use loader::{get_config_path, load_config};
pub use schema::Config;
