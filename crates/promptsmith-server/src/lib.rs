//! HTTP API for Promptsmith.
//!
//! - [`server::create_app`] — router with CORS and request tracing
//! - [`handlers`] — one function per endpoint
//! - [`error::ApiError`] — `{"detail": ...}` error bodies

pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use server::{create_app, run_server};
pub use state::AppState;
