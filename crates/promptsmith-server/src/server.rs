//! Router assembly and the serve loop.

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use promptsmith_core::config::schema::ServerConfig;

use crate::handlers;
use crate::state::AppState;

/// Build the application router.
///
/// `cors_origins` is the browser allow-list; unparsable entries are skipped.
pub fn create_app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/docs", get(handlers::docs))
        .route("/api/health", get(handlers::health))
        .route("/api/providers", get(handlers::list_providers))
        .route("/api/test-api", post(handlers::test_api))
        .route("/api/generate", post(handlers::generate))
        .route("/api/history", get(handlers::list_history))
        .route(
            "/api/history/{id}",
            get(handlers::get_history).delete(handlers::delete_history),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            // credentialed CORS forbids the `*` origin
            Ok(v) if v != "*" => Some(v),
            _ => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Bind to the configured address and serve until Ctrl+C.
pub async fn run_server(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = create_app(state, &config.cors_origins_list());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
