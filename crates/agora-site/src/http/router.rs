//! Axum router configuration with middleware.
//!
//! Pages and the chat WebSocket take priority; unknown paths fall through
//! to static assets served from the configured public directory.

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete site router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_dir = state.config.public_dir.clone();

    let mut router = Router::new()
        .route("/", get(handlers::home::index))
        .route("/docs", get(handlers::docs::index))
        .route("/docs/{id}", get(handlers::docs::show))
        .route("/guides", get(handlers::docs::index))
        .route("/guides/{id}", get(handlers::docs::show))
        .route("/sitemap.xml", get(handlers::sitemap::sitemap))
        .route("/chat", get(handlers::chat_ws::chat_ws_anonymous))
        .route("/chat/{name}", get(handlers::chat_ws::chat_ws))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Serve static assets from disk if the directory exists. Routes above
    // take priority; unknown paths fall through to the asset tree.
    if public_dir.exists() {
        router = router.fallback_service(ServeDir::new(&public_dir));
        tracing::info!(path = %public_dir.display(), "static file serving enabled");
    }

    router
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
