//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - The upload and liveness routes
//! - The multipart upload form extractor
//! - Router assembly with body limit, tracing and CORS layers

pub mod extractors;
pub mod routes;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use filedrop_core::upload::UploadService;
use filedrop_shared::{CorsConfig, ServerConfig};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload orchestrator.
    pub uploads: Arc<UploadService>,
}

/// Creates the main application router.
pub fn create_router(state: AppState, server: &ServerConfig, cors: &CorsConfig) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors))
        .with_state(state)
}

/// Build the CORS layer. An empty origin list allows any origin.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    if config.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
