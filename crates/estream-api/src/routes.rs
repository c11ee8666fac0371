//! API routes.

use axum::http::{StatusCode, Uri};
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::handlers::health;
use crate::middleware::{cors_layer, request_id, request_logging};
use crate::state::AppState;
use crate::ws::ws_stream;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let ws_routes = Router::new().route("/ws/stream", get(ws_stream));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health));

    Router::new()
        .merge(ws_routes)
        .merge(health_routes)
        .fallback(not_found)
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

/// Catch-all JSON error for unknown routes.
async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "success": false,
            "error": format!("No route for {uri}"),
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}
