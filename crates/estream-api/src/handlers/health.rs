//! Health check handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub active_connections: u64,
    pub processed_frames: u64,
    pub last_process_time: Option<String>,
    pub timestamp: String,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.bookkeeper.snapshot();
    Json(HealthResponse {
        status: "ok".to_string(),
        active_connections: snapshot.active_connections,
        processed_frames: snapshot.processed_frames,
        last_process_time: snapshot.last_process_time.map(|t| t.to_rfc3339()),
        timestamp: Utc::now().to_rfc3339(),
    })
}
