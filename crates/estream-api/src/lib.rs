//! Axum HTTP/WS server for live emotion streaming.
//!
//! This crate provides:
//! - The `/ws/stream` websocket endpoint processing client video frames
//! - The `/health` surface backed by the session bookkeeper
//! - Connection lifecycle and frame counters

pub mod bookkeeper;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod ws;

pub use bookkeeper::SessionBookkeeper;
pub use config::ApiConfig;
pub use routes::create_router;
pub use state::AppState;
