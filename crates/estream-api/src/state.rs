//! Application state.

use std::sync::Arc;

use estream_vision::FramePipeline;

use crate::bookkeeper::SessionBookkeeper;
use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: Arc<FramePipeline>,
    pub bookkeeper: Arc<SessionBookkeeper>,
}

impl AppState {
    /// Create new application state around a ready pipeline.
    pub fn new(config: ApiConfig, pipeline: FramePipeline) -> Self {
        Self {
            config,
            pipeline: Arc::new(pipeline),
            bookkeeper: Arc::new(SessionBookkeeper::new()),
        }
    }
}
