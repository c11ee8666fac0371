//! Process-wide session counters.
//!
//! One bookkeeper instance is shared by every connection; all updates are
//! atomic or serialized. State lives for the process lifetime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::{DateTime, Utc};

/// Counters tracked across all streaming sessions.
#[derive(Debug, Default)]
pub struct SessionBookkeeper {
    active_connections: AtomicU64,
    processed_frames: AtomicU64,
    next_client_id: AtomicU64,
    last_process_time: RwLock<Option<DateTime<Utc>>>,
}

/// Point-in-time view for health reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct BookkeeperSnapshot {
    pub active_connections: u64,
    pub processed_frames: u64,
    pub last_process_time: Option<DateTime<Utc>>,
}

impl SessionBookkeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection; returns a distinct client id.
    pub fn client_connected(&self) -> u64 {
        self.active_connections.fetch_add(1, Ordering::SeqCst);
        self.next_client_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Register a disconnect. The active count never goes below zero.
    pub fn client_disconnected(&self) {
        let _ = self
            .active_connections
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    /// Record a completed frame: exactly one increment per frame that made
    /// it through the pipeline, success or isolated per-face failure.
    /// Frames that failed to decode must not be recorded.
    pub fn frame_completed(&self) -> u64 {
        let count = self.processed_frames.fetch_add(1, Ordering::SeqCst) + 1;
        let mut last = self
            .last_process_time
            .write()
            .unwrap_or_else(|e| e.into_inner());
        *last = Some(Utc::now());
        count
    }

    pub fn snapshot(&self) -> BookkeeperSnapshot {
        BookkeeperSnapshot {
            active_connections: self.active_connections.load(Ordering::SeqCst),
            processed_frames: self.processed_frames.load(Ordering::SeqCst),
            last_process_time: *self
                .last_process_time
                .read()
                .unwrap_or_else(|e| e.into_inner()),
        }
    }
}
