//! Shared data models for the EmoStream backend.
//!
//! This crate provides Serde-serializable types for:
//! - Emotion labels and confidence score mappings
//! - Face regions in frame-pixel coordinates
//! - Per-face detection results
//! - WebSocket event schemas

pub mod detection;
pub mod emotion;
pub mod region;
pub mod ws;

// Re-export common types
pub use detection::DetectionResult;
pub use emotion::{EmotionLabel, EmotionScores, OverlayKind, CLASSIFIER_LABELS};
pub use region::FaceRegion;
pub use ws::{ClientEvent, ServerEvent};
