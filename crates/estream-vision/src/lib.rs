//! Frame-processing pipeline for live emotion detection.
//!
//! This crate provides:
//! - Capability traits for the external face detector and emotion model
//! - Base64/data-URI frame codec helpers
//! - ROI extraction with margin padding and edge clamping
//! - A confidence-gated classifier adapter with per-face failure isolation
//! - A frame annotator (rectangles, labels, emotion tints, preview HUD)
//! - The per-frame pipeline orchestrator
//! - Concrete backends: a deterministic fixture, and ONNX Runtime models
//!   behind the `onnx` feature

pub mod annotate;
pub mod backends;
pub mod capability;
pub mod classify;
pub mod codec;
pub mod config;
pub mod draw;
pub mod error;
pub mod pipeline;
pub mod roi;

pub use capability::{DetectionParams, EmotionScorer, FaceDetector};
pub use classify::{ClassifyFailure, EmotionClassifier, ScoredEmotion};
pub use config::{DetectionMode, PipelineConfig};
pub use error::{VisionError, VisionResult};
pub use pipeline::{FramePipeline, FrameReport};
