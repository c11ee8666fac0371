//! Configuration for the frame-processing pipeline.

use serde::{Deserialize, Serialize};

use crate::capability::DetectionParams;

/// How strictly the classifier treats an unconfirmed face in a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Best-effort scoring even without a confirmed face. Suits live video.
    #[default]
    Lenient,
    /// Fail the face when the backend cannot confirm one. Suits single-image
    /// analysis.
    Strict,
}

/// Pipeline tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    // === Classification ===
    /// Dominant confidence at or below this reports "uncertain" (default: 40)
    pub confidence_threshold: f32,

    /// Strict or lenient face confirmation (default: lenient)
    pub mode: DetectionMode,

    // === ROI extraction ===
    /// Face crop margin as a fraction of the region width (default: 0.2)
    pub roi_margin: f64,

    // === Face detection ===
    /// Minimum face size as a fraction of frame width/height (default: 0.08)
    pub min_face_fraction: f64,

    /// Frames wider than this use the stricter detection parameters
    /// (default: 640)
    pub strict_width: u32,

    // === Preview HUD ===
    /// Scan line advance in pixels per frame (default: 5)
    pub scan_step: i32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 40.0,
            mode: DetectionMode::Lenient,
            roi_margin: 0.2,
            min_face_fraction: 0.08,
            strict_width: 640,
            scan_step: 5,
        }
    }
}

impl PipelineConfig {
    /// Configuration for live streaming: lenient, fast.
    pub fn live() -> Self {
        Self::default()
    }

    /// Configuration for single-image analysis: strict face confirmation.
    pub fn still() -> Self {
        Self {
            mode: DetectionMode::Strict,
            ..Default::default()
        }
    }

    /// Detection parameters adapted to the frame size: larger frames get a
    /// tighter scale factor and a higher neighbor count to suppress false
    /// positives, and the minimum face size scales with the frame.
    pub fn detection_params(&self, frame_width: u32, frame_height: u32) -> DetectionParams {
        let strict = frame_width > self.strict_width;
        DetectionParams {
            scale_factor: if strict { 1.1 } else { 1.2 },
            min_neighbors: if strict { 8 } else { 6 },
            min_width: (frame_width as f64 * self.min_face_fraction) as u32,
            min_height: (frame_height as f64 * self.min_face_fraction) as u32,
        }
    }
}
