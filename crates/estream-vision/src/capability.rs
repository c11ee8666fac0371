//! Capability traits for the external vision models.
//!
//! The face detector and emotion model are consumed as black boxes: image
//! in, region list or score mapping out. Any implementation satisfying the
//! contract can be plugged in.

use image::RgbImage;

use estream_models::{EmotionScores, FaceRegion};

use crate::config::DetectionMode;
use crate::error::VisionResult;

/// Parameters handed to the detector per frame.
///
/// `scale_factor` and `min_neighbors` parameterize cascade-style detectors;
/// backends without those notions honor the minimum size and ignore them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    pub scale_factor: f64,
    pub min_neighbors: u32,
    pub min_width: u32,
    pub min_height: u32,
}

/// Detects zero or more faces in a frame.
///
/// Returned regions must lie fully inside the frame
/// (`FaceRegion::fits_within` holds) and keep the backend's native output
/// order, which the pipeline preserves end to end.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, frame: &RgbImage, params: &DetectionParams) -> VisionResult<Vec<FaceRegion>>;
}

/// Scores a face crop against the classifier label set.
///
/// Confidences are percentages in `[0, 100]`. In `Strict` mode the scorer
/// fails with a classification error when it cannot confirm a face in the
/// crop; in `Lenient` mode it scores best-effort.
pub trait EmotionScorer: Send + Sync {
    fn scores(&self, face: &RgbImage, mode: DetectionMode) -> VisionResult<EmotionScores>;
}
