//! Deterministic capability implementations.
//!
//! Used by tests, demos, and the `fixture` runtime backend: no model
//! files, no inference, fully predictable output.

use image::RgbImage;

use estream_models::{EmotionLabel, EmotionScores, FaceRegion};

use crate::capability::{DetectionParams, EmotionScorer, FaceDetector};
use crate::config::DetectionMode;
use crate::error::{VisionError, VisionResult};

/// Where the fixture detector finds its faces.
enum Placement {
    /// A fixed region list, filtered per frame.
    Fixed(Vec<FaceRegion>),
    /// One region centered in the frame, 40% of each dimension.
    Centered,
}

/// Detector returning configured regions.
///
/// Regions that fall outside the frame or below the minimum detection
/// size are dropped, matching the parameter contract of a real backend.
pub struct FixtureDetector {
    placement: Placement,
}

impl FixtureDetector {
    pub fn with_regions(regions: Vec<FaceRegion>) -> Self {
        Self {
            placement: Placement::Fixed(regions),
        }
    }

    /// One synthetic face centered in every frame.
    pub fn centered() -> Self {
        Self {
            placement: Placement::Centered,
        }
    }
}

impl FaceDetector for FixtureDetector {
    fn detect(&self, frame: &RgbImage, params: &DetectionParams) -> VisionResult<Vec<FaceRegion>> {
        let (fw, fh) = frame.dimensions();
        let candidates = match &self.placement {
            Placement::Fixed(regions) => regions.clone(),
            Placement::Centered => {
                let w = (fw as f64 * 0.4) as u32;
                let h = (fh as f64 * 0.4) as u32;
                vec![FaceRegion::new((fw - w) / 2, (fh - h) / 2, w, h)]
            }
        };

        Ok(candidates
            .into_iter()
            .filter(|r| r.fits_within(fw, fh))
            .filter(|r| r.width >= params.min_width && r.height >= params.min_height)
            .collect())
    }
}

/// Scorer returning a configured score table.
///
/// In strict mode an empty table is treated as "no face confirmed" and
/// fails the crop, mirroring a strict real backend.
pub struct FixtureScorer {
    scores: EmotionScores,
}

impl FixtureScorer {
    pub fn with_scores(scores: EmotionScores) -> Self {
        Self { scores }
    }

    /// A confidently happy face.
    pub fn cheerful() -> Self {
        Self {
            scores: EmotionScores::from_pairs(&[
                (EmotionLabel::Happy, 72.0),
                (EmotionLabel::Neutral, 18.0),
                (EmotionLabel::Surprise, 6.0),
            ]),
        }
    }
}

impl EmotionScorer for FixtureScorer {
    fn scores(&self, _face: &RgbImage, mode: DetectionMode) -> VisionResult<EmotionScores> {
        if mode == DetectionMode::Strict && self.scores.is_empty() {
            return Err(VisionError::classification("no face detected in crop"));
        }
        Ok(self.scores.clone())
    }
}
