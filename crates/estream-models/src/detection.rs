//! Per-face detection results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::emotion::{EmotionLabel, EmotionScores};
use crate::region::FaceRegion;

/// One detected face and its classification outcome.
///
/// `scores` is present exactly when the classifier produced a usable score
/// mapping; a degenerate crop or classifier failure leaves it `None` with
/// the `uncertain` label. A frame's results keep detector output order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectionResult {
    pub region: FaceRegion,
    pub label: EmotionLabel,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<EmotionScores>,
}

impl DetectionResult {
    /// A successfully classified face.
    pub fn classified(
        region: FaceRegion,
        label: EmotionLabel,
        confidence: f32,
        scores: EmotionScores,
    ) -> Self {
        Self {
            region,
            label,
            confidence,
            scores: Some(scores),
        }
    }

    /// Sentinel for a face whose classification failed or was skipped.
    pub fn uncertain(region: FaceRegion) -> Self {
        Self {
            region,
            label: EmotionLabel::Uncertain,
            confidence: 0.0,
            scores: None,
        }
    }

    /// Whether this face carries a real classification.
    pub fn is_classified(&self) -> bool {
        self.scores.is_some()
    }
}
