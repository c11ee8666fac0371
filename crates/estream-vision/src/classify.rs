//! Classifier adapter: raw scores to a confidence-gated emotion.

use std::sync::Arc;

use image::RgbImage;

use estream_models::{EmotionLabel, EmotionScores};

use crate::capability::EmotionScorer;
use crate::config::{DetectionMode, PipelineConfig};

/// A face successfully scored by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEmotion {
    pub label: EmotionLabel,
    pub confidence: f32,
    pub scores: EmotionScores,
}

/// Why classification failed for one face. Carried as a value, consumed
/// explicitly by the orchestrator; never propagated past the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifyFailure {
    pub reason: String,
}

/// Wraps the external scoring capability with the confidence floor.
pub struct EmotionClassifier {
    scorer: Arc<dyn EmotionScorer>,
    threshold: f32,
    mode: DetectionMode,
}

impl EmotionClassifier {
    pub fn new(scorer: Arc<dyn EmotionScorer>, config: &PipelineConfig) -> Self {
        Self {
            scorer,
            threshold: config.confidence_threshold,
            mode: config.mode,
        }
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    /// Classify one face crop.
    ///
    /// The dominant label is the argmax of the score mapping; at or below
    /// the confidence threshold it is overridden to `uncertain` while the
    /// raw scores are still reported.
    pub fn classify(&self, face: &RgbImage) -> Result<ScoredEmotion, ClassifyFailure> {
        let scores = self
            .scorer
            .scores(face, self.mode)
            .map_err(|e| ClassifyFailure {
                reason: e.to_string(),
            })?;

        let (dominant, confidence) = scores.dominant();
        let label = if confidence <= self.threshold {
            EmotionLabel::Uncertain
        } else {
            dominant
        };

        Ok(ScoredEmotion {
            label,
            confidence,
            scores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{VisionError, VisionResult};

    struct TableScorer(EmotionScores);

    impl EmotionScorer for TableScorer {
        fn scores(&self, _face: &RgbImage, _mode: DetectionMode) -> VisionResult<EmotionScores> {
            Ok(self.0.clone())
        }
    }

    struct FailingScorer;

    impl EmotionScorer for FailingScorer {
        fn scores(&self, _face: &RgbImage, _mode: DetectionMode) -> VisionResult<EmotionScores> {
            Err(VisionError::classification("no face in crop"))
        }
    }

    fn classifier(scorer: impl EmotionScorer + 'static) -> EmotionClassifier {
        EmotionClassifier::new(Arc::new(scorer), &PipelineConfig::default())
    }

    fn face() -> RgbImage {
        RgbImage::new(48, 48)
    }

    #[test]
    fn test_confident_dominant_label_kept() {
        let scores = EmotionScores::from_pairs(&[
            (EmotionLabel::Angry, 85.0),
            (EmotionLabel::Neutral, 10.0),
        ]);
        let result = classifier(TableScorer(scores)).classify(&face()).unwrap();
        assert_eq!(result.label, EmotionLabel::Angry);
        assert_eq!(result.confidence, 85.0);
    }

    #[test]
    fn test_confidence_at_threshold_reports_uncertain() {
        let scores = EmotionScores::from_pairs(&[(EmotionLabel::Happy, 40.0)]);
        let result = classifier(TableScorer(scores)).classify(&face()).unwrap();
        assert_eq!(result.label, EmotionLabel::Uncertain);
        // Raw scores survive the override.
        assert_eq!(result.scores.get(EmotionLabel::Happy), 40.0);
        assert_eq!(result.confidence, 40.0);
    }

    #[test]
    fn test_confidence_just_above_threshold_kept() {
        let scores = EmotionScores::from_pairs(&[(EmotionLabel::Happy, 40.5)]);
        let result = classifier(TableScorer(scores)).classify(&face()).unwrap();
        assert_eq!(result.label, EmotionLabel::Happy);
    }

    #[test]
    fn test_scorer_failure_becomes_tagged_failure() {
        let failure = classifier(FailingScorer).classify(&face()).unwrap_err();
        assert!(failure.reason.contains("no face in crop"));
    }
}
