//! Per-frame pipeline orchestration.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbImage;
use tracing::{debug, warn};

use estream_models::DetectionResult;

use crate::annotate::{self, HudState};
use crate::capability::{EmotionScorer, FaceDetector};
use crate::classify::EmotionClassifier;
use crate::config::PipelineConfig;
use crate::error::VisionResult;
use crate::roi;

/// Stages a frame passes through; used for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Detect,
    ExtractRois,
    Classify,
    Annotate,
    Emit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Detect => "detect",
            Stage::ExtractRois => "extract_rois",
            Stage::Classify => "classify",
            Stage::Annotate => "annotate",
            Stage::Emit => "emit",
        };
        write!(f, "{name}")
    }
}

/// Outcome of one processed frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// Per-face results in detector output order.
    pub detections: Vec<DetectionResult>,
    /// Wall-clock duration of the processing cycle.
    pub processing_time: Duration,
}

impl FrameReport {
    /// The frame-level primary detection: highest-confidence classified
    /// face, ties broken toward detection order.
    pub fn primary(&self) -> Option<&DetectionResult> {
        self.detections
            .iter()
            .filter(|d| d.is_classified())
            .fold(None, |best: Option<&DetectionResult>, d| match best {
                Some(b) if b.confidence >= d.confidence => Some(b),
                _ => Some(d),
            })
    }
}

/// The per-frame orchestrator.
///
/// Each call to [`process`](FramePipeline::process) runs one complete
/// cycle: detection, ROI extraction and classification fan-out, and
/// annotation. Per-face failures are isolated into `uncertain` results; a
/// detector failure fails the frame, and the pipeline is immediately ready
/// for the next one either way. All state is per-call, so a pipeline can
/// be shared read-only across sessions.
pub struct FramePipeline {
    detector: Arc<dyn FaceDetector>,
    classifier: EmotionClassifier,
    config: PipelineConfig,
}

impl FramePipeline {
    pub fn new(
        detector: Arc<dyn FaceDetector>,
        scorer: Arc<dyn EmotionScorer>,
        config: PipelineConfig,
    ) -> Self {
        let classifier = EmotionClassifier::new(scorer, &config);
        Self {
            detector,
            classifier,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one frame through the pipeline, annotating it in place.
    ///
    /// `hud` carries the preview animation state; servers pass `None`.
    pub fn process(
        &self,
        frame: &mut RgbImage,
        hud: Option<&mut HudState>,
    ) -> VisionResult<FrameReport> {
        let started = Instant::now();
        let (width, height) = frame.dimensions();

        debug!(stage = %Stage::Detect, width, height, "processing frame");
        let params = self.config.detection_params(width, height);
        let faces = self.detector.detect(frame, &params)?;
        debug!(stage = %Stage::ExtractRois, faces = faces.len(), "faces detected");

        let mut detections = Vec::with_capacity(faces.len());
        for region in &faces {
            let result = match roi::extract_roi(frame, region, self.config.roi_margin) {
                None => {
                    warn!(stage = %Stage::ExtractRois, ?region, "degenerate face region, skipping classification");
                    DetectionResult::uncertain(*region)
                }
                Some(crop) => match self.classifier.classify(&crop) {
                    Ok(scored) => {
                        DetectionResult::classified(*region, scored.label, scored.confidence, scored.scores)
                    }
                    Err(failure) => {
                        warn!(stage = %Stage::Classify, ?region, reason = %failure.reason, "face classification failed");
                        DetectionResult::uncertain(*region)
                    }
                },
            };
            detections.push(result);
        }

        debug!(stage = %Stage::Annotate, detections = detections.len(), "annotating frame");
        annotate::annotate(frame, &detections, hud);

        let report = FrameReport {
            detections,
            processing_time: started.elapsed(),
        };
        debug!(stage = %Stage::Emit, elapsed_ms = report.processing_time.as_millis() as u64, "frame complete");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::DetectionParams;
    use crate::config::DetectionMode;
    use crate::error::{VisionError, VisionResult};
    use estream_models::{EmotionLabel, EmotionScores, FaceRegion};
    use image::Rgb;
    use std::sync::Mutex;

    struct StaticDetector(Vec<FaceRegion>);

    impl FaceDetector for StaticDetector {
        fn detect(
            &self,
            _frame: &RgbImage,
            _params: &DetectionParams,
        ) -> VisionResult<Vec<FaceRegion>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenDetector;

    impl FaceDetector for BrokenDetector {
        fn detect(
            &self,
            _frame: &RgbImage,
            _params: &DetectionParams,
        ) -> VisionResult<Vec<FaceRegion>> {
            Err(VisionError::detection("backend exploded"))
        }
    }

    struct TableScorer(EmotionScores);

    impl EmotionScorer for TableScorer {
        fn scores(&self, _face: &RgbImage, _mode: DetectionMode) -> VisionResult<EmotionScores> {
            Ok(self.0.clone())
        }
    }

    /// Fails exactly the n-th invocation (1-based), succeeds otherwise.
    struct NthCallFails {
        scores: EmotionScores,
        failing_call: usize,
        calls: Mutex<usize>,
    }

    impl EmotionScorer for NthCallFails {
        fn scores(&self, _face: &RgbImage, _mode: DetectionMode) -> VisionResult<EmotionScores> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls == self.failing_call {
                Err(VisionError::classification("synthetic failure"))
            } else {
                Ok(self.scores.clone())
            }
        }
    }

    fn frame() -> RgbImage {
        RgbImage::from_pixel(200, 200, Rgb([100, 100, 100]))
    }

    fn happy_scores() -> EmotionScores {
        EmotionScores::from_pairs(&[(EmotionLabel::Happy, 90.0)])
    }

    fn pipeline(
        detector: impl FaceDetector + 'static,
        scorer: impl EmotionScorer + 'static,
    ) -> FramePipeline {
        FramePipeline::new(
            Arc::new(detector),
            Arc::new(scorer),
            PipelineConfig::default(),
        )
    }

    #[test]
    fn test_zero_faces_yields_empty_report_and_no_tint() {
        let p = pipeline(StaticDetector(vec![]), TableScorer(happy_scores()));
        let mut f = frame();
        let report = p.process(&mut f, None).unwrap();
        assert!(report.detections.is_empty());
        assert!(report.primary().is_none());
        // Annotator ran but left the frame untouched.
        assert_eq!(f.get_pixel(0, 0).0, [100, 100, 100]);
    }

    #[test]
    fn test_detections_preserve_order() {
        let regions = vec![
            FaceRegion::new(10, 10, 30, 30),
            FaceRegion::new(60, 10, 30, 30),
            FaceRegion::new(110, 10, 30, 30),
        ];
        let p = pipeline(StaticDetector(regions.clone()), TableScorer(happy_scores()));
        let report = p.process(&mut frame(), None).unwrap();
        let got: Vec<FaceRegion> = report.detections.iter().map(|d| d.region).collect();
        assert_eq!(got, regions);
    }

    #[test]
    fn test_per_face_failure_is_isolated() {
        let regions = vec![
            FaceRegion::new(10, 10, 30, 30),
            FaceRegion::new(60, 10, 30, 30),
            FaceRegion::new(110, 10, 30, 30),
        ];
        let scorer = NthCallFails {
            scores: happy_scores(),
            failing_call: 2,
            calls: Mutex::new(0),
        };
        let p = pipeline(StaticDetector(regions), scorer);
        let report = p.process(&mut frame(), None).unwrap();

        assert_eq!(report.detections.len(), 3);
        assert_eq!(report.detections[0].label, EmotionLabel::Happy);
        assert_eq!(report.detections[1].label, EmotionLabel::Uncertain);
        assert!(!report.detections[1].is_classified());
        assert_eq!(report.detections[2].label, EmotionLabel::Happy);
    }

    #[test]
    fn test_degenerate_region_skips_classifier() {
        // Zero-sized detector output must never reach the scorer.
        struct PanickyScorer;
        impl EmotionScorer for PanickyScorer {
            fn scores(&self, _face: &RgbImage, _mode: DetectionMode) -> VisionResult<EmotionScores> {
                panic!("scorer must not run for a degenerate region");
            }
        }
        let p = pipeline(
            StaticDetector(vec![FaceRegion::new(200, 200, 0, 0)]),
            PanickyScorer,
        );
        let report = p.process(&mut frame(), None).unwrap();
        assert_eq!(report.detections.len(), 1);
        assert_eq!(report.detections[0].label, EmotionLabel::Uncertain);
    }

    #[test]
    fn test_detector_error_fails_the_frame() {
        let p = pipeline(BrokenDetector, TableScorer(happy_scores()));
        let err = p.process(&mut frame(), None).unwrap_err();
        assert!(matches!(err, VisionError::Detection(_)));
    }

    #[test]
    fn test_primary_picks_highest_confidence_classified_face() {
        struct AlternatingScorer {
            calls: Mutex<usize>,
        }
        impl EmotionScorer for AlternatingScorer {
            fn scores(&self, _face: &RgbImage, _mode: DetectionMode) -> VisionResult<EmotionScores> {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                let confidence = if *calls == 1 { 55.0 } else { 95.0 };
                Ok(EmotionScores::from_pairs(&[(EmotionLabel::Sad, confidence)]))
            }
        }
        let p = pipeline(
            StaticDetector(vec![
                FaceRegion::new(10, 10, 30, 30),
                FaceRegion::new(60, 10, 30, 30),
            ]),
            AlternatingScorer {
                calls: Mutex::new(0),
            },
        );
        let report = p.process(&mut frame(), None).unwrap();
        let primary = report.primary().unwrap();
        assert_eq!(primary.confidence, 95.0);
        assert_eq!(primary.region, FaceRegion::new(60, 10, 30, 30));
    }
}
