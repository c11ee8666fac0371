//! Concrete implementations of the model capabilities.
//!
//! `fixture` is always available and fully deterministic; the `onnx`
//! module provides real inference and is gated behind the `onnx` cargo
//! feature.

pub mod fixture;

#[cfg(feature = "onnx")]
pub mod onnx;

use std::sync::Arc;

use crate::capability::{EmotionScorer, FaceDetector};
use crate::config::PipelineConfig;
use crate::error::{VisionError, VisionResult};

/// A detector/scorer pair ready to drive a pipeline.
pub struct Backends {
    pub detector: Arc<dyn FaceDetector>,
    pub scorer: Arc<dyn EmotionScorer>,
}

/// Build backends from the environment.
///
/// `EMOSTREAM_BACKEND` selects `onnx` (default when the feature is
/// compiled in) or `fixture`. The ONNX backend reads model paths from
/// `EMOSTREAM_FACE_MODEL` and `EMOSTREAM_EMOTION_MODEL`. Any missing
/// model or unknown backend is an error: the caller is expected to
/// refuse to start rather than run degraded.
pub fn from_env(_config: &PipelineConfig) -> VisionResult<Backends> {
    let default_kind = if cfg!(feature = "onnx") { "onnx" } else { "fixture" };
    let kind = std::env::var("EMOSTREAM_BACKEND").unwrap_or_else(|_| default_kind.to_string());

    match kind.as_str() {
        "fixture" => Ok(Backends {
            detector: Arc::new(fixture::FixtureDetector::centered()),
            scorer: Arc::new(fixture::FixtureScorer::cheerful()),
        }),
        #[cfg(feature = "onnx")]
        "onnx" => {
            let face_model = require_env("EMOSTREAM_FACE_MODEL")?;
            let emotion_model = require_env("EMOSTREAM_EMOTION_MODEL")?;
            Ok(Backends {
                detector: Arc::new(onnx::OnnxFaceDetector::load(face_model.as_ref())?),
                scorer: Arc::new(onnx::OnnxEmotionScorer::load(emotion_model.as_ref())?),
            })
        }
        #[cfg(not(feature = "onnx"))]
        "onnx" => Err(VisionError::backend(
            "this build does not include the onnx feature",
        )),
        other => Err(VisionError::backend(format!("unknown backend: {other}"))),
    }
}

#[cfg_attr(not(feature = "onnx"), allow(dead_code))]
fn require_env(name: &str) -> VisionResult<String> {
    std::env::var(name).map_err(|_| VisionError::backend(format!("{name} is not set")))
}
