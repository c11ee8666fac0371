//! ONNX Runtime backends.
//!
//! `OnnxFaceDetector` runs a YOLO-face-style model (rows of
//! `[cx, cy, w, h, conf]`, possibly transposed); `OnnxEmotionScorer` runs
//! an HSEmotion-style classifier (8 logits). Sessions are not re-entrant,
//! so each is serialized behind a mutex and the instances can be shared
//! across sessions.

use std::path::Path;
use std::sync::Mutex;

use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array4;
use ort::session::Session;

use estream_models::{EmotionLabel, EmotionScores, FaceRegion};

use crate::capability::{DetectionParams, EmotionScorer, FaceDetector};
use crate::config::DetectionMode;
use crate::error::{VisionError, VisionResult};

/// Fallback detector input resolution when the model's shape is dynamic.
const DEFAULT_DETECTOR_INPUT: u32 = 320;

/// Emotion model input resolution (HSEmotion EfficientNet-B2).
const EMOTION_INPUT: u32 = 260;

/// Detection confidence floor.
const DETECTION_CONFIDENCE: f32 = 0.5;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.45;

/// HSEmotion output order; contempt folds into disgust.
const EMOTION_INDEX: [EmotionLabel; 8] = [
    EmotionLabel::Angry,
    EmotionLabel::Disgust,
    EmotionLabel::Fear,
    EmotionLabel::Happy,
    EmotionLabel::Sad,
    EmotionLabel::Surprise,
    EmotionLabel::Neutral,
    EmotionLabel::Disgust,
];

fn load_session(model_path: &Path) -> VisionResult<Session> {
    if !model_path.exists() {
        return Err(VisionError::ModelNotFound(model_path.to_path_buf()));
    }
    Session::builder()
        .map_err(|e| VisionError::backend(format!("session builder: {e}")))?
        .commit_from_file(model_path)
        .map_err(|e| VisionError::backend(format!("model load failed: {e}")))
}

/// Resize to a square input and pack as normalized NCHW float32.
fn to_nchw(frame: &RgbImage, size: u32) -> Array4<f32> {
    let resized = imageops::resize(frame, size, size, FilterType::Triangle);
    let mut input = Array4::<f32>::zeros((1, 3, size as usize, size as usize));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            input[[0, c, y as usize, x as usize]] = pixel.0[c] as f32 / 255.0;
        }
    }
    input
}

/// Face detector backed by an ONNX Runtime session.
pub struct OnnxFaceDetector {
    session: Mutex<Session>,
    input_size: u32,
}

impl OnnxFaceDetector {
    /// Load the detection model; reads the input resolution from the model
    /// shape when available (NCHW), falling back to 320.
    pub fn load(model_path: &Path) -> VisionResult<Self> {
        let session = load_session(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    if shape.len() >= 4 && shape[2] > 0 {
                        Some(shape[2] as u32)
                    } else {
                        None
                    }
                } else {
                    None
                }
            })
            .unwrap_or(DEFAULT_DETECTOR_INPUT);

        Ok(Self {
            session: Mutex::new(session),
            input_size,
        })
    }
}

impl FaceDetector for OnnxFaceDetector {
    /// `scale_factor` and `min_neighbors` are cascade parameters with no
    /// counterpart here; the minimum face size is honored.
    fn detect(&self, frame: &RgbImage, params: &DetectionParams) -> VisionResult<Vec<FaceRegion>> {
        let (fw, fh) = frame.dimensions();
        let input = to_nchw(frame, self.input_size);

        let input_value = ort::value::Tensor::from_array(input)
            .map_err(|e| VisionError::detection(format!("input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| VisionError::detection("detector session poisoned"))?;
        let outputs = session
            .run(ort::inputs![input_value])
            .map_err(|e| VisionError::detection(format!("inference failed: {e}")))?;
        if outputs.len() == 0 {
            return Err(VisionError::detection("model produced no outputs"));
        }

        let tensor = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| VisionError::detection(format!("output tensor: {e}")))?;
        let shape = tensor.shape().to_vec();
        if shape.len() != 3 {
            return Err(VisionError::detection(format!(
                "unexpected output shape: {shape:?}"
            )));
        }

        // Output is [1, features, detections] or [1, detections, features].
        let transposed = shape[1] < shape[2];
        let (num_dets, num_feats) = if transposed {
            (shape[2], shape[1])
        } else {
            (shape[1], shape[2])
        };
        let data = tensor
            .as_slice()
            .ok_or_else(|| VisionError::detection("non-contiguous output tensor"))?;

        let scale_x = fw as f64 / self.input_size as f64;
        let scale_y = fh as f64 / self.input_size as f64;

        let mut candidates: Vec<(FaceRegion, f32)> = Vec::new();
        for i in 0..num_dets {
            let at = |f: usize| {
                if transposed {
                    data[f * num_dets + i]
                } else {
                    data[i * num_feats + f]
                }
            };
            if num_feats < 5 {
                continue;
            }
            let conf = at(4);
            if conf < DETECTION_CONFIDENCE {
                continue;
            }

            let cx = at(0) as f64 * scale_x;
            let cy = at(1) as f64 * scale_y;
            let w = at(2) as f64 * scale_x;
            let h = at(3) as f64 * scale_y;

            let x1 = (cx - w / 2.0).max(0.0);
            let y1 = (cy - h / 2.0).max(0.0);
            let x2 = (cx + w / 2.0).min(fw as f64);
            let y2 = (cy + h / 2.0).min(fh as f64);
            if x2 <= x1 || y2 <= y1 {
                continue;
            }

            let region = FaceRegion::new(
                x1 as u32,
                y1 as u32,
                (x2 - x1) as u32,
                (y2 - y1) as u32,
            );
            if region.width >= params.min_width && region.height >= params.min_height {
                candidates.push((region, conf));
            }
        }

        Ok(non_max_suppress(candidates))
    }
}

/// Greedy NMS; kept boxes come back in their original order.
fn non_max_suppress(mut candidates: Vec<(FaceRegion, f32)>) -> Vec<FaceRegion> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| {
        candidates[b]
            .1
            .partial_cmp(&candidates[a].1)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = vec![false; candidates.len()];
    for (rank, &i) in order.iter().enumerate() {
        let mut dominated = false;
        for &j in order.iter().take(rank) {
            if keep[j] && candidates[i].0.iou(&candidates[j].0) > NMS_IOU_THRESH {
                dominated = true;
                break;
            }
        }
        keep[i] = !dominated;
    }

    candidates
        .drain(..)
        .zip(keep)
        .filter_map(|((region, _), kept)| kept.then_some(region))
        .collect()
}

/// Emotion scorer backed by an ONNX Runtime session.
///
/// The model scores any crop it is given, so it is inherently lenient;
/// strictness is enforced by backends able to confirm face presence.
pub struct OnnxEmotionScorer {
    session: Mutex<Session>,
}

impl OnnxEmotionScorer {
    pub fn load(model_path: &Path) -> VisionResult<Self> {
        Ok(Self {
            session: Mutex::new(load_session(model_path)?),
        })
    }
}

impl EmotionScorer for OnnxEmotionScorer {
    fn scores(&self, face: &RgbImage, _mode: DetectionMode) -> VisionResult<EmotionScores> {
        let input = to_nchw(face, EMOTION_INPUT);
        let input_value = ort::value::Tensor::from_array(input)
            .map_err(|e| VisionError::classification(format!("input tensor: {e}")))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| VisionError::classification("scorer session poisoned"))?;
        let outputs = session
            .run(ort::inputs![input_value])
            .map_err(|e| VisionError::classification(format!("inference failed: {e}")))?;
        if outputs.len() == 0 {
            return Err(VisionError::classification("model produced no outputs"));
        }

        let tensor = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| VisionError::classification(format!("output tensor: {e}")))?;
        let logits = tensor
            .as_slice()
            .ok_or_else(|| VisionError::classification("non-contiguous output tensor"))?;
        if logits.len() < EMOTION_INDEX.len() {
            return Err(VisionError::classification(format!(
                "expected {} logits, got {}",
                EMOTION_INDEX.len(),
                logits.len()
            )));
        }

        // Softmax over the logits, then percentages.
        let max_logit = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let exp: Vec<f32> = logits
            .iter()
            .take(EMOTION_INDEX.len())
            .map(|&x| (x - max_logit).exp())
            .collect();
        let sum: f32 = exp.iter().sum();

        let mut scores = EmotionScores::new();
        for (label, e) in EMOTION_INDEX.iter().zip(exp.iter()) {
            let pct = e / sum * 100.0;
            // Contempt and disgust share a label; accumulate.
            scores.set(*label, scores.get(*label) + pct);
        }
        Ok(scores)
    }
}
