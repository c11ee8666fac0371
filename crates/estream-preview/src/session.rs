//! The preview loop.

use tracing::{info, warn};

use estream_vision::annotate::HudState;
use estream_vision::{FramePipeline, VisionResult};

use crate::{DisplaySink, FrameSource};

/// Key that ends the preview.
const QUIT_KEY: char = 'q';

/// Counters reported when a preview ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreviewStats {
    pub frames_shown: u64,
    pub frames_failed: u64,
}

/// Drives frames from a source through the pipeline onto a sink.
///
/// The HUD state (scan line, FPS) lives here and persists across frames;
/// everything else is per-frame. Per-frame pipeline errors are logged and
/// skipped, never fatal; source and sink errors end the preview.
pub struct PreviewSession {
    pipeline: FramePipeline,
    hud: HudState,
}

impl PreviewSession {
    pub fn new(pipeline: FramePipeline) -> Self {
        let hud = HudState::new(pipeline.config().scan_step);
        Self { pipeline, hud }
    }

    /// Run until the source ends or the quit key is pressed.
    pub fn run<S, D>(&mut self, source: &mut S, sink: &mut D) -> VisionResult<PreviewStats>
    where
        S: FrameSource,
        D: DisplaySink,
    {
        let mut stats = PreviewStats::default();

        while let Some(mut frame) = source.next_frame()? {
            match self.pipeline.process(&mut frame, Some(&mut self.hud)) {
                Ok(report) => {
                    sink.present(&frame)?;
                    stats.frames_shown += 1;
                    if !report.detections.is_empty() {
                        info!(
                            frames = stats.frames_shown,
                            faces = report.detections.len(),
                            "frame rendered"
                        );
                    }
                }
                Err(e) => {
                    warn!(error = %e, "frame failed, continuing");
                    stats.frames_failed += 1;
                }
            }

            if sink.poll_key() == Some(QUIT_KEY) {
                info!("quit key pressed");
                break;
            }
        }

        Ok(stats)
    }
}
