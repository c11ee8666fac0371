//! Local preview mode.
//!
//! Runs the frame pipeline against a live frame source and renders
//! annotated output (with the scan-line and FPS HUD) to a display surface.
//! Camera capture and windowing are external capabilities behind the
//! `FrameSource` and `DisplaySink` traits; this crate ships file-based
//! implementations.

pub mod display;
pub mod session;
pub mod source;

use image::RgbImage;

use estream_vision::VisionResult;

pub use display::PngDirSink;
pub use session::{PreviewSession, PreviewStats};
pub use source::ImageDirSource;

/// Produces frames, camera-style. `Ok(None)` means the stream ended.
pub trait FrameSource {
    fn next_frame(&mut self) -> VisionResult<Option<RgbImage>>;
}

/// Renders annotated frames and reports key presses.
pub trait DisplaySink {
    fn present(&mut self, frame: &RgbImage) -> VisionResult<()>;

    /// Most recent key press since the last call, if any.
    fn poll_key(&mut self) -> Option<char> {
        None
    }
}
