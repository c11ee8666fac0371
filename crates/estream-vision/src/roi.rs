//! Region-of-interest extraction.

use image::{imageops, RgbImage};

use estream_models::FaceRegion;

/// Crop a margin-padded face region out of a frame.
///
/// The margin is `margin_ratio` of the region's *width*, applied on all
/// four sides and clamped to the frame bounds. The returned buffer is a
/// copy; mutating the source frame afterwards never affects it.
///
/// Returns `None` when the clamped region has zero width or height
/// (pathological detector output at frame edges). The classifier must
/// never be invoked on such a region.
pub fn extract_roi(frame: &RgbImage, region: &FaceRegion, margin_ratio: f64) -> Option<RgbImage> {
    let (frame_w, frame_h) = frame.dimensions();
    let margin = (margin_ratio * region.width as f64) as u32;
    let padded = region.expanded(margin, frame_w, frame_h);

    if padded.width == 0 || padded.height == 0 {
        return None;
    }

    Some(imageops::crop_imm(frame, padded.x, padded.y, padded.width, padded.height).to_image())
}
