//! Face regions in frame-pixel coordinates.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A detected face rectangle, in pixels of the frame it came from.
///
/// Detectors only hand out regions satisfying `x + width <= frame width`
/// and `y + height <= frame height`; `fits_within` checks the invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate (exclusive).
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate (exclusive).
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Region area in pixels.
    #[inline]
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether the region lies fully inside a frame of the given size.
    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.right() <= frame_width && self.bottom() <= frame_height
    }

    /// Intersection over union with another region.
    pub fn iou(&self, other: &FaceRegion) -> f64 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = self.right().min(other.right());
        let iy2 = self.bottom().min(other.bottom());

        if ix2 <= ix1 || iy2 <= iy1 {
            return 0.0;
        }

        let inter = (ix2 - ix1) as f64 * (iy2 - iy1) as f64;
        let union = self.area() as f64 + other.area() as f64 - inter;
        if union > 0.0 {
            inter / union
        } else {
            0.0
        }
    }

    /// Expand by `margin` pixels on every side, clamped to frame bounds.
    ///
    /// The result can be zero-sized for pathological inputs at frame edges;
    /// callers that crop pixels must guard against that.
    pub fn expanded(&self, margin: u32, frame_width: u32, frame_height: u32) -> FaceRegion {
        let x1 = self.x.saturating_sub(margin);
        let y1 = self.y.saturating_sub(margin);
        let x2 = self.right().saturating_add(margin).min(frame_width);
        let y2 = self.bottom().saturating_add(margin).min(frame_height);

        FaceRegion {
            x: x1.min(frame_width),
            y: y1.min(frame_height),
            width: x2.saturating_sub(x1.min(frame_width)),
            height: y2.saturating_sub(y1.min(frame_height)),
        }
    }
}
