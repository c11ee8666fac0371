//! Frame annotation: face boxes, labels, emotion tints, preview HUD.

use std::time::Instant;

use image::{Rgb, RgbImage};

use estream_models::{DetectionResult, OverlayKind};

use crate::draw;

const FACE_BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const LABEL_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const SCAN_LINE_COLOR: Rgb<u8> = Rgb([255, 255, 0]);
const WARNING_COLOR: Rgb<u8> = Rgb([255, 40, 40]);
const HUD_TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const HUD_BOX_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

const WARNING_TEXT: &str = "Warning: High Stress Detected!";

/// Tint color and alpha for an overlay category.
fn tint_for(kind: OverlayKind) -> (Rgb<u8>, f32) {
    match kind {
        OverlayKind::Stress => (Rgb([255, 0, 0]), 0.3),
        OverlayKind::Positive => (Rgb([0, 255, 0]), 0.2),
        OverlayKind::Calm => (Rgb([255, 255, 0]), 0.1),
    }
}

/// Cosmetic animation state for the local preview.
///
/// The only per-frame state that outlives a processing cycle: the scan
/// line position/direction and the wall-clock instant of the previous
/// completion for the FPS readout.
#[derive(Debug)]
pub struct HudState {
    scan_y: i32,
    scan_step: i32,
    fps: f64,
    last_tick: Option<Instant>,
}

impl HudState {
    pub fn new(scan_step: i32) -> Self {
        Self {
            scan_y: 0,
            scan_step: scan_step.max(1),
            fps: 0.0,
            last_tick: None,
        }
    }

    /// Current scan-line position.
    pub fn scan_y(&self) -> i32 {
        self.scan_y
    }

    /// FPS derived from the delta between consecutive frame completions.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Record a frame completion at `now`.
    fn tick(&mut self, now: Instant) {
        if let Some(last) = self.last_tick {
            let delta = now.duration_since(last).as_secs_f64();
            if delta > 0.0 {
                self.fps = 1.0 / delta;
            }
        }
        self.last_tick = Some(now);
    }

    /// Advance the scan line, reversing direction at the frame bounds.
    fn advance_scan(&mut self, frame_height: u32) {
        self.scan_y += self.scan_step;
        if self.scan_y >= frame_height as i32 || self.scan_y <= 0 {
            self.scan_step = -self.scan_step;
            self.scan_y = self.scan_y.clamp(0, frame_height as i32);
        }
    }
}

/// Draw detection boxes, labels, and emotion tints onto the frame, plus
/// the HUD when a preview state is supplied.
///
/// Tints compose in detection order: each detection's overlay is blended
/// over the result of the previous ones.
pub fn annotate(frame: &mut RgbImage, detections: &[DetectionResult], hud: Option<&mut HudState>) {
    for detection in detections {
        draw::draw_region_box(frame, &detection.region, FACE_BOX_COLOR);

        let label = format!("EMOTION: {}", detection.label.as_str().to_uppercase());
        let label_y = detection.region.y as i32 - draw::GLYPH_HEIGHT as i32 - 2;
        draw::draw_text(frame, &label, detection.region.x as i32, label_y, LABEL_COLOR);
    }

    for detection in detections {
        if let Some(kind) = detection.label.overlay() {
            let (color, alpha) = tint_for(kind);
            draw::blend_tint(frame, color, alpha);

            if kind == OverlayKind::Stress {
                let y = frame.height() as i32 - 30;
                // Two offset passes make a bold stroke.
                draw::draw_text(frame, WARNING_TEXT, 50, y, WARNING_COLOR);
                draw::draw_text(frame, WARNING_TEXT, 51, y, WARNING_COLOR);
            }
        }
    }

    if let Some(hud) = hud {
        draw_hud(frame, hud);
    }
}

/// Scan line plus FPS readout; advances the animation state.
fn draw_hud(frame: &mut RgbImage, hud: &mut HudState) {
    hud.tick(Instant::now());

    let height = frame.height();
    draw::draw_scan_line(frame, hud.scan_y.clamp(0, height as i32 - 1), SCAN_LINE_COLOR);
    hud.advance_scan(height);

    draw::fill_box(frame, 5, 5, 80, 25, HUD_BOX_COLOR);
    let readout = format!("FPS: {}", hud.fps.round() as u32);
    draw::draw_text(frame, &readout, 10, 11, HUD_TEXT_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use estream_models::{EmotionLabel, EmotionScores, FaceRegion};
    use std::time::Duration;

    fn blank_frame() -> RgbImage {
        RgbImage::from_pixel(100, 100, Rgb([100, 100, 100]))
    }

    fn detection(label: EmotionLabel, confidence: f32) -> DetectionResult {
        let scores = EmotionScores::from_pairs(&[(label, confidence)]);
        DetectionResult::classified(FaceRegion::new(30, 30, 20, 20), label, confidence, scores)
    }

    #[test]
    fn test_empty_detections_leave_frame_untinted() {
        let mut frame = blank_frame();
        annotate(&mut frame, &[], None);
        assert_eq!(frame.get_pixel(0, 0).0, [100, 100, 100]);
    }

    #[test]
    fn test_angry_face_gets_red_tint_and_warning() {
        let mut frame = blank_frame();
        annotate(&mut frame, &[detection(EmotionLabel::Angry, 85.0)], None);

        // Tint: 255*0.3 + 100*0.7 = 146.5 -> 147 red channel at an
        // untouched corner pixel
        let corner = frame.get_pixel(99, 0);
        assert_eq!(corner.0, [147, 70, 70]);

        // Warning text paints red pixels near the bottom of the frame
        let warning_pixels = (0..100)
            .flat_map(|x| (70..100).map(move |y| (x, y)))
            .filter(|&(x, y)| frame.get_pixel(x, y).0 == WARNING_COLOR.0)
            .count();
        assert!(warning_pixels > 0, "expected warning text pixels");
    }

    #[test]
    fn test_happy_face_gets_green_tint_without_warning() {
        let mut frame = blank_frame();
        annotate(&mut frame, &[detection(EmotionLabel::Happy, 90.0)], None);

        // 255*0.2 + 100*0.8 = 131 on green
        let corner = frame.get_pixel(99, 0);
        assert_eq!(corner.0, [80, 131, 80]);

        let warning_pixels = frame
            .pixels()
            .filter(|p| p.0 == WARNING_COLOR.0)
            .count();
        assert_eq!(warning_pixels, 0);
    }

    #[test]
    fn test_uncertain_face_gets_box_but_no_tint() {
        let mut frame = blank_frame();
        let det = DetectionResult::uncertain(FaceRegion::new(30, 30, 20, 20));
        annotate(&mut frame, &[det], None);

        // Box painted
        assert_eq!(frame.get_pixel(30, 30).0, [0, 255, 0]);
        // Corner untouched: no tint
        assert_eq!(frame.get_pixel(99, 0).0, [100, 100, 100]);
    }

    #[test]
    fn test_scan_line_bounces_at_bounds() {
        let mut hud = HudState::new(40);
        let mut frame = blank_frame();
        // Drive the scan line well past one full sweep.
        for _ in 0..10 {
            draw_hud(&mut frame, &mut hud);
            assert!(hud.scan_y() >= 0);
            assert!(hud.scan_y() <= 100);
        }
    }

    #[test]
    fn test_fps_from_completion_delta() {
        let mut hud = HudState::new(5);
        let start = Instant::now();
        hud.tick(start);
        hud.tick(start + Duration::from_millis(50));
        assert!((hud.fps() - 20.0).abs() < 0.5, "fps was {}", hud.fps());
    }

    #[test]
    fn test_hud_draws_scan_line_and_readout() {
        let mut frame = blank_frame();
        let mut hud = HudState::new(5);
        annotate(&mut frame, &[], Some(&mut hud));

        // Scan line starts at the top edge
        assert_eq!(frame.get_pixel(50, 0).0, SCAN_LINE_COLOR.0);
        // HUD backdrop
        assert_eq!(frame.get_pixel(6, 6).0, HUD_BOX_COLOR.0);
    }
}
