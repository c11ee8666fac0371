//! File-based display sinks.

use std::path::{Path, PathBuf};

use image::RgbImage;

use estream_vision::VisionResult;

use crate::DisplaySink;

/// Writes annotated frames to a directory as numbered PNGs.
pub struct PngDirSink {
    dir: PathBuf,
    index: u32,
}

impl PngDirSink {
    pub fn create(dir: &Path) -> VisionResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            index: 0,
        })
    }
}

impl DisplaySink for PngDirSink {
    fn present(&mut self, frame: &RgbImage) -> VisionResult<()> {
        self.index += 1;
        let path = self.dir.join(format!("frame_{:05}.png", self.index));
        frame.save(&path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_frames_are_written_numbered() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = PngDirSink::create(dir.path()).unwrap();

        let frame = RgbImage::from_pixel(8, 8, Rgb([1, 2, 3]));
        sink.present(&frame).unwrap();
        sink.present(&frame).unwrap();

        assert!(dir.path().join("frame_00001.png").exists());
        assert!(dir.path().join("frame_00002.png").exists());
    }

    #[test]
    fn test_create_makes_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out/frames");
        let _sink = PngDirSink::create(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
