//! File-based frame sources.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use image::RgbImage;
use tracing::warn;

use estream_vision::{VisionError, VisionResult};

use crate::FrameSource;

/// Plays back still images from a directory in filename order.
///
/// Undecodable files are skipped with a warning, the way a camera source
/// skips a bad capture.
pub struct ImageDirSource {
    files: VecDeque<PathBuf>,
}

impl ImageDirSource {
    pub fn open(dir: &Path) -> VisionResult<Self> {
        if !dir.is_dir() {
            return Err(VisionError::backend(format!(
                "not a directory: {}",
                dir.display()
            )));
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        Ok(Self {
            files: files.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> VisionResult<Option<RgbImage>> {
        while let Some(path) = self.files.pop_front() {
            match image::open(&path) {
                Ok(img) => return Ok(Some(img.to_rgb8())),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping undecodable file");
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str, shade: u8) {
        let frame = RgbImage::from_pixel(8, 8, Rgb([shade, 0, 0]));
        frame.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_frames_come_back_in_filename_order() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "b.png", 20);
        write_png(dir.path(), "a.png", 10);
        write_png(dir.path(), "c.png", 30);

        let mut source = ImageDirSource::open(dir.path()).unwrap();
        assert_eq!(source.len(), 3);

        let shades: Vec<u8> = std::iter::from_fn(|| source.next_frame().unwrap())
            .map(|f| f.get_pixel(0, 0).0[0])
            .collect();
        assert_eq!(shades, vec![10, 20, 30]);
    }

    #[test]
    fn test_undecodable_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 10);
        std::fs::write(dir.path().join("b.png"), b"not an image").unwrap();
        write_png(dir.path(), "c.png", 30);

        let mut source = ImageDirSource::open(dir.path()).unwrap();
        let mut count = 0;
        while source.next_frame().unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        assert!(ImageDirSource::open(Path::new("/nonexistent/frames")).is_err());
    }
}
