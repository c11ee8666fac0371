//! Base64 frame codec.
//!
//! Clients send stills as base64 strings, optionally prefixed with a
//! data-URI header (`data:image/jpeg;base64,...`). The header, when
//! present, is everything up to and including the first comma.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::error::{VisionError, VisionResult};

/// JPEG quality for encoded result frames.
const JPEG_QUALITY: u8 = 90;

/// Decode a base64 payload (with optional data-URI header) into an RGB frame.
pub fn decode_frame(payload: &str) -> VisionResult<RgbImage> {
    let encoded = match payload.split_once(',') {
        Some((_, rest)) => rest,
        None => payload,
    };

    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| VisionError::decode(format!("invalid base64: {e}")))?;

    let image = image::load_from_memory(&bytes)
        .map_err(|e| VisionError::decode(format!("invalid image data: {e}")))?;

    Ok(image.to_rgb8())
}

/// Encode a frame as a JPEG data-URI string.
pub fn encode_frame(frame: &RgbImage) -> VisionResult<String> {
    let mut bytes = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    frame.write_with_encoder(encoder)?;
    Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::png::PngEncoder;
    use image::Rgb;

    fn png_base64(frame: &RgbImage) -> String {
        let mut bytes = Vec::new();
        frame
            .write_with_encoder(PngEncoder::new(&mut bytes))
            .unwrap();
        BASE64.encode(&bytes)
    }

    fn test_frame() -> RgbImage {
        RgbImage::from_fn(8, 6, |x, y| Rgb([x as u8 * 10, y as u8 * 20, 128]))
    }

    #[test]
    fn test_decode_bare_base64() {
        let frame = test_frame();
        let decoded = decode_frame(&png_base64(&frame)).unwrap();
        assert_eq!(decoded.dimensions(), (8, 6));
        assert_eq!(decoded.get_pixel(3, 2), frame.get_pixel(3, 2));
    }

    #[test]
    fn test_decode_strips_data_uri_header() {
        let payload = format!("data:image/png;base64,{}", png_base64(&test_frame()));
        let decoded = decode_frame(&payload).unwrap();
        assert_eq!(decoded.dimensions(), (8, 6));
    }

    #[test]
    fn test_decode_rejects_garbage_base64() {
        let err = decode_frame("!!!not-base64!!!").unwrap_err();
        assert!(matches!(err, VisionError::Decode(_)));
    }

    #[test]
    fn test_decode_rejects_non_image_bytes() {
        let payload = BASE64.encode(b"just some text");
        let err = decode_frame(&payload).unwrap_err();
        assert!(matches!(err, VisionError::Decode(_)));
    }

    #[test]
    fn test_encode_produces_jpeg_data_uri() {
        let encoded = encode_frame(&test_frame()).unwrap();
        assert!(encoded.starts_with("data:image/jpeg;base64,"));
        // And it must decode back to a frame of the same size.
        let decoded = decode_frame(&encoded).unwrap();
        assert_eq!(decoded.dimensions(), (8, 6));
    }
}
