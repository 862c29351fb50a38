//! JPEG encoding for cropped uploads.
//!
//! Whatever format a user selects, the crop pipeline hands the backend a
//! JPEG: it compresses well for photos and every screen that renders the
//! upload expects it. Quality defaults to [`DEFAULT_QUALITY`].

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;
use thiserror::Error;

use crate::decode::DecodedImage;

/// Export quality used when re-encoding a cropped image.
pub const DEFAULT_QUALITY: u8 = 82;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode a decoded image to JPEG bytes.
///
/// `quality` is clamped to 1-100; pass [`DEFAULT_QUALITY`] for uploads.
pub fn encode_jpeg(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected_len = (image.width as usize) * (image.height as usize) * 3;
    if image.pixels.len() != expected_len {
        return Err(EncodeError::InvalidPixelData {
            expected: expected_len,
            actual: image.pixels.len(),
        });
    }

    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);

    encoder
        .write_image(
            &image.pixels,
            image.width,
            image.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Derive the output filename for a cropped upload: the original name with
/// its extension swapped for `.jpg`.
///
/// A name without an extension simply gains one.
pub fn output_file_name(original: &str) -> String {
    match original.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => format!("{stem}.jpg"),
        _ => format!("{original}.jpg"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_image(width: u32, height: u32) -> DecodedImage {
        DecodedImage::new(width, height, vec![128u8; (width * height * 3) as usize])
    }

    #[test]
    fn test_encode_jpeg_basic() {
        let jpeg_bytes = encode_jpeg(&gray_image(100, 100), DEFAULT_QUALITY).unwrap();

        // SOI marker at the start, EOI marker at the end
        assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8]);
        let len = jpeg_bytes.len();
        assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let img = gray_image(10, 10);

        // Quality 0 clamps to 1, 255 clamps to 100
        assert!(encode_jpeg(&img, 0).is_ok());
        assert!(encode_jpeg(&img, 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_invalid_pixel_data() {
        let img = DecodedImage {
            width: 100,
            height: 100,
            pixels: vec![128u8; 99 * 100 * 3], // One row short
        };
        let result = encode_jpeg(&img, 90);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_jpeg_zero_dimensions() {
        let img = DecodedImage {
            width: 0,
            height: 100,
            pixels: vec![],
        };
        let result = encode_jpeg(&img, 90);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_jpeg_single_pixel() {
        let img = DecodedImage::new(1, 1, vec![255, 0, 0]);
        let jpeg_bytes = encode_jpeg(&img, 90).unwrap();
        assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_output_file_name_swaps_extension() {
        assert_eq!(output_file_name("banner.png"), "banner.jpg");
        assert_eq!(output_file_name("photo.JPEG"), "photo.jpg");
        assert_eq!(output_file_name("a.b.webp"), "a.b.jpg");
    }

    #[test]
    fn test_output_file_name_without_extension() {
        assert_eq!(output_file_name("upload"), "upload.jpg");
        // A leading dot is not an extension separator
        assert_eq!(output_file_name(".hidden"), ".hidden.jpg");
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
