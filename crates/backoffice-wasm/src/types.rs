//! WASM-compatible wrapper types.
//!
//! This module provides JavaScript-friendly types that wrap the core
//! bitmap type, handling the conversion between Rust and JavaScript data
//! representations.

use backoffice_core::decode::DecodedImage;
use wasm_bindgen::prelude::*;

/// A decoded bitmap wrapper for JavaScript.
///
/// The crop dialog draws the staged bitmap onto a canvas; `rgba()` hands
/// back the pixel buffer in the RGBA layout `ImageData` expects.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory; `rgba()` copies it out to a
/// JavaScript `Uint8Array`. wasm-bindgen's finalizer releases the WASM
/// side automatically when the object is garbage collected.
#[wasm_bindgen]
pub struct JsBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Get the bitmap width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the bitmap height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA pixel data (4 bytes per pixel, alpha 255), ready for
    /// `new ImageData(new Uint8ClampedArray(buf), width, height)`.
    pub fn rgba(&self) -> Vec<u8> {
        let image = DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        };
        image.to_rgba_bytes()
    }
}

impl JsBitmap {
    /// Wrap a core bitmap. Internal constructor used by the crop bindings.
    pub(crate) fn from_decoded(img: &DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_wraps_dimensions() {
        let img = DecodedImage::new(3, 2, vec![7u8; 3 * 2 * 3]);
        let bitmap = JsBitmap::from_decoded(&img);
        assert_eq!(bitmap.width(), 3);
        assert_eq!(bitmap.height(), 2);
    }

    #[test]
    fn test_rgba_expands_with_opaque_alpha() {
        let img = DecodedImage::new(1, 1, vec![1, 2, 3]);
        let bitmap = JsBitmap::from_decoded(&img);
        assert_eq!(bitmap.rgba(), vec![1, 2, 3, 255]);
    }
}
