//! Rasterizing the mapped crop region out of the source bitmap.
//!
//! Extraction happens at native source resolution: the output holds
//! exactly the pixels of the mapped [`SourceRect`], not a display-scaled
//! rendition.

use super::geometry::SourceRect;
use crate::decode::DecodedImage;

/// Copy the pixels of `rect` out of `image` into a new bitmap.
///
/// The rectangle is clamped to the image bounds once more before copying,
/// so a stale rect can never read past the buffer; output is at least 1x1
/// for a non-empty source.
pub fn extract_region(image: &DecodedImage, rect: SourceRect) -> DecodedImage {
    if image.is_empty() {
        return DecodedImage::new(0, 0, Vec::new());
    }

    let x = rect.x.min(image.width - 1);
    let y = rect.y.min(image.height - 1);
    let w = rect.w.clamp(1, image.width - x);
    let h = rect.h.clamp(1, image.height - y);

    let mut output = Vec::with_capacity((w * h * 3) as usize);
    let src_stride = (image.width * 3) as usize;
    let row_bytes = (w * 3) as usize;

    for row in y..y + h {
        let start = row as usize * src_stride + (x * 3) as usize;
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    DecodedImage::new(w, h, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::geometry::{AspectRatio, CanvasSize, CropGeometry, CropRect};

    /// Bitmap where every pixel's red channel encodes its position.
    fn positional_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_extract_full_image() {
        let img = positional_image(10, 10);
        let out = extract_region(
            &img,
            SourceRect {
                x: 0,
                y: 0,
                w: 10,
                h: 10,
            },
        );
        assert_eq!(out.pixels, img.pixels);
    }

    #[test]
    fn test_extract_interior_region() {
        let img = positional_image(10, 10);
        let out = extract_region(
            &img,
            SourceRect {
                x: 2,
                y: 3,
                w: 4,
                h: 2,
            },
        );

        assert_eq!(out.width, 4);
        assert_eq!(out.height, 2);
        // First pixel is source (2, 3): value 3*10+2 = 32
        assert_eq!(out.pixels[0], 32);
        // Second row starts at source (2, 4): value 42
        assert_eq!(out.pixels[4 * 3], 42);
    }

    #[test]
    fn test_extract_clamps_oversized_rect() {
        let img = positional_image(10, 10);
        let out = extract_region(
            &img,
            SourceRect {
                x: 8,
                y: 8,
                w: 50,
                h: 50,
            },
        );
        assert_eq!(out.width, 2);
        assert_eq!(out.height, 2);
    }

    #[test]
    fn test_extract_from_empty_image() {
        let img = DecodedImage::new(0, 0, Vec::new());
        let out = extract_region(
            &img,
            SourceRect {
                x: 0,
                y: 0,
                w: 5,
                h: 5,
            },
        );
        assert!(out.is_empty());
    }

    /// The spec'd pixel-mapping check: a red square cropped at zoom 1 with
    /// no pan comes back exactly, at native size, all red.
    #[test]
    fn test_red_square_crop_via_geometry() {
        let mut img = DecodedImage::new(100, 100, vec![0u8; 100 * 100 * 3]);
        // Red 20x20 square at (30, 40)
        for y in 40..60u32 {
            for x in 30..50u32 {
                let i = ((y * 100 + x) * 3) as usize;
                img.pixels[i] = 255;
                img.pixels[i + 1] = 0;
                img.pixels[i + 2] = 0;
            }
        }

        let mut g = CropGeometry::new(CanvasSize { w: 100.0, h: 100.0 }, AspectRatio::square());
        g.rect = CropRect {
            x: 30.0,
            y: 40.0,
            w: 20.0,
            h: 20.0,
        };

        let out = extract_region(&img, g.map_to_source(100, 100));
        assert_eq!((out.width, out.height), (20, 20));
        for px in out.pixels.chunks_exact(3) {
            assert_eq!(px, &[255, 0, 0]);
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn positional_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    proptest! {
        /// Property: Output dimensions match the clamped rect and the
        /// buffer length is consistent.
        #[test]
        fn prop_extract_dimensions_consistent(
            (iw, ih) in (1u32..=64, 1u32..=64),
            (x, y, w, h) in (0u32..=80, 0u32..=80, 0u32..=80, 0u32..=80),
        ) {
            let img = positional_image(iw, ih);
            let out = extract_region(&img, SourceRect { x, y, w, h });

            prop_assert!(out.width >= 1 && out.height >= 1);
            prop_assert!(out.width <= iw && out.height <= ih);
            prop_assert_eq!(out.pixels.len(), (out.width * out.height * 3) as usize);
        }

        /// Property: Every output pixel equals the corresponding source pixel.
        #[test]
        fn prop_extract_pixels_match_source(
            (iw, ih) in (4u32..=40, 4u32..=40),
            (x, y) in (0u32..=10, 0u32..=10),
            (w, h) in (1u32..=16, 1u32..=16),
        ) {
            let img = positional_image(iw, ih);
            let rect = SourceRect { x, y, w, h };
            let out = extract_region(&img, rect);

            let sx = rect.x.min(iw - 1);
            let sy = rect.y.min(ih - 1);
            for oy in 0..out.height {
                for ox in 0..out.width {
                    let src = img.pixels[(((sy + oy) * iw + sx + ox) * 3) as usize];
                    let dst = out.pixels[((oy * out.width + ox) * 3) as usize];
                    prop_assert_eq!(src, dst);
                }
            }
        }
    }
}
