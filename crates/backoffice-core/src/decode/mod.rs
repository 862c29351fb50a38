//! Image decoding for upload forms.
//!
//! This module turns user-selected files into RGB bitmaps the crop
//! pipeline can work on:
//! - Format sniffing and decoding of web rasters (JPEG, PNG, WebP)
//! - EXIF orientation correction for camera uploads
//!
//! Decoding runs synchronously; the dashboard calls it from a Web Worker
//! through the WASM bindings so the UI thread stays responsive.

mod raster;
mod types;

pub use raster::decode_image;
pub use types::{DecodeError, DecodedImage, Orientation};
