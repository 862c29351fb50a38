//! The image crop pipeline for upload forms.
//!
//! A selected file is decoded into a bitmap, displayed on a fitted canvas
//! under a fixed-aspect crop rectangle the user can drag, pan beneath, and
//! zoom; confirming maps the rectangle back to source pixel coordinates
//! and re-encodes exactly that region at native resolution.
//!
//! # Structure
//!
//! - [`geometry`] - canvas fitting, pan/zoom/drag transitions, and the
//!   screen-to-source coordinate mapping
//! - [`extract`] - rasterizing the mapped region out of the bitmap
//! - [`session`] - the dialog lifecycle, including the decode-failure
//!   pass-through fallback

mod extract;
mod geometry;
mod session;

pub use extract::extract_region;
pub use geometry::{
    centered_rect, fit_canvas, AspectRatio, CanvasSize, CropGeometry, CropRect, Offset,
    SourceRect, DEFAULT_SIZE_SCALE, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP,
};
pub use session::{stage, CropOptions, CropOutput, CropSession, StagedImage};
