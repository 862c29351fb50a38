//! Interactive crop session lifecycle.
//!
//! One session per selected file:
//!
//! ```text
//! Idle -> Loaded -> Interacting(Dragging | Panning) -> Loaded
//!                -> Confirmed(output) | Cancelled
//! ```
//!
//! `stage` decodes the file and opens the session; a file that fails to
//! decode falls back to passing the original bytes through untouched so a
//! bad image never blocks the surrounding form. `confirm` maps the crop
//! rectangle to source pixels, extracts at native resolution, and encodes
//! a JPEG; `cancel` consumes the session and its bitmap.

use super::extract::extract_region;
use super::geometry::{fit_canvas, AspectRatio, CropGeometry, DEFAULT_SIZE_SCALE};
use crate::decode::{decode_image, DecodeError, DecodedImage};
use crate::encode::{encode_jpeg, output_file_name, EncodeError, DEFAULT_QUALITY};

/// Display and export settings for a crop session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropOptions {
    /// Bounding box the display canvas is fitted into.
    pub max_canvas_w: f64,
    pub max_canvas_h: f64,
    pub aspect: AspectRatio,
    pub size_scale: f64,
    /// JPEG export quality.
    pub quality: u8,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            max_canvas_w: 640.0,
            max_canvas_h: 480.0,
            aspect: AspectRatio::square(),
            size_scale: DEFAULT_SIZE_SCALE,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// The file handed back to the form's submit pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropOutput {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Result of staging a selected file for cropping.
#[derive(Debug)]
pub enum StagedImage {
    /// The file decoded; the user gets the interactive canvas.
    Interactive(Box<CropSession>),
    /// Decode failed; the original file passes through unchanged and the
    /// dialog never opens.
    Fallback(CropOutput),
}

/// Stage a selected file. Never fails: undecodable input degrades to a
/// pass-through of the original bytes.
pub fn stage(file_name: &str, bytes: &[u8], options: CropOptions) -> StagedImage {
    match CropSession::open(file_name, bytes, options) {
        Ok(session) => StagedImage::Interactive(Box::new(session)),
        Err(_) => StagedImage::Fallback(CropOutput {
            file_name: file_name.to_string(),
            bytes: bytes.to_vec(),
        }),
    }
}

/// Current pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Interaction {
    Idle,
    /// Pointer went down inside the rect; moves translate it.
    Dragging { x: f64, y: f64 },
    /// Pointer went down outside the rect; moves shift the image under it.
    Panning { x: f64, y: f64 },
}

/// A loaded crop dialog: owns the decoded bitmap and the canvas geometry.
#[derive(Debug)]
pub struct CropSession {
    file_name: String,
    bitmap: DecodedImage,
    geometry: CropGeometry,
    interaction: Interaction,
    quality: u8,
}

impl CropSession {
    /// Decode `bytes` and open a session with a centered initial rect.
    pub fn open(file_name: &str, bytes: &[u8], options: CropOptions) -> Result<Self, DecodeError> {
        let bitmap = decode_image(bytes)?;
        let canvas = fit_canvas(
            bitmap.width,
            bitmap.height,
            options.max_canvas_w,
            options.max_canvas_h,
        );
        let mut geometry = CropGeometry::new(canvas, options.aspect);
        geometry.set_size_scale(options.size_scale);

        Ok(Self {
            file_name: file_name.to_string(),
            bitmap,
            geometry,
            interaction: Interaction::Idle,
            quality: options.quality,
        })
    }

    pub fn geometry(&self) -> &CropGeometry {
        &self.geometry
    }

    pub fn bitmap(&self) -> &DecodedImage {
        &self.bitmap
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.interaction, Interaction::Dragging { .. })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.interaction, Interaction::Panning { .. })
    }

    /// Pointer down: inside the rect starts a drag, outside starts a pan.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.interaction = if self.geometry.rect.contains(x, y) {
            Interaction::Dragging { x, y }
        } else {
            Interaction::Panning { x, y }
        };
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        match self.interaction {
            Interaction::Idle => {}
            Interaction::Dragging { x: lx, y: ly } => {
                self.geometry.drag(x - lx, y - ly);
                self.interaction = Interaction::Dragging { x, y };
            }
            Interaction::Panning { x: lx, y: ly } => {
                self.geometry.pan_by(x - lx, y - ly);
                self.interaction = Interaction::Panning { x, y };
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.interaction = Interaction::Idle;
    }

    /// Wheel event: scrolling up zooms in one step, down zooms out.
    pub fn wheel(&mut self, delta_y: f64) {
        let steps = if delta_y < 0.0 { 1 } else { -1 };
        self.geometry.zoom_steps(steps);
    }

    pub fn set_aspect(&mut self, aspect: AspectRatio) {
        self.geometry.set_aspect(aspect);
    }

    pub fn set_size_scale(&mut self, size_scale: f64) {
        self.geometry.set_size_scale(size_scale);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.geometry.set_zoom(zoom);
    }

    /// Apply the crop: map to source pixels, extract at native resolution,
    /// encode as JPEG. Consumes the session (and releases the bitmap).
    pub fn confirm(self) -> Result<CropOutput, EncodeError> {
        let src = self
            .geometry
            .map_to_source(self.bitmap.width, self.bitmap.height);
        let region = extract_region(&self.bitmap, src);
        let bytes = encode_jpeg(&region, self.quality)?;

        Ok(CropOutput {
            file_name: output_file_name(&self.file_name),
            bytes,
        })
    }

    /// Close without output; all in-progress state is dropped.
    pub fn cancel(self) {}
}
