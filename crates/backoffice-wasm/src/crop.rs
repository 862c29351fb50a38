//! Crop dialog WASM bindings.
//!
//! `stage_image` is the entry point: the host passes the selected file's
//! bytes and gets back either an interactive session (draw the bitmap,
//! forward pointer/wheel events, `confirm`/`cancel`) or a pass-through
//! fallback when the file cannot be decoded.
//!
//! # Example
//!
//! ```typescript
//! import { stage_image } from '@backoffice/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const staged = stage_image(file.name, bytes);
//!
//! if (staged.is_interactive) {
//!   const session = staged.take_session();
//!   openCropDialog(session);           // canvas + pointer handlers
//!   const output = session.confirm();  // on "Apply"
//!   form.setImage(output.file_name, output.bytes());
//! } else {
//!   const output = staged.take_fallback();
//!   form.setImage(output.file_name, output.bytes());
//! }
//! ```

use crate::console_warn;
use crate::types::JsBitmap;
use backoffice_core::crop::{
    stage, AspectRatio, CropOptions, CropOutput, CropSession, StagedImage,
};
use wasm_bindgen::prelude::*;

/// A cropped (or passed-through) file ready for the form's submit payload.
#[wasm_bindgen]
pub struct JsCropFile {
    file_name: String,
    bytes: Vec<u8>,
}

#[wasm_bindgen]
impl JsCropFile {
    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    /// The encoded file bytes as a `Uint8Array` (copies out of WASM
    /// memory).
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl JsCropFile {
    fn from_output(output: CropOutput) -> Self {
        Self {
            file_name: output.file_name,
            bytes: output.bytes,
        }
    }
}

/// Result of staging a selected file: an interactive session or a
/// pass-through fallback, never an error.
///
/// Exactly one of `take_session`/`take_fallback` yields a value, once;
/// subsequent calls return undefined.
#[wasm_bindgen]
pub struct JsCropStage {
    session: Option<CropSession>,
    fallback: Option<CropOutput>,
}

#[wasm_bindgen]
impl JsCropStage {
    #[wasm_bindgen(getter)]
    pub fn is_interactive(&self) -> bool {
        self.session.is_some()
    }

    /// Take the interactive session. Undefined on the fallback path or
    /// after it has already been taken.
    pub fn take_session(&mut self) -> Option<JsCropSession> {
        self.session
            .take()
            .map(|inner| JsCropSession { inner: Some(inner) })
    }

    /// Take the pass-through file. Undefined on the interactive path or
    /// after it has already been taken.
    pub fn take_fallback(&mut self) -> Option<JsCropFile> {
        self.fallback.take().map(JsCropFile::from_output)
    }
}

/// Stage a selected file for cropping.
///
/// Never throws: a file that fails to decode degrades to a pass-through
/// fallback carrying the original bytes, and the dialog is skipped.
#[wasm_bindgen]
pub fn stage_image(file_name: &str, bytes: &[u8]) -> JsCropStage {
    match stage(file_name, bytes, CropOptions::default()) {
        StagedImage::Interactive(session) => JsCropStage {
            session: Some(*session),
            fallback: None,
        },
        StagedImage::Fallback(output) => {
            console_warn(&format!(
                "image '{}' could not be decoded; uploading original file",
                file_name
            ));
            JsCropStage {
                session: None,
                fallback: Some(output),
            }
        }
    }
}

/// An open crop dialog.
///
/// The host draws `bitmap()` onto the canvas at `image_dest()` each frame,
/// overlays `rect()`, and forwards pointer and wheel events. `confirm`
/// and `cancel` close the session; any call after that throws.
#[wasm_bindgen]
pub struct JsCropSession {
    inner: Option<CropSession>,
}

impl JsCropSession {
    fn session(&self) -> Result<&CropSession, JsValue> {
        self.inner
            .as_ref()
            .ok_or_else(|| JsValue::from_str("Crop session already closed"))
    }

    fn session_mut(&mut self) -> Result<&mut CropSession, JsValue> {
        self.inner
            .as_mut()
            .ok_or_else(|| JsValue::from_str("Crop session already closed"))
    }
}

#[wasm_bindgen]
impl JsCropSession {
    /// The decoded bitmap, for the initial canvas draw.
    pub fn bitmap(&self) -> Result<JsBitmap, JsValue> {
        Ok(JsBitmap::from_decoded(self.session()?.bitmap()))
    }

    /// Canvas size as `[width, height]`.
    pub fn canvas_size(&self) -> Result<Vec<f64>, JsValue> {
        let canvas = self.session()?.geometry().canvas;
        Ok(vec![canvas.w, canvas.h])
    }

    /// Where to draw the bitmap this frame, as `[x, y, w, h]` in canvas
    /// coordinates (reflects the current pan and zoom).
    pub fn image_dest(&self) -> Result<Vec<f64>, JsValue> {
        let (x, y, w, h) = self.session()?.geometry().image_dest();
        Ok(vec![x, y, w, h])
    }

    /// The crop rectangle overlay as `[x, y, w, h]` in canvas coordinates.
    pub fn rect(&self) -> Result<Vec<f64>, JsValue> {
        let rect = self.session()?.geometry().rect;
        Ok(vec![rect.x, rect.y, rect.w, rect.h])
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> Result<f64, JsValue> {
        Ok(self.session()?.geometry().zoom)
    }

    /// Pointer down in canvas coordinates. Inside the rect starts a drag;
    /// outside starts a pan.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.session_mut()?.pointer_down(x, y);
        Ok(())
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.session_mut()?.pointer_move(x, y);
        Ok(())
    }

    pub fn pointer_up(&mut self) -> Result<(), JsValue> {
        self.session_mut()?.pointer_up();
        Ok(())
    }

    /// Wheel event: pass the raw `deltaY` (negative zooms in).
    pub fn wheel(&mut self, delta_y: f64) -> Result<(), JsValue> {
        self.session_mut()?.wheel(delta_y);
        Ok(())
    }

    /// Change the crop aspect ratio (e.g. `set_aspect(16, 9)`). Recenters
    /// the rectangle.
    pub fn set_aspect(&mut self, rw: f64, rh: f64) -> Result<(), JsValue> {
        self.session_mut()?.set_aspect(AspectRatio::new(rw, rh));
        Ok(())
    }

    /// Change the rectangle size relative to the canvas (0.1 to 1.0).
    pub fn set_size_scale(&mut self, size_scale: f64) -> Result<(), JsValue> {
        self.session_mut()?.set_size_scale(size_scale);
        Ok(())
    }

    /// Set the zoom level directly (slider input; clamped).
    pub fn set_zoom(&mut self, zoom: f64) -> Result<(), JsValue> {
        self.session_mut()?.set_zoom(zoom);
        Ok(())
    }

    /// Apply the crop: extract the selected region at native resolution
    /// and encode it as JPEG. Closes the session.
    ///
    /// # Errors
    /// Throws if the session is already closed or encoding fails.
    pub fn confirm(&mut self) -> Result<JsCropFile, JsValue> {
        let session = self
            .inner
            .take()
            .ok_or_else(|| JsValue::from_str("Crop session already closed"))?;
        session
            .confirm()
            .map(JsCropFile::from_output)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Close without output, releasing the bitmap.
    pub fn cancel(&mut self) {
        if let Some(session) = self.inner.take() {
            session.cancel();
        }
    }
}
