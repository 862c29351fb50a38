//! Backoffice WASM - WebAssembly bindings for the admin dashboard core
//!
//! This crate exposes the backoffice-core pipelines to the
//! JavaScript/TypeScript dashboard.
//!
//! # Module Structure
//!
//! - `table` - list screen state (fetch lifecycle, filter/sort/paginate)
//! - `form` - validation, upload policy checks, submit guarding
//! - `crop` - the interactive crop session and its pass-through fallback
//! - `types` - JS-friendly wrapper types
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsTableView, stage_image } from '@backoffice/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const view = new JsTableView(contactSchema, false, 10);
//! const token = view.begin_fetch();
//! view.apply_success(token, await api.getContacts());
//! renderTable(view.visible_rows());
//! ```

use wasm_bindgen::prelude::*;

mod crop;
mod form;
mod table;
mod types;

// Re-export public types
pub use crop::{stage_image, JsCropFile, JsCropSession, JsCropStage};
pub use form::{check_image_upload, submit_failure_message, validate_form, JsSubmitGuard};
pub use table::JsTableView;
pub use types::JsBitmap;

/// Serialize a core value for JavaScript as plain objects/arrays.
///
/// The default serde-wasm-bindgen serializer turns Rust maps into JS
/// `Map` instances; the dashboard expects plain objects, so every value
/// crossing the boundary goes through the JSON-compatible serializer.
pub(crate) fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Log a recoverable fault to the browser console. Faults still surface
/// to the user through the regular UI message; this is the developer
/// breadcrumb.
pub(crate) fn console_warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
