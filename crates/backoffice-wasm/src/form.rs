//! Form validation WASM bindings.
//!
//! Stateless helpers for the create/edit forms: field validation, the
//! image upload policy check, the duplicate-submit guard, and the failure
//! toast message.
//!
//! # Example
//!
//! ```typescript
//! import { validate_form, check_image_upload, JsSubmitGuard } from '@backoffice/wasm';
//!
//! const spec = { rules: [
//!   { name: 'name', required: true },
//!   { name: 'email', required: true, email: true },
//! ]};
//!
//! const errors = validate_form(spec, { name: '', email: 'nope' });
//! // { name: 'Required', email: 'Invalid email address' }
//!
//! const rejection = check_image_upload(file.type, file.size);
//! if (rejection) toast.error(rejection);
//! ```

use std::collections::BTreeMap;

use backoffice_core::form::{submit_failure_toast, FormSpec, ImagePolicy};
use backoffice_core::SubmitGuard;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::to_js;

/// Validate form values against a rule spec.
///
/// # Arguments
/// * `spec` - `{ rules: [{ name, required?, email? }] }`
/// * `values` - `{ fieldName: value }` (missing fields count as empty)
///
/// # Returns
/// A `{ fieldName: message }` object holding one message per failing
/// field; empty when the form is valid.
#[wasm_bindgen]
pub fn validate_form(spec: JsValue, values: JsValue) -> Result<JsValue, JsValue> {
    let spec: FormSpec = serde_wasm_bindgen::from_value(spec)
        .map_err(|e| JsValue::from_str(&format!("Invalid form spec: {}", e)))?;
    let values: BTreeMap<String, String> = serde_wasm_bindgen::from_value(values)
        .map_err(|e| JsValue::from_str(&format!("Invalid form values: {}", e)))?;

    to_js(&spec.validate(&values))
}

/// Check a selected image file against the upload policy (JPEG, PNG or
/// WEBP, under 2MB).
///
/// # Returns
/// The rejection message to show, or undefined when the file is
/// acceptable.
#[wasm_bindgen]
pub fn check_image_upload(content_type: &str, size_bytes: f64) -> Option<String> {
    ImagePolicy::default()
        .check(content_type, size_bytes as u64)
        .err()
}

/// Toast message for a rejected create/update: the backend message when
/// the error body carries one, else the generic fallback.
#[wasm_bindgen]
pub fn submit_failure_message(err_body: JsValue) -> String {
    let body: Value = serde_wasm_bindgen::from_value(err_body).unwrap_or(Value::Null);
    submit_failure_toast(&body).message
}

/// Duplicate-submit guard for one form.
///
/// ```typescript
/// const guard = new JsSubmitGuard();
/// async function onSubmit() {
///   if (!guard.begin()) return;  // a submit is already in flight
///   try { await api.createContact(payload); }
///   finally { guard.finish(); }
/// }
/// ```
#[wasm_bindgen]
#[derive(Default)]
pub struct JsSubmitGuard {
    inner: SubmitGuard,
}

#[wasm_bindgen]
impl JsSubmitGuard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsSubmitGuard {
        JsSubmitGuard::default()
    }

    /// Returns true when the submit may proceed; false when one is
    /// already in flight.
    pub fn begin(&mut self) -> bool {
        self.inner.begin()
    }

    pub fn finish(&mut self) {
        self.inner.finish();
    }

    #[wasm_bindgen(getter)]
    pub fn is_submitting(&self) -> bool {
        self.inner.is_submitting()
    }
}


/// WASM-specific tests that require JsValue.
///
/// These tests exercise the serde boundary and can only run on wasm32
/// targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use serde_json::json;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_validate_form_from_js_values() {
        let spec = to_js(&json!({ "rules": [
            { "name": "title", "required": true },
            { "name": "email", "required": true, "email": true }
        ]}))
        .unwrap();
        let values = to_js(&json!({ "title": "", "email": "nope" })).unwrap();

        let errors: std::collections::BTreeMap<String, String> =
            serde_wasm_bindgen::from_value(validate_form(spec, values).unwrap()).unwrap();
        assert_eq!(errors.get("title").map(String::as_str), Some("Required"));
        assert_eq!(
            errors.get("email").map(String::as_str),
            Some("Invalid email address")
        );
    }

    #[wasm_bindgen_test]
    fn test_bad_spec_is_an_error() {
        let values = to_js(&json!({})).unwrap();
        assert!(validate_form(JsValue::from_f64(5.0), values).is_err());
    }

    #[wasm_bindgen_test]
    fn test_submit_failure_message_from_js() {
        let body = to_js(&json!({ "response": { "data": { "message": "Title taken" } } })).unwrap();
        assert_eq!(submit_failure_message(body), "Title taken");
    }
}
