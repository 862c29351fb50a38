//! Form validation, submit guarding, and toast notifications.
//!
//! Validation runs entirely before any network call: required fields,
//! email format, and upload policy (type/size) all fail locally with
//! per-field messages plus an error toast. Submit failures keep the form
//! state and surface the backend message so the user can retry without
//! re-entering data.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::response::{error_message, GENERIC_ERROR};

/// Per-field message for an empty required field.
pub const REQUIRED: &str = "Required";
/// Per-field message for a malformed email.
pub const INVALID_EMAIL: &str = "Invalid email address";
/// Upload rejection messages.
pub const IMAGE_TOO_LARGE: &str = "Image size must be less than 2MB";
pub const IMAGE_BAD_TYPE: &str = "Only JPG, PNG or WEBP images are allowed";

/// A transient, non-blocking notification for success/error feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

/// Validation rules for one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    /// Validate as an email address when non-empty.
    #[serde(default)]
    pub email: bool,
}

impl FieldRule {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            email: false,
        }
    }

    pub fn email(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            email: true,
        }
    }
}

/// Declared rules for one form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormSpec {
    pub rules: Vec<FieldRule>,
}

impl FormSpec {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// Validate field values against the rules. An empty result map means
    /// the form may be submitted; a non-empty one blocks submission.
    pub fn validate(&self, values: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();
        for rule in &self.rules {
            let value = values.get(&rule.name).map(String::as_str).unwrap_or("");
            let trimmed = value.trim();

            if rule.required && trimmed.is_empty() {
                errors.insert(rule.name.clone(), REQUIRED.to_string());
                continue;
            }
            if rule.email && !trimmed.is_empty() && !is_valid_email(trimmed) {
                errors.insert(rule.name.clone(), INVALID_EMAIL.to_string());
            }
        }
        errors
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
    })
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Upload policy for image fields: accepted content types and a byte cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePolicy {
    pub max_bytes: u64,
    pub allowed_types: Vec<String>,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            max_bytes: 2 * 1024 * 1024,
            allowed_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

impl ImagePolicy {
    /// Check a selected file before it is staged for cropping. The error
    /// string is shown verbatim; a rejected file is never staged.
    pub fn check(&self, content_type: &str, size_bytes: u64) -> Result<(), String> {
        if !self
            .allowed_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(content_type))
        {
            return Err(IMAGE_BAD_TYPE.to_string());
        }
        if size_bytes >= self.max_bytes {
            return Err(IMAGE_TOO_LARGE.to_string());
        }
        Ok(())
    }
}

/// Self-disabling submit flag: prevents duplicate concurrent submits while
/// one request is outstanding.
#[derive(Debug, Clone, Default)]
pub struct SubmitGuard {
    submitting: bool,
}

impl SubmitGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the submit may proceed; false when one is already
    /// in flight.
    pub fn begin(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        true
    }

    pub fn finish(&mut self) {
        self.submitting = false;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }
}

/// Toast for a rejected create/update: backend message when present, else
/// the generic fallback. Form state is the caller's to keep.
pub fn submit_failure_toast(err_body: &Value) -> Toast {
    Toast::error(error_message(err_body, GENERIC_ERROR))
}
