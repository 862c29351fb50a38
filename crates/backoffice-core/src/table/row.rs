//! The normalized row model shared by every list screen.
//!
//! Backend records arrive in per-endpoint shapes; normalization flattens
//! them into a [`Row`]: a stable `id`, a map of display-ready field values,
//! and a numeric creation timestamp for default sorting and "new today"
//! counting. Absent source fields become the `"-"` placeholder, never a
//! missing entry, so filter and sort comparisons stay total.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::datetime::same_utc_day;

/// Display placeholder for absent or null source fields.
pub const PLACEHOLDER: &str = "-";

/// One display value in a normalized row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldValue {
    /// Free text (names, emails, subjects, statuses).
    Text(String),
    /// Numeric value (amounts, counts, quantities).
    Number(f64),
    /// Timestamp with a pre-formatted display string and epoch millis.
    /// `ts` is 0 when the source string was unparseable.
    Date { display: String, ts: i64 },
}

impl FieldValue {
    /// Placeholder value for an absent field.
    pub fn placeholder() -> Self {
        FieldValue::Text(PLACEHOLDER.to_string())
    }

    /// The string shown in the table cell.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Date { display, .. } => display.clone(),
        }
    }

    /// Numeric sort key, if this value has one (numbers and dates).
    pub fn numeric(&self) -> Option<f64> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::Number(n) => Some(*n),
            FieldValue::Date { ts, .. } => Some(*ts as f64),
        }
    }
}

/// Render a number the way the dashboard tables do: integers without a
/// decimal point, everything else as-is.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// One normalized record displayed in a list/table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Stable identifier, unique within one fetched page.
    pub id: String,
    /// Creation timestamp in epoch millis; 0 when unparseable.
    pub created_ts: i64,
    fields: BTreeMap<String, FieldValue>,
}

impl Row {
    pub fn new(id: impl Into<String>, created_ts: i64) -> Self {
        Self {
            id: id.into(),
            created_ts,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field insertion, mostly for tests and fixtures.
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Display string for a field; the placeholder when the field is absent.
    pub fn display(&self, name: &str) -> String {
        self.field(name)
            .map(FieldValue::display)
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    /// Digit-only projection of this row's date fields, used for partial
    /// date search ("2025", "12", ...).
    pub fn date_digits(&self) -> String {
        self.fields
            .values()
            .filter_map(|v| match v {
                FieldValue::Date { display, .. } => Some(display.as_str()),
                _ => None,
            })
            .flat_map(|s| s.chars())
            .filter(|c| c.is_ascii_digit())
            .collect()
    }
}

/// Count rows created on the same UTC day as `now_millis`.
pub fn count_new_today(rows: &[Row], now_millis: i64) -> usize {
    rows.iter()
        .filter(|r| same_utc_day(r.created_ts, now_millis))
        .count()
}
