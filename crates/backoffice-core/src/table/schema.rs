//! Per-endpoint normalization adapters.
//!
//! Each list screen declares a [`TableSchema`]: where the record id and
//! creation timestamp live, and which source paths map onto which columns.
//! Normalization is strict about shape (a record that is not a JSON object
//! or has no id is a typed error, not a silently skipped row) but lenient
//! about content: a missing or null field becomes the `"-"` placeholder.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::datetime::{format_display, parse_timestamp_millis};
use super::row::{FieldValue, Row};

/// Errors raised when a backend record does not match its declared shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// The record is not a JSON object.
    #[error("record at index {0} is not a JSON object")]
    NotAnObject(usize),

    /// The record has no usable id at the declared path.
    #[error("record at index {index} is missing id field `{path}`")]
    MissingId { index: usize, path: String },
}

/// How a source value is interpreted for display, search, and sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Date,
}

/// One column mapping: display name, dotted source path, kind, and whether
/// free-text search looks at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub path: String,
    pub kind: FieldKind,
    pub searchable: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, path: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
            searchable: false,
        }
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }
}

/// Declared shape of one endpoint's records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Dotted path to the stable record id (e.g. `_id`).
    pub id_path: String,
    /// Dotted path to the creation timestamp used for default sort.
    pub created_path: String,
    pub fields: Vec<FieldSpec>,
}

impl TableSchema {
    pub fn new(id_path: impl Into<String>, created_path: impl Into<String>) -> Self {
        Self {
            id_path: id_path.into(),
            created_path: created_path.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Names of the fields free-text search matches against.
    pub fn searchable_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.searchable)
            .map(|f| f.name.clone())
            .collect()
    }

    pub fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.kind)
    }

    /// Normalize one raw record into a [`Row`].
    pub fn normalize(&self, record: &Value, index: usize) -> Result<Row, NormalizeError> {
        if !record.is_object() {
            return Err(NormalizeError::NotAnObject(index));
        }

        let id = lookup(record, &self.id_path)
            .and_then(scalar_string)
            .ok_or_else(|| NormalizeError::MissingId {
                index,
                path: self.id_path.clone(),
            })?;

        let created_ts = lookup(record, &self.created_path)
            .and_then(timestamp_millis)
            .unwrap_or(0);

        let mut row = Row::new(id, created_ts);
        for spec in &self.fields {
            let value = lookup(record, &spec.path)
                .map(|v| convert(v, spec.kind))
                .unwrap_or_else(FieldValue::placeholder);
            row.set_field(spec.name.clone(), value);
        }
        Ok(row)
    }

    /// Normalize a whole fetched collection, preserving order.
    pub fn normalize_all(&self, records: &[Value]) -> Result<Vec<Row>, NormalizeError> {
        records
            .iter()
            .enumerate()
            .map(|(i, r)| self.normalize(r, i))
            .collect()
    }
}

/// Walk a dotted path (`productId.title`) through nested objects.
/// Null at any step counts as absent.
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn timestamp_millis(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => parse_timestamp_millis(s),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

fn convert(value: &Value, kind: FieldKind) -> FieldValue {
    match kind {
        FieldKind::Text => match value {
            Value::String(s) if !s.trim().is_empty() => FieldValue::Text(s.clone()),
            Value::Number(n) => FieldValue::Text(n.to_string()),
            Value::Bool(b) => FieldValue::Text(b.to_string()),
            _ => FieldValue::placeholder(),
        },
        FieldKind::Number => match value {
            Value::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or_else(FieldValue::placeholder),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(FieldValue::Number)
                .unwrap_or_else(|_| FieldValue::placeholder()),
            _ => FieldValue::placeholder(),
        },
        FieldKind::Date => match timestamp_millis(value) {
            Some(ts) => FieldValue::Date {
                display: format_display(ts),
                ts,
            },
            // Keep the raw text visible but sort it to the epoch
            None => match value.as_str() {
                Some(s) if !s.trim().is_empty() => FieldValue::Date {
                    display: s.to_string(),
                    ts: 0,
                },
                _ => FieldValue::placeholder(),
            },
        },
    }
}
