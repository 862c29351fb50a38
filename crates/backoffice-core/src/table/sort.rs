//! Single-key sorting with direction toggle.
//!
//! Exactly one sort key is active at a time. Clicking the active header
//! flips direction; clicking a new header activates it at the
//! field-appropriate default (descending for dates, ascending otherwise).
//! The sort itself is stable: numbers and dates compare numerically,
//! everything else case-insensitively as text, and the `"-"` placeholder
//! keeps the comparison total.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::row::Row;
use super::schema::FieldKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Default direction when a column first becomes the sort key.
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Date => SortDirection::Desc,
            FieldKind::Text | FieldKind::Number => SortDirection::Asc,
        }
    }
}

/// Active sort field + direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    /// Header-click semantics: toggle when the key is already active,
    /// otherwise activate it at its default direction.
    pub fn click(current: Option<&SortState>, key: &str, kind: FieldKind) -> SortState {
        match current {
            Some(state) if state.key == key => SortState {
                key: state.key.clone(),
                direction: state.direction.toggled(),
            },
            _ => SortState::new(key, SortDirection::default_for(kind)),
        }
    }
}

/// Stable sort by the active key.
pub fn sort_rows(mut rows: Vec<Row>, state: &SortState) -> Vec<Row> {
    rows.sort_by(|a, b| {
        let ord = compare_field(a, b, &state.key);
        match state.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    rows
}

fn compare_field(a: &Row, b: &Row, key: &str) -> Ordering {
    let (va, vb) = (a.field(key), b.field(key));
    let (na, nb) = (
        va.and_then(|v| v.numeric()),
        vb.and_then(|v| v.numeric()),
    );

    match (na, nb) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        // Numeric values sort above text/placeholder in ascending order
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => {
            let sa = va.map(|v| v.display()).unwrap_or_default().to_lowercase();
            let sb = vb.map(|v| v.display()).unwrap_or_default().to_lowercase();
            sa.cmp(&sb)
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
