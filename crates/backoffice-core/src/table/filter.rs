//! Free-text filtering for list screens.
//!
//! A row matches when any searchable field contains the lower-cased,
//! trimmed term as a substring, or when the digit-only projection of the
//! term appears in the digit-only projection of the row's dates (so a
//! phone number or a partial date like "2025" still finds rows across
//! display formats). No tokenization, no ranking; input order is kept.

use super::row::Row;

/// Apply the free-text filter. An empty or whitespace-only term is the
/// identity filter.
pub fn filter_rows(rows: Vec<Row>, searchable: &[String], term: &str) -> Vec<Row> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return rows;
    }

    let digit_needle: String = needle.chars().filter(|c| c.is_ascii_digit()).collect();

    rows.into_iter()
        .filter(|row| row_matches(row, searchable, &needle, &digit_needle))
        .collect()
}

fn row_matches(row: &Row, searchable: &[String], needle: &str, digit_needle: &str) -> bool {
    let text_hit = searchable
        .iter()
        .any(|name| row.display(name).to_lowercase().contains(needle));

    if text_hit {
        return true;
    }

    !digit_needle.is_empty() && row.date_digits().contains(digit_needle)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
