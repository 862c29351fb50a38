//! The list/table data pipeline shared by every list screen.
//!
//! Around twenty dashboard screens (contact messages, inquiries, email
//! subscriptions, bookings, orders, ...) render the same shape: fetch a
//! collection, normalize the records, free-text filter, single-key sort,
//! paginate. This module implements that pipeline once, parameterized by
//! a per-endpoint [`TableSchema`].
//!
//! # Pipeline order
//!
//! Filter, then sort, then paginate - always, deterministically. Each
//! stage is a pure function over `Vec<Row>`; [`view::TableView`] owns the
//! state and applies them.

mod datetime;
mod filter;
mod paginate;
mod row;
mod schema;
mod sort;
mod view;

pub use datetime::{format_display, parse_timestamp_millis, same_utc_day};
pub use filter::filter_rows;
pub use paginate::{PageState, PaginationMode};
pub use row::{count_new_today, FieldValue, Row, PLACEHOLDER};
pub use schema::{FieldKind, FieldSpec, NormalizeError, TableSchema};
pub use sort::{sort_rows, SortDirection, SortState};
pub use view::{FetchQuery, LoadState, Refresh, TableView};
