//! Backoffice Core - admin dashboard data pipelines
//!
//! This crate provides the non-presentational core of the Backoffice admin
//! dashboard: the list/table data pipeline shared by every list screen
//! (normalize, filter, sort, paginate), response-envelope parsing, form
//! validation, and the image crop pipeline used by upload forms.
//!
//! The UI, routing, and HTTP transport live in the JavaScript host; this
//! crate is consumed through the `backoffice-wasm` bindings.

pub mod crop;
pub mod decode;
pub mod encode;
pub mod form;
pub mod response;
pub mod table;

pub use crop::{stage, CropOptions, CropOutput, CropSession, StagedImage};
pub use form::{FormSpec, ImagePolicy, SubmitGuard, Toast, ToastKind};
pub use response::{error_message, parse_collection, CollectionPayload, ResponseError};
pub use table::{
    FieldKind, FieldSpec, LoadState, PageState, PaginationMode, Refresh, Row, SortDirection,
    SortState, TableSchema, TableView,
};
