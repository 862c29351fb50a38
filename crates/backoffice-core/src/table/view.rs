//! Per-screen list state machine.
//!
//! A [`TableView`] owns everything one list screen needs: the normalized
//! rows, the free-text filter, the active sort, pagination, and the
//! load/error state. The pipeline is always applied in the same order
//! (filter, then sort, then paginate) so two renders of the same inputs
//! can never disagree.
//!
//! # Fetch discipline
//!
//! The caller performs the actual HTTP request; the view only says when
//! one is needed. Mutators return [`Refresh`]: purely client-side filter
//! and sort changes on fully loaded data never require a request, while
//! server-mode page/limit/filter changes do. Each `begin_fetch` hands out
//! an epoch token and responses carrying a stale token are dropped, so a
//! late out-of-order response can never clobber newer state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::filter::filter_rows;
use super::paginate::{PageState, PaginationMode};
use super::row::{count_new_today, Row};
use super::schema::TableSchema;
use super::sort::{sort_rows, SortState};
use crate::response::{error_message, parse_collection, CollectionPayload, GENERIC_ERROR};

/// Load/error state of a list screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    /// A fetch is in flight; no rows are rendered.
    Loading,
    Loaded,
    /// The fetch failed; `message` replaces the table body.
    Failed { message: String },
}

/// Whether a state change requires the caller to re-issue the fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Refresh {
    None,
    Fetch,
}

/// Query parameters the caller should attach to a server-mode fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchQuery {
    pub page: usize,
    pub limit: usize,
    pub term: String,
}

/// State for one list screen: rows, filter, sort, pagination, load state.
#[derive(Debug, Clone)]
pub struct TableView {
    schema: TableSchema,
    mode: PaginationMode,
    rows: Vec<Row>,
    term: String,
    sort: Option<SortState>,
    page: PageState,
    state: LoadState,
    epoch: u64,
}

impl TableView {
    /// A fresh view, already in `Loading` (screens fetch on mount).
    pub fn new(schema: TableSchema, mode: PaginationMode, limit: usize) -> Self {
        Self {
            schema,
            mode,
            rows: Vec::new(),
            term: String::new(),
            sort: None,
            page: PageState::new(limit),
            state: LoadState::Loading,
            epoch: 0,
        }
    }

    /// Start a fetch: bumps the epoch, enters `Loading`, returns the token
    /// the eventual response must present.
    pub fn begin_fetch(&mut self) -> u64 {
        self.epoch += 1;
        self.state = LoadState::Loading;
        self.epoch
    }

    /// Apply a successful response body. Stale tokens are dropped.
    pub fn apply_success(&mut self, token: u64, body: &Value) {
        if token != self.epoch {
            return;
        }

        let payload = match parse_collection(body) {
            Ok(p) => p,
            Err(err) => {
                self.fail(err.to_string());
                return;
            }
        };

        let rows = match self.schema.normalize_all(payload.items()) {
            Ok(rows) => rows,
            Err(err) => {
                self.fail(err.to_string());
                return;
            }
        };

        self.rows = rows;
        self.state = LoadState::Loaded;

        match (&payload, self.mode) {
            (CollectionPayload::Paged { page, pages, .. }, PaginationMode::Server) => {
                self.page.set_total_pages(*pages as usize);
                self.page.set_page(*page as usize);
            }
            // Flat payload (or a paged one on a client screen): slice locally
            _ => self.page.recalc(self.filtered_count()),
        }
    }

    /// Apply a failed request body (the thrown error, serialized).
    /// Stale tokens are dropped.
    pub fn apply_failure(&mut self, token: u64, err_body: &Value) {
        if token != self.epoch {
            return;
        }
        self.fail(error_message(err_body, GENERIC_ERROR));
    }

    fn fail(&mut self, message: String) {
        self.rows.clear();
        self.state = LoadState::Failed { message };
    }

    /// Update the search term; resets to page 1. Requires a fetch only in
    /// server mode, where the term is a query parameter.
    pub fn set_filter(&mut self, term: &str) -> Refresh {
        self.term = term.to_string();
        self.page.set_page(1);
        match self.mode {
            PaginationMode::Client => {
                self.page.recalc(self.filtered_count());
                Refresh::None
            }
            PaginationMode::Server => Refresh::Fetch,
        }
    }

    /// Header click: toggle the active key or activate a new one at its
    /// default direction. Unknown keys are ignored. Sorting is always
    /// client-side and never refetches.
    pub fn toggle_sort(&mut self, key: &str) {
        if let Some(kind) = self.schema.field_kind(key) {
            self.sort = Some(SortState::click(self.sort.as_ref(), key, kind));
        }
    }

    pub fn set_page(&mut self, page: usize) -> Refresh {
        self.page.set_page(page);
        match self.mode {
            PaginationMode::Client => Refresh::None,
            PaginationMode::Server => Refresh::Fetch,
        }
    }

    pub fn set_limit(&mut self, limit: usize) -> Refresh {
        self.page.set_limit(limit);
        match self.mode {
            PaginationMode::Client => {
                self.page.recalc(self.filtered_count());
                Refresh::None
            }
            PaginationMode::Server => Refresh::Fetch,
        }
    }

    /// Explicit reload, the only recovery path after a failure.
    pub fn reload(&mut self) -> Refresh {
        Refresh::Fetch
    }

    /// Rows to render: filter, then sort, then (client mode) the current
    /// page slice. Empty while loading or failed - stale rows are never
    /// shown alongside a spinner or an error.
    pub fn visible_rows(&self) -> Vec<Row> {
        if self.state != LoadState::Loaded {
            return Vec::new();
        }

        let filtered = filter_rows(
            self.rows.clone(),
            &self.schema.searchable_fields(),
            &self.term,
        );
        let sorted = match &self.sort {
            Some(state) => sort_rows(filtered, state),
            None => default_sort(filtered),
        };

        match self.mode {
            PaginationMode::Client => self.page.page_slice(&sorted).to_vec(),
            PaginationMode::Server => sorted,
        }
    }

    /// Count of rows created on the same UTC day as `now_millis`.
    pub fn new_today(&self, now_millis: i64) -> usize {
        count_new_today(&self.rows, now_millis)
    }

    /// Query parameters for the next server-mode fetch.
    pub fn query(&self) -> FetchQuery {
        FetchQuery {
            page: self.page.page,
            limit: self.page.limit,
            term: self.term.clone(),
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn page_state(&self) -> &PageState {
        &self.page
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    fn filtered_count(&self) -> usize {
        filter_rows(
            self.rows.clone(),
            &self.schema.searchable_fields(),
            &self.term,
        )
        .len()
    }
}

/// Default ordering before any header is clicked: newest first.
fn default_sort(mut rows: Vec<Row>) -> Vec<Row> {
    rows.sort_by(|a, b| b.created_ts.cmp(&a.created_ts));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::schema::{FieldKind, FieldSpec};
    use serde_json::json;

    fn schema() -> TableSchema {
        TableSchema::new("_id", "createdAt")
            .with_field(FieldSpec::new("name", "name", FieldKind::Text).searchable())
            .with_field(FieldSpec::new("createdAt", "createdAt", FieldKind::Date))
    }

    fn client_view() -> TableView {
        TableView::new(schema(), PaginationMode::Client, 10)
    }

    fn two_rows_body() -> Value {
        json!({
            "success": true,
            "data": [
                { "_id": "b", "name": "Bob", "createdAt": "2024-01-01T00:00:00Z" },
                { "_id": "a", "name": "Ann", "createdAt": "2024-02-01T00:00:00Z" }
            ]
        })
    }

    fn names(view: &TableView) -> Vec<String> {
        view.visible_rows().iter().map(|r| r.display("name")).collect()
    }

    #[test]
    fn test_scenario_default_sort_and_search() {
        let mut view = client_view();
        let token = view.begin_fetch();
        view.apply_success(token, &two_rows_body());

        // Default sort is creation date, newest first
        assert_eq!(names(&view), ["Ann", "Bob"]);

        let refresh = view.set_filter("an");
        assert_eq!(refresh, Refresh::None);
        assert_eq!(names(&view), ["Ann"]);
    }

    #[test]
    fn test_loading_hides_rows() {
        let mut view = client_view();
        let token = view.begin_fetch();
        view.apply_success(token, &two_rows_body());
        assert_eq!(view.visible_rows().len(), 2);

        let _token = view.begin_fetch();
        assert_eq!(view.state(), &LoadState::Loading);
        assert!(view.visible_rows().is_empty());
    }

    #[test]
    fn test_failure_sets_message_and_empties_rows() {
        let mut view = client_view();
        let token = view.begin_fetch();
        view.apply_failure(
            token,
            &json!({ "response": { "data": { "message": "Server down" } } }),
        );

        assert_eq!(view.error(), Some("Server down"));
        assert!(view.visible_rows().is_empty());
    }

    #[test]
    fn test_failure_without_message_uses_generic_text() {
        let mut view = client_view();
        let token = view.begin_fetch();
        view.apply_failure(token, &json!({}));
        assert_eq!(view.error(), Some(GENERIC_ERROR));
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut view = client_view();
        let first = view.begin_fetch();
        let second = view.begin_fetch();

        view.apply_success(second, &two_rows_body());
        assert_eq!(view.visible_rows().len(), 2);

        // The first request resolves late with a failure: ignored
        view.apply_failure(first, &json!({ "message": "timeout" }));
        assert_eq!(view.state(), &LoadState::Loaded);
        assert_eq!(view.visible_rows().len(), 2);
    }

    #[test]
    fn test_stale_success_cannot_clobber_newer_data() {
        let mut view = client_view();
        let first = view.begin_fetch();
        let second = view.begin_fetch();

        view.apply_success(second, &two_rows_body());
        view.apply_success(first, &json!({ "success": true, "data": [] }));
        assert_eq!(view.visible_rows().len(), 2);
    }

    #[test]
    fn test_client_filter_and_sort_never_refetch() {
        let mut view = client_view();
        let token = view.begin_fetch();
        view.apply_success(token, &two_rows_body());

        assert_eq!(view.set_filter("bo"), Refresh::None);
        view.toggle_sort("name");
        assert_eq!(view.set_page(1), Refresh::None);
    }

    #[test]
    fn test_server_mode_changes_require_fetch() {
        let mut view = TableView::new(schema(), PaginationMode::Server, 10);
        let token = view.begin_fetch();
        view.apply_success(
            token,
            &json!({
                "success": true,
                "data": { "items": [{ "_id": "a", "name": "Ann", "createdAt": "2024-02-01" }],
                           "total": 31, "page": 1, "pages": 4 }
            }),
        );

        assert_eq!(view.page_state().total_pages, 4);
        assert_eq!(view.set_page(2), Refresh::Fetch);
        assert_eq!(view.set_filter("ann"), Refresh::Fetch);
        assert_eq!(view.set_limit(25), Refresh::Fetch);
        assert_eq!(view.query().page, 1); // set_limit resets to page 1
        assert_eq!(view.query().term, "ann");
    }

    #[test]
    fn test_envelope_rejection_surfaces_backend_message() {
        let mut view = client_view();
        let token = view.begin_fetch();
        view.apply_success(token, &json!({ "success": false, "message": "Not authorized" }));
        assert_eq!(view.error(), Some("Not authorized"));
    }

    #[test]
    fn test_malformed_record_fails_loudly() {
        let mut view = client_view();
        let token = view.begin_fetch();
        view.apply_success(token, &json!({ "success": true, "data": ["nope"] }));
        assert_eq!(view.error(), Some("record at index 0 is not a JSON object"));
    }

    #[test]
    fn test_toggle_sort_flips_direction() {
        let mut view = client_view();
        let token = view.begin_fetch();
        view.apply_success(token, &two_rows_body());

        view.toggle_sort("name");
        assert_eq!(names(&view), ["Ann", "Bob"]);

        view.toggle_sort("name");
        assert_eq!(names(&view), ["Bob", "Ann"]);
    }

    #[test]
    fn test_toggle_sort_unknown_key_is_noop() {
        let mut view = client_view();
        view.toggle_sort("nope");
        assert!(view.sort_state().is_none());
    }

    #[test]
    fn test_client_pagination_slices_after_filter_and_sort() {
        let mut view = TableView::new(schema(), PaginationMode::Client, 2);
        let records: Vec<Value> = (0..5)
            .map(|i| json!({ "_id": i.to_string(), "name": format!("user{i}"),
                              "createdAt": format!("2024-01-0{}T00:00:00Z", i + 1) }))
            .collect();
        let token = view.begin_fetch();
        view.apply_success(token, &json!({ "success": true, "data": records }));

        assert_eq!(view.page_state().total_pages, 3);
        // Newest first: user4, user3 on page 1
        assert_eq!(names(&view), ["user4", "user3"]);

        let _ = view.set_page(3);
        assert_eq!(names(&view), ["user0"]);
    }

    #[test]
    fn test_filter_shrinks_page_count_and_clamps_page() {
        let mut view = TableView::new(schema(), PaginationMode::Client, 2);
        let records: Vec<Value> = (0..6)
            .map(|i| json!({ "_id": i.to_string(), "name": format!("user{i}"),
                              "createdAt": "2024-01-01" }))
            .collect();
        let token = view.begin_fetch();
        view.apply_success(token, &json!({ "success": true, "data": records }));
        let _ = view.set_page(3);

        let _ = view.set_filter("user1");
        assert_eq!(view.page_state().total_pages, 1);
        assert_eq!(view.page_state().page, 1);
        assert_eq!(names(&view), ["user1"]);
    }

    #[test]
    fn test_new_today() {
        let mut view = client_view();
        let token = view.begin_fetch();
        view.apply_success(token, &two_rows_body());

        // 2024-02-01 mid-day
        assert_eq!(view.new_today(1706783400000), 1);
        // 2023 date: nothing new
        assert_eq!(view.new_today(1672531200000), 0);
    }

    #[test]
    fn test_reload_requests_fetch() {
        let mut view = client_view();
        assert_eq!(view.reload(), Refresh::Fetch);
    }
}
