//! List screen WASM bindings.
//!
//! This module exposes the core table pipeline to JavaScript as a single
//! stateful `JsTableView` per list screen. The host owns the HTTP
//! transport: it calls `begin_fetch` before issuing a request, then hands
//! the parsed JSON body back through `apply_success`/`apply_failure`
//! together with the token it got. Responses that arrive for a superseded
//! token are dropped.
//!
//! # Example
//!
//! ```typescript
//! import { JsTableView } from '@backoffice/wasm';
//!
//! const view = new JsTableView(contactSchema, false, 10);
//!
//! async function load() {
//!   const token = view.begin_fetch();
//!   try {
//!     view.apply_success(token, await api.getContacts(view.query()));
//!   } catch (err) {
//!     view.apply_failure(token, err.body ?? {});
//!   }
//!   render(view.visible_rows());
//! }
//!
//! searchInput.oninput = (e) => {
//!   if (view.set_filter(e.target.value)) load();
//!   else render(view.visible_rows());
//! };
//! ```

use backoffice_core::table::{PaginationMode, TableSchema, TableView};
use backoffice_core::Refresh;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::to_js;

/// Convert a JS value to a `serde_json::Value` for the core pipeline.
fn to_json(value: JsValue) -> Result<Value, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid response body: {}", e)))
}

/// State for one list screen, held across renders.
///
/// Fetch tokens cross the boundary as `number`; they are issued
/// sequentially so f64 precision is never a concern in practice.
#[wasm_bindgen]
pub struct JsTableView {
    inner: TableView,
}

#[wasm_bindgen]
impl JsTableView {
    /// Create a view for a list screen.
    ///
    /// # Arguments
    /// * `schema` - The table schema as a plain object:
    ///   `{ id_path, created_path, fields: [{ name, path, kind, searchable }] }`
    /// * `server_paginated` - true when the endpoint pages server-side
    /// * `limit` - rows per page
    ///
    /// # Errors
    /// Returns an error if the schema cannot be deserialized.
    #[wasm_bindgen(constructor)]
    pub fn new(schema: JsValue, server_paginated: bool, limit: usize) -> Result<JsTableView, JsValue> {
        let schema: TableSchema = serde_wasm_bindgen::from_value(schema)
            .map_err(|e| JsValue::from_str(&format!("Invalid table schema: {}", e)))?;
        let mode = if server_paginated {
            PaginationMode::Server
        } else {
            PaginationMode::Client
        };
        Ok(JsTableView {
            inner: TableView::new(schema, mode, limit),
        })
    }

    /// Enter the loading state and get the token for the upcoming fetch.
    pub fn begin_fetch(&mut self) -> f64 {
        self.inner.begin_fetch() as f64
    }

    /// Apply a fetch response body. Ignored when `token` is stale.
    pub fn apply_success(&mut self, token: f64, body: JsValue) -> Result<(), JsValue> {
        let body = to_json(body)?;
        self.inner.apply_success(token as u64, &body);
        Ok(())
    }

    /// Apply a fetch failure body (may be `{}`). Ignored when `token` is
    /// stale.
    pub fn apply_failure(&mut self, token: f64, err_body: JsValue) -> Result<(), JsValue> {
        let err_body = to_json(err_body)?;
        self.inner.apply_failure(token as u64, &err_body);
        Ok(())
    }

    /// Update the search term. Returns true when the host must refetch
    /// (server-side pagination); client mode refilters in place.
    pub fn set_filter(&mut self, term: &str) -> bool {
        self.inner.set_filter(term) == Refresh::Fetch
    }

    /// Header click: set or toggle the sort on `key`. Unknown keys are
    /// ignored. Never requires a refetch.
    pub fn toggle_sort(&mut self, key: &str) {
        self.inner.toggle_sort(key);
    }

    /// Jump to `page` (clamped). Returns true when the host must refetch.
    pub fn set_page(&mut self, page: usize) -> bool {
        self.inner.set_page(page) == Refresh::Fetch
    }

    /// Change the page size (resets to page 1). Returns true when the host
    /// must refetch.
    pub fn set_limit(&mut self, limit: usize) -> bool {
        self.inner.set_limit(limit) == Refresh::Fetch
    }

    /// Explicit refresh (e.g. after a create/delete). Always returns true.
    pub fn reload(&mut self) -> bool {
        self.inner.reload() == Refresh::Fetch
    }

    /// Rows for the current render pass, as an array of
    /// `{ id, created_ts, fields }` objects. Empty while loading or failed.
    pub fn visible_rows(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.visible_rows())
    }

    /// Query parameters for a server-mode fetch:
    /// `{ page, limit, term }`.
    pub fn query(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.query())
    }

    /// Count of loaded rows created today (UTC), for the stats strip.
    pub fn new_today(&self, now_millis: f64) -> usize {
        self.inner.new_today(now_millis as i64)
    }

    #[wasm_bindgen(getter)]
    pub fn is_loading(&self) -> bool {
        matches!(self.inner.state(), backoffice_core::LoadState::Loading)
    }

    /// Error message when the last fetch failed, else undefined.
    #[wasm_bindgen(getter)]
    pub fn error(&self) -> Option<String> {
        self.inner.error().map(str::to_string)
    }

    #[wasm_bindgen(getter)]
    pub fn page(&self) -> usize {
        self.inner.page_state().page
    }

    #[wasm_bindgen(getter)]
    pub fn total_pages(&self) -> usize {
        self.inner.page_state().total_pages
    }

    #[wasm_bindgen(getter)]
    pub fn has_prev(&self) -> bool {
        self.inner.page_state().has_prev()
    }

    #[wasm_bindgen(getter)]
    pub fn has_next(&self) -> bool {
        self.inner.page_state().has_next()
    }

    /// Active sort as `{ key, direction }`, or undefined before the first
    /// header click.
    pub fn sort(&self) -> Result<JsValue, JsValue> {
        match self.inner.sort_state() {
            Some(state) => to_js(state),
            None => Ok(JsValue::UNDEFINED),
        }
    }
}
