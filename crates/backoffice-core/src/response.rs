//! Backend response envelope parsing and error-message extraction.
//!
//! The REST backend wraps every payload as `{ success, data, message }`,
//! where a collection `data` is either a bare array or a paged object
//! `{ items, total, page, pages }`. Parsing declares the expected shape
//! and fails with a typed error on mismatch instead of falling through
//! nullish chains; the UI shows the error text as-is.

use serde_json::Value;
use thiserror::Error;

/// Fallback shown when the backend provides no usable message.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Errors raised when a response body does not match the envelope contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    #[error("response body is not a JSON object")]
    NotAnObject,

    #[error("response is missing the `success` flag")]
    MissingSuccess,

    /// The backend reported `success: false`; carries its message.
    #[error("{0}")]
    Rejected(String),

    #[error("response has no `data` collection")]
    MissingData,

    #[error("`data` is neither an array nor a paged object")]
    MalformedData,

    #[error("paged `data` is missing `{0}`")]
    MissingPagedField(&'static str),
}

/// A parsed collection payload.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionPayload {
    /// The whole collection at once (client-side pagination).
    Flat(Vec<Value>),
    /// One server-computed slice plus paging info.
    Paged {
        items: Vec<Value>,
        total: u64,
        page: u64,
        pages: u64,
    },
}

impl CollectionPayload {
    pub fn items(&self) -> &[Value] {
        match self {
            CollectionPayload::Flat(items) => items,
            CollectionPayload::Paged { items, .. } => items,
        }
    }
}

/// Parse a `{ success, data, message }` envelope holding a collection.
pub fn parse_collection(body: &Value) -> Result<CollectionPayload, ResponseError> {
    let obj = body.as_object().ok_or(ResponseError::NotAnObject)?;

    let success = obj
        .get("success")
        .and_then(Value::as_bool)
        .ok_or(ResponseError::MissingSuccess)?;
    if !success {
        let message = obj
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(GENERIC_ERROR);
        return Err(ResponseError::Rejected(message.to_string()));
    }

    let data = obj.get("data").ok_or(ResponseError::MissingData)?;
    match data {
        Value::Array(items) => Ok(CollectionPayload::Flat(items.clone())),
        Value::Object(paged) => {
            let items = paged
                .get("items")
                .and_then(Value::as_array)
                .ok_or(ResponseError::MissingPagedField("items"))?
                .clone();
            let total = paged
                .get("total")
                .and_then(Value::as_u64)
                .ok_or(ResponseError::MissingPagedField("total"))?;
            let page = paged
                .get("page")
                .and_then(Value::as_u64)
                .ok_or(ResponseError::MissingPagedField("page"))?;
            let pages = paged
                .get("pages")
                .and_then(Value::as_u64)
                .ok_or(ResponseError::MissingPagedField("pages"))?;
            Ok(CollectionPayload::Paged {
                items,
                total,
                page,
                pages,
            })
        }
        _ => Err(ResponseError::MalformedData),
    }
}

/// Extract the user-facing message from a failed request body.
///
/// HTTP client errors surface as `{ response: { data: { message } } }`;
/// plain errors as `{ message }`. Anything else falls back to `fallback`.
pub fn error_message(body: &Value, fallback: &str) -> String {
    if let Some(msg) = body
        .pointer("/response/data/message")
        .and_then(Value::as_str)
    {
        return msg.to_string();
    }
    if let Some(msg) = body.get("message").and_then(Value::as_str) {
        return msg.to_string();
    }
    fallback.to_string()
}
