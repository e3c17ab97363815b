//! Reading proxy responses
//!
//! The proxy forwards Chapa's envelope (`{"status", "message", "data"}`) on success
//! and its own `{"error"}` / FastAPI-style `{"detail"}` bodies on failure. Bodies
//! are not trusted to be JSON at all.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::runtime::HttpResponse;

/// Fields checked for a failure message, most specific first
const ERROR_FIELDS: [&str; 4] = ["error", "message", "detail", "status"];

/// Fields that still mean failure inside a success envelope
const SUCCESS_ERROR_FIELDS: [&str; 2] = ["error", "detail"];

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CheckoutData {
    pub checkout_url: Option<String>,
}

/// Most specific failure message in `response`, else its status line.
pub fn extract_error_message(response: &HttpResponse) -> String {
    message_from_body(&response.body).unwrap_or_else(|| response.status_line())
}

/// First non-empty of `error`, `message`, `detail`, `status` in a JSON object body
pub fn message_from_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    first_message(value.as_object()?, &ERROR_FIELDS)
}

/// Failure message for a 2xx body that lacks the expected `data`.
///
/// In a `"status": "success"` envelope `message` and `status` describe the
/// success itself, so only `error` and `detail` count.
pub(crate) fn message_from_incomplete_body(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    let succeeded = object
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|status| status.eq_ignore_ascii_case("success"));

    if succeeded {
        first_message(object, &SUCCESS_ERROR_FIELDS)
    } else {
        first_message(object, &ERROR_FIELDS)
    }
}

fn first_message(object: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .filter_map(|field| object.get(*field))
        .find_map(render)
}

fn render(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        // e.g. Chapa validation errors: {"message": {"amount": ["..."]}}
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}

/// Parse a success body into its `data` member
pub(crate) fn parse_data<T: for<'de> Deserialize<'de>>(body: &str) -> Option<T> {
    serde_json::from_str::<Envelope<T>>(body).ok()?.data
}
