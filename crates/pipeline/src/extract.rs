//! Input Extractor: pulls the `logs` string out of a triggering event.
//!
//! Hosts deliver the payload either as a JSON document encoded in a text
//! `body` (HTTP-style triggers) or as an already-structured `body` mapping
//! (direct invocation). Every malformed shape degrades to an empty
//! [`LogText`]; extraction never fails.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{InvocationEvent, LogText};

/// Extracts the log text from `event`.
///
/// | `body` | Result |
/// |--------|--------|
/// | absent | empty |
/// | text holding a JSON mapping | that mapping's `logs` |
/// | text that is not a JSON mapping | empty (logged) |
/// | mapping | its `logs` |
/// | anything else | empty (logged) |
///
/// A `logs` value that is absent yields an empty text; one that is present but
/// not a string is logged and also yields an empty text.
pub fn extract_logs(event: &InvocationEvent) -> LogText {
    let Some(body) = parse_body(event) else {
        return LogText::empty();
    };

    match body.get("logs") {
        None => LogText::empty(),
        Some(Value::String(logs)) => {
            debug!(chars = logs.chars().count(), "Parsed logs from event");
            LogText::new(logs.clone())
        }
        Some(other) => {
            warn!(kind = value_kind(other), "Ignoring non-text `logs` field");
            LogText::empty()
        }
    }
}

fn parse_body(event: &InvocationEvent) -> Option<Map<String, Value>> {
    match event.body() {
        None => Some(Map::new()),
        Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Some(map),
            Ok(other) => {
                warn!(
                    kind = value_kind(&other),
                    "Couldn't parse logs: body is not a JSON object"
                );
                None
            }
            Err(err) => {
                warn!(error = %err, "Couldn't parse logs: body is not valid JSON");
                None
            }
        },
        Some(Value::Object(map)) => Some(map.clone()),
        Some(other) => {
            warn!(
                kind = value_kind(other),
                "Couldn't parse logs: unsupported body type"
            );
            None
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
