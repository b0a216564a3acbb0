//! Response payload checks
//!
//! Payloads are decoded into a string-keyed JSON map and inspected one key
//! at a time. Nothing here keeps a payload beyond the check that reads it.

use serde_json::{Map, Value};

use crate::error::{ContractError, ContractResult};

/// A decoded JSON object
pub type Payload = Map<String, Value>;

/// Accepted names of the chat reply text, in priority order
pub const REPLY_KEYS: [&str; 2] = ["respuesta", "reply"];

/// Decode a response body that must be a JSON object
pub fn decode(body: &str) -> ContractResult<Payload> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ContractError::MalformedPayload(snippet(body))),
    }
}

/// Require `payload[field] == expected`
pub fn expect_field(payload: &Payload, field: &str, expected: &Value) -> ContractResult<()> {
    let actual = payload
        .get(field)
        .ok_or_else(|| ContractError::MissingField(field.to_string()))?;

    if actual == expected {
        Ok(())
    } else {
        Err(ContractError::FieldMismatch {
            field: field.to_string(),
            expected: expected.clone(),
            actual: actual.clone(),
        })
    }
}

/// Require `payload[field]` to be a string that is not blank after trimming
pub fn non_blank_str<'a>(payload: &'a Payload, field: &str) -> ContractResult<&'a str> {
    let value = payload
        .get(field)
        .ok_or_else(|| ContractError::MissingField(field.to_string()))?;

    match value.as_str() {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ContractError::BlankField {
            field: field.to_string(),
            actual: value.clone(),
        }),
    }
}

/// Text under the first key in `keys` holding a present, non-empty value
///
/// Selection stops at the first such key even when its value turns out
/// not to be usable text: `{"respuesta": "  ", "reply": "hi"}` fails.
pub fn first_present<'a>(
    payload: &'a Payload,
    keys: &[&'static str],
) -> ContractResult<(&'static str, &'a str)> {
    let (key, value) = keys
        .iter()
        .find_map(|&key| payload.get(key).filter(|value| is_present(value)).map(|value| (key, value)))
        .ok_or_else(|| ContractError::NoReplyText {
            candidates: keys.to_vec(),
        })?;

    match value.as_str() {
        Some(text) if !text.trim().is_empty() => Ok((key, text)),
        _ => Err(ContractError::BlankField {
            field: key.to_string(),
            actual: value.clone(),
        }),
    }
}

/// `null`, `false`, zero and empty strings or containers count as absent
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n.abs() > 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

pub(crate) fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}
