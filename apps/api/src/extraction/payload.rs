//! Recovering a JSON payload from free-form model text.
//!
//! Flow: isolate the outermost braces → strip code fences → parse.
//!
//! The brace heuristic is best-effort. A reply with two separate JSON
//! fragments, or with a `}` inside a string after the real payload, yields a
//! candidate that fails to parse or parses to something unexpected. Callers
//! rely on the fallback path to stay safe in those cases.

use serde_json::{Map, Value};

use super::ExtractionError;

const FENCE: &str = "```";
const FENCE_LANGUAGE_TAG: &str = "json";

/// Returns the slice from the first `{` to the last `}` inclusive, or the whole
/// reply when either brace is missing or they are out of order.
pub fn isolate_json_candidate(raw: &str) -> &str {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(first), Some(last)) if first <= last => &raw[first..=last],
        _ => raw,
    }
}

/// Removes every code-fence marker (optionally followed by a `json` tag) and
/// trims the result.
pub fn strip_code_fences(candidate: &str) -> String {
    let mut out = String::with_capacity(candidate.len());
    let mut rest = candidate;

    while let Some(pos) = rest.find(FENCE) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + FENCE.len()..];
        if let Some(after_tag) = rest.strip_prefix(FENCE_LANGUAGE_TAG) {
            rest = after_tag;
        }
    }
    out.push_str(rest);

    out.trim().to_string()
}

/// Isolates, cleans and parses a reply into a JSON value.
pub fn parse_json_candidate(raw: &str) -> Result<Value, ExtractionError> {
    let cleaned = strip_code_fences(isolate_json_candidate(raw));
    if cleaned.is_empty() {
        return Err(ExtractionError::NoPayload);
    }
    Ok(serde_json::from_str(&cleaned)?)
}

/// Like `parse_json_candidate`, but the payload must be a JSON object.
pub fn parse_json_object(raw: &str) -> Result<Map<String, Value>, ExtractionError> {
    match parse_json_candidate(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(ExtractionError::Schema(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
