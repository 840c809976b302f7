//! Pull a JSON value out of free-form model output.
//!
//! Models wrap JSON in prose or code fences. The scan below walks each
//! candidate opening bracket in order, finds its balanced closing bracket
//! (ignoring brackets inside string literals), and returns the first slice
//! that parses. The raw text travels with any failure so callers can show it.

use crate::error::{Result, VibeError};
use serde_json::{Map, Value};

/// First JSON array embedded in `text`.
pub fn extract_json_array(text: &str) -> Result<Vec<Value>> {
    match extract(text, '[', ']')? {
        Value::Array(items) => Ok(items),
        _ => Err(shape_error("expected a JSON array", text)),
    }
}

/// First JSON object embedded in `text`.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>> {
    match extract(text, '{', '}')? {
        Value::Object(map) => Ok(map),
        _ => Err(shape_error("expected a JSON object", text)),
    }
}

fn shape_error(reason: impl Into<String>, raw: &str) -> VibeError {
    VibeError::ResponseShape {
        reason: reason.into(),
        raw: raw.to_string(),
    }
}

fn extract(text: &str, open: char, close: char) -> Result<Value> {
    let mut last_err = None;
    let mut saw_candidate = false;
    for (start, _) in text.match_indices(open) {
        let Some(end) = balanced_end(&text[start..], open, close) else {
            continue;
        };
        saw_candidate = true;
        match serde_json::from_str::<Value>(&text[start..start + end]) {
            Ok(v) => return Ok(v),
            Err(e) => last_err = Some(e),
        }
    }
    let reason = match (saw_candidate, last_err) {
        (true, Some(e)) => format!("invalid JSON: {e}"),
        _ => format!("no JSON {} found in response", kind(open)),
    };
    Err(shape_error(reason, text))
}

fn kind(open: char) -> &'static str {
    if open == '[' {
        "array"
    } else {
        "object"
    }
}

/// Byte length of the balanced `open ... close` prefix of `s`, if any.
fn balanced_end(s: &str, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            c if c == open => depth += 1,
            c if c == close => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}
