//! Tolerant recovery of a JSON value from raw LLM output.
//!
//! Models rarely return clean JSON even when told to: they wrap it in prose
//! ("Sure! Here's your result: {...}"), markdown code fences, or truncate it
//! mid-value. Decoding is an ordered list of attempts; the first success wins:
//!
//! 1. strip all code fences, parse the remainder directly
//! 2. balanced scan from the first opening delimiter
//! 3. greedy span from the leftmost opener to the rightmost closer
//!
//! If all three fail the original text is handed back inside `DecodeError`
//! so callers can degrade (e.g. wrap the raw text in a fallback object).

use serde_json::Value;
use thiserror::Error;

/// No JSON value could be recovered from the text.
/// Carries the untouched input so callers can fall back to it.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct DecodeError {
    pub original: String,
    pub reason: String,
}

impl DecodeError {
    fn new(original: &str, reason: impl Into<String>) -> Self {
        Self {
            original: original.to_string(),
            reason: reason.into(),
        }
    }
}

/// Recovers a single JSON value from text expected to contain an object.
pub fn decode_object(text: &str) -> Result<Value, DecodeError> {
    recover(text, '{', '}', "object")
}

/// Recovers a single JSON value from text expected to contain an array.
pub fn decode_array(text: &str) -> Result<Value, DecodeError> {
    recover(text, '[', ']', "array")
}

fn recover(
    text: &str,
    open: char,
    close: char,
    expected: &'static str,
) -> Result<Value, DecodeError> {
    if text.trim().is_empty() {
        return Err(DecodeError::new(
            text,
            format!("input is empty; expected a JSON {expected}"),
        ));
    }

    let cleaned = strip_fences(text);

    // Tier 1: the fence-stripped text parses as-is.
    if let Ok(value) = serde_json::from_str::<Value>(&cleaned) {
        return Ok(value);
    }

    // Tier 2: balanced scan from the first opening delimiter.
    if let Some(span) = balanced_span(&cleaned, open, close) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            return Ok(value);
        }
    }

    // Tier 3: greedy leftmost-opener to rightmost-closer span.
    if let Some(span) = greedy_span(&cleaned, open, close) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            return Ok(value);
        }
    }

    Err(DecodeError::new(
        text,
        format!("no parseable JSON {expected} found in the text"),
    ))
}

/// Removes every ``` fence token (with an optional `json` tag, any case) and
/// the whitespace that follows it, then trims the result.
pub fn strip_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find("```") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];
        if rest
            .get(..4)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("json"))
        {
            rest = &rest[4..];
        }
        rest = rest.trim_start();
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// Substring from the first `open` to the delimiter where nesting depth
/// returns to zero, inclusive.
///
/// The depth counter tracks only the delimiter characters, not string-literal
/// context: a literal `{` or `}` inside a quoted value skews the count. The
/// greedy tier usually recovers those inputs.
fn balanced_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth: i64 = 0;
    for (i, c) in text[start..].char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(&text[start..start + i + close.len_utf8()]);
            }
        }
    }
    None
}

/// Substring from the leftmost `open` to the rightmost `close`, inclusive.
fn greedy_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end > start {
        Some(&text[start..end + close.len_utf8()])
    } else {
        None
    }
}
