//! Normalization of raw model responses into a slide plan.
//!
//! Models like to wrap JSON in markdown fences or chat around it
//! ("Here is the JSON:"). We strip the fences, and if that still isn't
//! valid JSON we fall back to the outermost `{ ... }` span.

use crate::{Error, Result, SlidePlan, SlideRecord};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Greedy match from the first `{` to the last `}`, across lines.
static JSON_OBJECT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Same idea for a bare top-level list.
static JSON_ARRAY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\[.*\]").unwrap());

/// Extract the JSON payload from a model response.
///
/// Returns the input (minus fences) unchanged when no JSON-looking span
/// exists, so the caller's parse reports the real problem.
pub fn extract_json(text: &str) -> String {
    let mut cleaned = text.trim();

    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    } else if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    let cleaned = cleaned.trim();

    if serde_json::from_str::<Value>(cleaned).is_ok() {
        return cleaned.to_string();
    }

    let candidates: Vec<&str> = [&*JSON_OBJECT_REGEX, &*JSON_ARRAY_REGEX]
        .iter()
        .filter_map(|re| re.find(cleaned))
        .map(|m| m.as_str())
        .collect();

    candidates
        .iter()
        .find(|span| serde_json::from_str::<Value>(span).is_ok())
        .or_else(|| candidates.first())
        .map(|span| span.to_string())
        .unwrap_or_else(|| cleaned.to_string())
}

/// Parse a model response into a slide plan.
///
/// Accepts `{"slides": [...]}` or a bare list of slides.
pub fn parse_plan(text: &str) -> Result<SlidePlan> {
    let cleaned = extract_json(text);
    let value: Value = serde_json::from_str(&cleaned)?;

    let slides = match value {
        Value::Object(mut map) => match map.remove("slides") {
            Some(slides) => slides_from_value(slides)?,
            None => {
                return Err(Error::UnexpectedShape("missing 'slides' key".to_string()));
            }
        },
        list @ Value::Array(_) => slides_from_value(list)?,
        other => {
            return Err(Error::UnexpectedShape(format!(
                "expected an object or a list, got {}",
                json_kind(&other)
            )));
        }
    };

    Ok(SlidePlan::new(slides))
}

fn slides_from_value(value: Value) -> Result<Vec<SlideRecord>> {
    let Value::Array(items) = value else {
        return Err(Error::UnexpectedShape(format!(
            "'slides' should be a list, got {}",
            json_kind(&value)
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value(item)
                .map_err(|e| Error::UnexpectedShape(format!("slide {}: {}", idx + 1, e)))
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
