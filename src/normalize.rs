//! Subject normalization.
//!
//! Every subject handed to the engine is converted to canonical comparable
//! text before scrubbing and comparison. Strings pass through verbatim;
//! anything else is serialized as pretty-printed JSON with recursively
//! sorted object keys, so the snapshot is stable regardless of the
//! subject's internal key order. The edges of the result are trimmed so a
//! plain string takes the same form through either path.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// The subject could not be serialized to canonical text. The engine
/// treats this as fatal: it signals a defect in the calling test, not a
/// snapshot mismatch.
#[derive(Debug, Error)]
#[error("could not serialize subject: {source}")]
pub struct NormalizeError {
    #[from]
    source: serde_json::Error,
}

/// Converts an arbitrary serializable subject into canonical text.
pub fn normalize<S: Serialize + ?Sized>(subject: &S) -> Result<String, NormalizeError> {
    let value = serde_json::to_value(subject)?;
    let text = match value {
        Value::String(text) => text,
        other => serde_json::to_string_pretty(&sort_keys(other))?,
    };
    Ok(pretty_print(trim_edges(&text)))
}

/// Trims surrounding whitespace and at most one pair of wrapping quotes,
/// so normalization never introduces irrelevant leading or trailing
/// characters into the comparison.
fn trim_edges(text: &str) -> &str {
    let trimmed = text.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim()
}

/// Re-emits text that happens to be a JSON object or array in the same
/// pretty, key-sorted form as structured subjects, so both snapshot
/// identically. Anything else is returned as is.
fn pretty_print(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => {
            serde_json::to_string_pretty(&sort_keys(value)).unwrap_or_else(|_| text.to_string())
        }
        _ => text.to_string(),
    }
}

// serde_json only sorts map keys with its default map type; sorting
// explicitly keeps snapshots stable under the preserve_order feature and
// reaches objects nested inside arrays.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map
                .into_iter()
                .map(|(key, value)| (key, sort_keys(value)))
                .collect();
            entries.sort_by(|left, right| left.0.cmp(&right.0));
            Value::Object(entries.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
