//! Answer sets collected by prompt flows

use serde_json::Value;
use std::collections::BTreeMap;

/// Mapping from question id to its (normalized) answer
pub type AnswerSet = BTreeMap<String, Value>;

/// Merge `other` into a copy of `base`; keys in `other` win
pub fn merge(base: &AnswerSet, other: &AnswerSet) -> AnswerSet {
    let mut all = base.clone();
    all.extend(other.iter().map(|(k, v)| (k.clone(), v.clone())));
    all
}

/// Truthy coercion used for conditions and confirm defaults
///
/// Strings are truthy only when they read `true` or `yes` (case-insensitive,
/// trimmed). Numbers are truthy when nonzero, null is false. Arrays and
/// objects fall back to `default`.
pub fn truthy(value: &Value, default: bool) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => {
            let s = s.trim().to_lowercase();
            s == "true" || s == "yes"
        }
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Null => false,
        _ => default,
    }
}

/// Lenient float conversion used by the `parse_float` template helper
pub fn to_f64(value: &Value, default: f64) -> f64 {
    match value {
        Value::String(s) => s.trim().parse().unwrap_or(default),
        Value::Number(n) => n.as_f64().unwrap_or(default),
        Value::Null => 0.0,
        _ => default,
    }
}
