//! Canonical string forms for JSON values.
//!
//! Property equality and multiset membership are both defined over
//! [`canonicalize`]: two values are equal iff their canonical strings are
//! identical. Neither array element order nor object key order affects the
//! canonical form.

use serde_json::Value;

/// Render a JSON value as a canonical string.
///
/// - Primitives and null use their JSON text form.
/// - Object keys are sorted lexicographically.
/// - Array elements are canonicalized and the resulting strings sorted
///   lexicographically, so reordered arrays canonicalize identically.
pub fn canonicalize(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => escape_string(s),
        Value::Array(items) => {
            let mut parts: Vec<String> = items.iter().map(canonicalize).collect();
            parts.sort();
            format!("[{}]", parts.join(","))
        }
        Value::Object(map) => {
            let mut pairs: Vec<(&String, &Value)> = map.iter().collect();
            pairs.sort_by_key(|(key, _)| *key);
            let parts: Vec<String> = pairs
                .iter()
                .map(|(key, value)| format!("{}:{}", escape_string(key), canonicalize(value)))
                .collect();
            format!("{{{}}}", parts.join(","))
        }
    }
}

/// Whether two JSON values are equal under canonical comparison.
///
/// Non-container values short-circuit on direct equality; values of
/// different primitive kinds are never equal even when their literal text
/// coincides (`1` vs `"1"`). Containers compare by canonical string.
pub fn canonically_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
            canonicalize(a) == canonicalize(b)
        }
        _ => a == b,
    }
}

/// JSON string escaping. The exact escape choices only need to be
/// deterministic and injective; they are never parsed back.
fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
