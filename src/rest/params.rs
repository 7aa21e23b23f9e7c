//! Request parameter flattening and normalization.
//!
//! Parameters are serialized once to a `serde_json::Value` and then used two
//! ways:
//!
//! - [`query_pairs`] flattens the top-level object into `key=value` pairs for
//!   the query string.
//! - [`normalized_json`] renders a canonical string for the cache key, so that
//!   logically identical parameter sets always produce the same key.
//!
//! ## Flattening rules
//!
//! | Value | Query string |
//! |-------|--------------|
//! | `null` (a `None` field) | omitted |
//! | array | elements joined with `,` |
//! | string | as-is, no quotes |
//! | number / bool | `to_string()` (`0` and negatives are kept) |
//! | nested object | compact JSON |

use serde_json::Value;

/// Flatten a serialized parameter object into query-string pairs.
///
/// Non-object values (e.g. `()` → `null`) produce no pairs.
pub fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = params else {
        return Vec::new();
    };
    map.iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::Array(items) => {
                let joined = items.iter().map(scalar_string).collect::<Vec<_>>().join(",");
                Some((key.clone(), joined))
            }
            other => Some((key.clone(), scalar_string(other))),
        })
        .collect()
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

/// Canonical JSON rendering used in cache keys.
///
/// Object keys are sorted lexicographically at every depth and `null`-valued
/// object fields are dropped; arrays keep their order. A top-level `null`
/// renders as the empty string.
///
/// The ordering does not depend on `serde_json`'s map implementation, so it
/// stays stable even if another crate in the tree enables `preserve_order`.
pub fn normalized_json(value: &Value) -> String {
    if value.is_null() {
        return String::new();
    }
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> =
                map.iter().filter(|(_, v)| !v.is_null()).collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, val)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(val, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
