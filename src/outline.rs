//! Type outline of arbitrary JSON, for eyeballing undocumented `result`
//! payloads.
//!
//! ```text
//! id: integer
//! name: string
//! tags: array[2]
//!   string
//! ```

use serde_json::Value;
use std::fmt::Write as _;

pub fn outline(value: &Value) -> String {
    let mut out = String::new();
    walk(value, "", &mut out);
    out
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn walk(value: &Value, prefix: &str, out: &mut String) {
    let nested = format!("{prefix}  ");
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                let _ = match v {
                    Value::Array(items) => writeln!(out, "{prefix}{key}: array[{}]", items.len()),
                    other => writeln!(out, "{prefix}{key}: {}", type_name(other)),
                };
                if v.is_object() || v.is_array() {
                    walk_children(v, &nested, out);
                }
            }
        }
        Value::Array(items) => {
            let _ = writeln!(out, "{prefix}array[{}]", items.len());
            walk_children(value, &nested, out);
        }
        scalar => {
            let _ = writeln!(out, "{prefix}{}", type_name(scalar));
        }
    }
}

// Arrays are summarized by their first element.
fn walk_children(value: &Value, prefix: &str, out: &mut String) {
    match value {
        Value::Array(items) => {
            if let Some(first) = items.first() {
                walk_scalar_or_nested(first, prefix, out);
            }
        }
        other => walk(other, prefix, out),
    }
}

fn walk_scalar_or_nested(value: &Value, prefix: &str, out: &mut String) {
    match value {
        Value::Array(_) | Value::Object(_) => walk(value, prefix, out),
        scalar => {
            let _ = writeln!(out, "{prefix}{}", type_name(scalar));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outline_object() {
        let out = outline(&json!({"id": 123, "name": "Alice", "tags": ["x", "y"]}));
        assert_eq!(out, "id: integer\nname: string\ntags: array[2]\n  string\n");
    }

    #[test]
    fn test_outline_nested_objects_in_array() {
        let out = outline(&json!([{"amount": 1.5, "meta": {"ok": true}}]));
        assert_eq!(
            out,
            "array[1]\n  amount: float\n  meta: object\n    ok: bool\n"
        );
    }

    #[test]
    fn test_outline_scalar_and_empty_array() {
        assert_eq!(outline(&Value::Null), "null\n");
        assert_eq!(outline(&json!({"rows": []})), "rows: array[0]\n");
    }
}
