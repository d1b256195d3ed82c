//! Canonical JSON for list, map and composite columns: keys sorted, no
//! insignificant whitespace, nulls and empty composites elided.

use k8s_openapi::serde_json::{self, Map, Number, Value};
use serde::Serialize;

/// Largest magnitude at which every integral `f64` is exact.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

pub fn to_canonical_string<T: Serialize + ?Sized>(
    value: &T,
) -> Result<Option<String>, serde_json::Error> {
    let value = canonicalize(serde_json::to_value(value)?);
    if is_empty(&value) {
        return Ok(None);
    }
    serde_json::to_string(&value).map(Some)
}

/// String form of a scalar API value, as used by union variant columns.
/// Booleans render as `0`/`1`; composites fall back to canonical JSON.
pub fn render_value(value: &Value) -> Result<Option<String>, serde_json::Error> {
    Ok(match value {
        Value::Null => None,
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        Value::Number(n) => Some(canonical_number(n).to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => return to_canonical_string(value),
    })
}

pub fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .filter(|(_, v)| !is_empty(v))
                .collect();
            // Sorted explicitly so the order holds even if `preserve_order`
            // is switched on somewhere in the dependency graph.
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        Value::Number(n) => Value::Number(canonical_number(&n)),
        other => other,
    }
}

fn canonical_number(n: &Number) -> Number {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_EXACT_FLOAT => {
            Number::from(f as i64)
        }
        _ => n.clone(),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::serde_json::json;

    #[test]
    fn test_keys_sorted_nulls_elided() {
        let value = json!({
            "operator": "Exists",
            "effect": "NoSchedule",
            "key": null,
            "nested": {"b": 1, "a": {}, "c": []},
        });
        assert_eq!(
            to_canonical_string(&value).unwrap().as_deref(),
            Some(r#"{"effect":"NoSchedule","nested":{"b":1},"operator":"Exists"}"#)
        );
    }

    #[test]
    fn test_array_order_preserved() {
        let value = json!([{"name": "z"}, {"name": "a", "value": null}]);
        assert_eq!(
            to_canonical_string(&value).unwrap().as_deref(),
            Some(r#"[{"name":"z"},{"name":"a"}]"#)
        );
    }

    #[test]
    fn test_integral_floats_lose_decimal_point() {
        assert_eq!(to_canonical_string(&json!({"n": 3.0})).unwrap().as_deref(), Some(r#"{"n":3}"#));
        assert_eq!(to_canonical_string(&json!({"n": 2.5})).unwrap().as_deref(), Some(r#"{"n":2.5}"#));
    }

    #[test]
    fn test_empty_composite_is_none() {
        assert_eq!(to_canonical_string(&json!({"a": null, "b": {}})).unwrap(), None);
    }

    #[test]
    fn test_canonical_is_idempotent() {
        let first = to_canonical_string(&json!({"z": [1, {"y": true, "x": "s"}], "a": 1}))
            .unwrap()
            .unwrap();
        let reparsed: Value = serde_json::from_str(&first).unwrap();
        assert_eq!(to_canonical_string(&reparsed).unwrap().unwrap(), first);
    }

    #[test]
    fn test_render_value_scalars() {
        assert_eq!(render_value(&json!(true)).unwrap().as_deref(), Some("1"));
        assert_eq!(render_value(&json!(0)).unwrap().as_deref(), Some("0"));
        assert_eq!(render_value(&json!("")).unwrap(), None);
        assert_eq!(render_value(&Value::Null).unwrap(), None);
        assert_eq!(render_value(&json!({"name": "s"})).unwrap().as_deref(), Some(r#"{"name":"s"}"#));
    }
}
