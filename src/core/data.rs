//! Component data trees.
//!
//! Component input is an untyped, insertion-ordered nested structure. It is
//! represented with [`serde_json::Value`] (built with `preserve_order`), so the
//! same tree can be read from YAML or JSON specifications and iterated in the
//! order the user wrote it.

use serde_json::{Map, Value};

use crate::constants::{ROOT_TYPE_KEY, TYPE_KEY};

/// The data of a single component: property name to value, in insertion order.
pub type ComponentData = Map<String, Value>;

/// Whether a value counts as "not populated".
///
/// `null`, the empty string and empty collections are empty. `false` and `0`
/// are values like any other; callers that treat booleans specially do so
/// with [`is_set`].
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Whether `data` holds a non-empty value for `key`.
pub fn is_populated(data: &ComponentData, key: &str) -> bool {
    data.get(key).is_some_and(|value| !is_empty_value(value))
}

/// Whether `key` was set at all, even to a falsey value.
pub fn is_set(data: &ComponentData, key: &str) -> bool {
    data.get(key).is_some_and(|value| !value.is_null())
}

/// Truthiness of a value, used for boolean-shaped bindings.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty() && s != "0" && s != "false",
        other => !is_empty_value(other),
    }
}

/// The component type a data subtree declares, if any.
pub fn declared_type(data: &ComponentData) -> Option<&str> {
    data.get(TYPE_KEY)
        .or_else(|| data.get(ROOT_TYPE_KEY))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
}

/// Human readable JSON kind, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}

/// String form of a scalar value; `None` for collections and null.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a string property, treating missing and non-string values as absent.
pub fn get_str<'a>(data: &'a ComponentData, key: &str) -> Option<&'a str> {
    data.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Read a list property as strings, skipping non-scalar items.
pub fn get_string_list(data: &ComponentData, key: &str) -> Vec<String> {
    match data.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(value) => scalar_to_string(value).into_iter().collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> ComponentData {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_empty_values() {
        assert!(is_empty_value(&json!(null)));
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!([])));
        assert!(is_empty_value(&json!({})));
        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!(0)));
    }

    #[test]
    fn test_set_versus_populated() {
        let d = data(json!({"flag": false, "name": "", "gone": null}));
        assert!(is_set(&d, "flag"));
        assert!(is_populated(&d, "flag"));
        assert!(is_set(&d, "name"));
        assert!(!is_populated(&d, "name"));
        assert!(!is_set(&d, "gone"));
        assert!(!is_set(&d, "missing"));
    }

    #[test]
    fn test_declared_type_prefers_component_type() {
        let d = data(json!({"base": "Module", "component_type": "TestModule"}));
        assert_eq!(declared_type(&d), Some("TestModule"));
        let d = data(json!({"base": "Module"}));
        assert_eq!(declared_type(&d), Some("Module"));
        let d = data(json!({"component_type": ""}));
        assert_eq!(declared_type(&d), None);
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!("0")));
        assert!(is_truthy(&json!(1)));
        assert!(!is_truthy(&json!([])));
    }

    #[test]
    fn test_string_list() {
        let d = data(json!({"deps": ["node", 7, {"x": 1}], "single": "views"}));
        assert_eq!(get_string_list(&d, "deps"), vec!["node", "7"]);
        assert_eq!(get_string_list(&d, "single"), vec!["views"]);
        assert!(get_string_list(&d, "missing").is_empty());
    }
}
