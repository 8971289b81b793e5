//! Per-field defaulting over a parsed JSON object.
//!
//! A field is taken only when present with the expected shape; anything else
//! collapses to the declared default. These helpers never fail.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A JSON number, or `default`.
pub fn number_or(obj: &Map<String, Value>, key: &str, default: f64) -> f64 {
    obj.get(key)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .unwrap_or(default)
}

/// The string items of a JSON array, unchanged. Non-string items are dropped;
/// a missing or non-array field is empty.
pub fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// The items of a JSON array that deserialize as `T`; the rest are dropped.
pub fn list_of<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Vec<T> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// A string parsed as an enumerated label, or the enum's default.
pub fn label_or_default<T: FromStr + Default>(obj: &Map<String, Value>, key: &str) -> T {
    obj.get(key)
        .and_then(Value::as_str)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[derive(Debug, Default, PartialEq)]
    enum Size {
        Small,
        #[default]
        Medium,
    }

    impl FromStr for Size {
        type Err = ();
        fn from_str(s: &str) -> Result<Self, ()> {
            match s {
                "Small" => Ok(Size::Small),
                "Medium" => Ok(Size::Medium),
                _ => Err(()),
            }
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Point {
        x: i32,
    }

    #[test]
    fn test_number_or_accepts_integers_and_floats() {
        let obj = object(json!({"a": 3, "b": 2.5, "c": "7"}));
        assert_eq!(number_or(&obj, "a", 0.0), 3.0);
        assert_eq!(number_or(&obj, "b", 0.0), 2.5);
        assert_eq!(number_or(&obj, "c", 0.0), 0.0);
        assert_eq!(number_or(&obj, "missing", 1.0), 1.0);
    }

    #[test]
    fn test_string_list_drops_non_strings() {
        let obj = object(json!({"skills": ["Rust", 3, null, " SQL ", ""], "bad": "Rust"}));
        assert_eq!(string_list(&obj, "skills"), vec!["Rust", " SQL ", ""]);
        assert!(string_list(&obj, "bad").is_empty());
        assert!(string_list(&obj, "missing").is_empty());
    }

    #[test]
    fn test_list_of_keeps_well_formed_items() {
        let obj = object(json!({"points": [{"x": 1}, {"y": 2}, "z", {"x": 3}]}));
        assert_eq!(list_of::<Point>(&obj, "points"), vec![Point { x: 1 }, Point { x: 3 }]);
    }

    #[test]
    fn test_label_or_default() {
        let obj = object(json!({"a": "Small", "b": "Huge", "c": 1}));
        assert_eq!(label_or_default::<Size>(&obj, "a"), Size::Small);
        assert_eq!(label_or_default::<Size>(&obj, "b"), Size::Medium);
        assert_eq!(label_or_default::<Size>(&obj, "c"), Size::Medium);
    }
}
