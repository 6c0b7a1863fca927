//! Canonical form for structured values.

use serde_json::{Map, Value};

/// Key under which a pattern object stores its expression.
const PATTERN_KEY: &str = "$regex";
/// Key under which a pattern object stores its flags.
const PATTERN_FLAGS_KEY: &str = "$options";

/// Returns a copy of `value` in canonical form.
///
/// Every mapping's keys are sorted lexicographically, recursively, including
/// mappings nested inside sequences. Sequences are never reordered; their
/// order is meaningful (aggregation stages, sort tuples). Pattern objects are
/// folded to a canonical string so two pattern literals with identical
/// expression and flags serialize identically. The input is never mutated.
#[must_use]
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            if let Some(pattern) = fold_pattern(map) {
                return Value::String(pattern);
            }

            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();

            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        scalar => scalar.clone(),
    }
}

/// Folds an object of the exact shape `{"$regex": p}` or
/// `{"$regex": p, "$options": f}` into the canonical string `/p/f`.
fn fold_pattern(map: &Map<String, Value>) -> Option<String> {
    let pattern = map.get(PATTERN_KEY)?.as_str()?;
    match map.len() {
        1 => Some(format!("/{}/", pattern)),
        2 => {
            let flags = map.get(PATTERN_FLAGS_KEY)?.as_str()?;
            Some(format!("/{}/{}", pattern, flags))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_are_sorted_recursively() {
        let value = json!({"b": {"d": 1, "c": 2}, "a": 3});
        let canonical = canonicalize(&value);
        assert_eq!(
            serde_json::to_string(&canonical).unwrap(),
            r#"{"a":3,"b":{"c":2,"d":1}}"#
        );
    }

    #[test]
    fn test_mappings_inside_sequences_are_sorted() {
        let value = json!([{"z": 1, "a": 2}, {"y": 3, "b": 4}]);
        let canonical = canonicalize(&value);
        assert_eq!(
            serde_json::to_string(&canonical).unwrap(),
            r#"[{"a":2,"z":1},{"b":4,"y":3}]"#
        );
    }

    #[test]
    fn test_sequences_are_not_reordered() {
        let value = json!([3, 1, 2]);
        assert_eq!(canonicalize(&value), json!([3, 1, 2]));
    }

    #[test]
    fn test_equivalent_orderings_canonicalize_identically() {
        let left = json!({"a": true, "b": false});
        let right = json!({"b": false, "a": true});
        assert_eq!(
            serde_json::to_vec(&canonicalize(&left)).unwrap(),
            serde_json::to_vec(&canonicalize(&right)).unwrap()
        );
    }

    #[test]
    fn test_pattern_objects_fold_to_strings() {
        let with_flags = json!({"$options": "i", "$regex": "^rec"});
        assert_eq!(canonicalize(&with_flags), json!("/^rec/i"));

        let bare = json!({"$regex": "^rec"});
        assert_eq!(canonicalize(&bare), json!("/^rec/"));
    }

    #[test]
    fn test_pattern_with_extra_operators_is_not_folded() {
        let value = json!({"$regex": "^rec", "$options": "i", "$ne": "x"});
        let canonical = canonicalize(&value);
        assert!(canonical.is_object());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let value = json!({"b": 1, "a": 2});
        let before = serde_json::to_string(&value).unwrap();
        let _ = canonicalize(&value);
        assert_eq!(serde_json::to_string(&value).unwrap(), before);
    }
}
