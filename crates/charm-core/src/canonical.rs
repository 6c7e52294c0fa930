//! # Canonical Trees
//!
//! Action documents are parsed permissively: YAML mappings may be keyed by
//! numbers, booleans, or even nested collections. Everything downstream of
//! the loader works on a *canonical* tree instead, where every mapping is
//! keyed by strings and the whole tree is JSON-serializable.
//!
//! - [`DocumentNode`] is the permissive tree (`serde_yaml::Value`).
//! - [`CanonicalNode`] is the strict tree (`serde_json::Value`); string keys
//!   are guaranteed by `serde_json::Map`.
//! - [`cleanse`] is the only conversion path between the two.
//!
//! ## Cleansing Rules
//!
//! 1. `null`, `bool`, `string` pass through unchanged.
//! 2. Numbers convert as `i64`, then `u64`, then `f64`. Non-finite floats
//!    are rejected with [`CleanseError::NonFiniteFloat`].
//! 3. Sequences are cleansed element-wise, order preserved.
//! 4. Mappings must be keyed by strings. The first non-string key found by a
//!    depth-first walk fails the whole conversion with
//!    [`CleanseError::NonStringKey`]; keys are never coerced.
//! 5. Tags are transparent: the tagged inner value is cleansed.
//!
//! No partial tree is ever returned on failure.
//!
//! ## Rendering
//!
//! Diagnostics embed offending values as compact JSON with mapping keys in
//! lexicographic order. [`render_json`] produces that form through
//! `serde_jcs`, so the output does not depend on the `serde_json` map
//! backing chosen by feature unification.

use serde_json::{Map, Number};

use crate::error::CleanseError;

/// A permissively-parsed document tree. Mapping keys may be of any type.
pub type DocumentNode = serde_yaml::Value;

/// A canonical tree. Every mapping is keyed by strings.
pub type CanonicalNode = serde_json::Value;

/// Convert a document tree into its canonical form.
///
/// # Errors
///
/// Returns [`CleanseError::NonStringKey`] when any mapping, at any depth,
/// carries a non-string key, and [`CleanseError::NonFiniteFloat`] for a
/// NaN or infinite number.
pub fn cleanse(node: &DocumentNode) -> Result<CanonicalNode, CleanseError> {
    match node {
        DocumentNode::Null => Ok(CanonicalNode::Null),
        DocumentNode::Bool(b) => Ok(CanonicalNode::Bool(*b)),
        DocumentNode::Number(n) => cleanse_number(n).map(CanonicalNode::Number),
        DocumentNode::String(s) => Ok(CanonicalNode::String(s.clone())),
        DocumentNode::Sequence(seq) => {
            let items: Result<Vec<_>, _> = seq.iter().map(cleanse).collect();
            Ok(CanonicalNode::Array(items?))
        }
        DocumentNode::Mapping(mapping) => {
            let mut out = Map::new();
            for (key, value) in mapping {
                let DocumentNode::String(key) = key else {
                    return Err(CleanseError::NonStringKey);
                };
                out.insert(key.clone(), cleanse(value)?);
            }
            Ok(CanonicalNode::Object(out))
        }
        DocumentNode::Tagged(tagged) => cleanse(&tagged.value),
    }
}

fn cleanse_number(n: &serde_yaml::Number) -> Result<Number, CleanseError> {
    if let Some(i) = n.as_i64() {
        Ok(Number::from(i))
    } else if let Some(u) = n.as_u64() {
        Ok(Number::from(u))
    } else {
        // serde_yaml numbers are always representable as f64.
        let f = n.as_f64().unwrap_or(f64::NAN);
        Number::from_f64(f).ok_or(CleanseError::NonFiniteFloat(f))
    }
}

/// Render a canonical value as compact JSON with sorted mapping keys.
///
/// Used for the `given <json>` clause of validation diagnostics.
pub fn render_json(value: &CanonicalNode) -> String {
    serde_jcs::to_string(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn yaml(src: &str) -> DocumentNode {
        serde_yaml::from_str(src).unwrap()
    }

    #[test]
    fn test_cleanse_string_keyed_tree_unchanged() {
        let node = yaml("key1: value1\nkey2: value2\nkey3:\n  foo1: val1\n  foo2: val2\n");
        let cleansed = cleanse(&node).unwrap();
        assert_eq!(
            cleansed,
            json!({"key1": "value1", "key2": "value2", "key3": {"foo1": "val1", "foo2": "val2"}})
        );
    }

    #[test]
    fn test_cleanse_nested_mappings() {
        let node = yaml("key1a: val1a\nkey3a:\n  key1b: val1b\n  key2b:\n    key1c: val1c\n");
        let cleansed = cleanse(&node).unwrap();
        assert_eq!(
            cleansed,
            json!({"key1a": "val1a", "key3a": {"key1b": "val1b", "key2b": {"key1c": "val1c"}}})
        );
    }

    #[test]
    fn test_cleanse_mapping_inside_sequence() {
        let node = yaml("key1a: val1a\nkey2a: [5, foo, {key1b: val1b, key2b: {key1c: val1c}}]\n");
        let cleansed = cleanse(&node).unwrap();
        assert_eq!(
            cleansed,
            json!({
                "key1a": "val1a",
                "key2a": [5, "foo", {"key1b": "val1b", "key2b": {"key1c": "val1c"}}]
            })
        );
    }

    #[test]
    fn test_cleanse_rejects_integer_key() {
        let node = yaml("key1: value1\nkey3:\n  foo1: val1\n  5: val2\n");
        let err = cleanse(&node).unwrap_err();
        assert_eq!(err, CleanseError::NonStringKey);
        assert_eq!(err.to_string(), "map keyed with non-string value");
    }

    #[test]
    fn test_cleanse_rejects_deep_integer_key_inside_sequence() {
        let node = yaml(
            "key1a: val1b\nkey3a:\n  - foo1\n  - 5\n  - key1b: val1b\n    key2b:\n      key1c: val1c\n      5: val2c\n",
        );
        let err = cleanse(&node).unwrap_err();
        assert_eq!(err.to_string(), "map keyed with non-string value");
    }

    #[test]
    fn test_cleanse_rejects_bool_and_null_keys() {
        assert!(cleanse(&yaml("true: x\n")).is_err());
        assert!(cleanse(&yaml("~: x\n")).is_err());
    }

    #[test]
    fn test_cleanse_scalars() {
        assert_eq!(cleanse(&yaml("~")).unwrap(), json!(null));
        assert_eq!(cleanse(&yaml("true")).unwrap(), json!(true));
        assert_eq!(cleanse(&yaml("-42")).unwrap(), json!(-42));
        assert_eq!(cleanse(&yaml("18446744073709551615")).unwrap(), json!(u64::MAX));
        assert_eq!(cleanse(&yaml("1.5")).unwrap(), json!(1.5));
        assert_eq!(cleanse(&yaml("\"5\"")).unwrap(), json!("5"));
    }

    #[test]
    fn test_cleanse_rejects_non_finite_float() {
        let err = cleanse(&yaml(".nan")).unwrap_err();
        assert!(matches!(err, CleanseError::NonFiniteFloat(f) if f.is_nan()));
        assert!(cleanse(&yaml("limit: .inf")).is_err());
    }

    #[test]
    fn test_cleanse_strips_tags() {
        let cleansed = cleanse(&yaml("outfile: !path out.bz2\n")).unwrap();
        assert_eq!(cleansed, json!({"outfile": "out.bz2"}));
    }

    #[test]
    fn test_render_json_sorts_keys() {
        let value = json!({"outfile": "foo.bz", "bar": "foo"});
        assert_eq!(render_json(&value), r#"{"bar":"foo","outfile":"foo.bz"}"#);
    }

    #[test]
    fn test_render_json_scalars() {
        assert_eq!(render_json(&json!(5)), "5");
        assert_eq!(render_json(&json!("two")), r#""two""#);
        assert_eq!(render_json(&json!(null)), "null");
        assert_eq!(render_json(&json!([1, {"b": 1, "a": 2}])), r#"[1,{"a":2,"b":1}]"#);
    }
}
