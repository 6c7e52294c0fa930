//! # Path Navigation
//!
//! Descends a canonical tree along an ordered key path, e.g.
//! `["properties", "outfile", "type"]`. Every step must land on a
//! string-keyed mapping; any missing key or non-mapping intermediate means
//! the path does not resolve.

use crate::canonical::CanonicalNode;

/// Resolve `keys` against `node`.
///
/// An empty path resolves to `node` itself. Returns `None` when any key is
/// absent or when a step needs to descend into something other than a
/// mapping.
pub fn resolve<'a, K: AsRef<str>>(keys: &[K], node: &'a CanonicalNode) -> Option<&'a CanonicalNode> {
    keys.iter()
        .try_fold(node, |current, key| current.as_object()?.get(key.as_ref()))
}

/// Resolve `keys` and require the result to be a mapping.
pub fn resolve_object<'a, K: AsRef<str>>(
    keys: &[K],
    node: &'a CanonicalNode,
) -> Option<&'a serde_json::Map<String, CanonicalNode>> {
    resolve(keys, node)?.as_object()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_path_returns_node() {
        let node = json!({"key": "value"});
        assert_eq!(resolve::<&str>(&[], &node), Some(&node));
        assert_eq!(resolve::<&str>(&[], &json!(5)), Some(&json!(5)));
    }

    #[test]
    fn test_missing_key_not_found() {
        let node = json!({"key": {"key": "value"}});
        assert_eq!(resolve(&["key", "key2"], &node), None);
        assert_eq!(resolve(&["nope"], &node), None);
    }

    #[test]
    fn test_non_mapping_intermediate_not_found() {
        let node = json!({"key": ["a", "b", "c"]});
        assert_eq!(resolve(&["key", "key2"], &node), None);
        assert_eq!(resolve(&["key"], &json!("scalar")), None);
    }

    #[test]
    fn test_retrieves_leaf_value() {
        let node = json!({"key": {"key2": "value"}});
        assert_eq!(resolve(&["key", "key2"], &node), Some(&json!("value")));
    }

    #[test]
    fn test_retrieves_mapping_and_sequence() {
        let node = json!({"key": {"key": "value"}, "list": ["a", "b", "c"]});
        assert_eq!(resolve(&["key"], &node), Some(&json!({"key": "value"})));
        assert_eq!(resolve(&["list"], &node), Some(&json!(["a", "b", "c"])));
    }

    #[test]
    fn test_accepts_owned_keys() {
        let node = json!({"definitions": {"disk": {}}});
        let keys = vec!["definitions".to_string(), "disk".to_string()];
        assert_eq!(resolve(keys.as_slice(), &node), Some(&json!({})));
    }

    #[test]
    fn test_resolve_object() {
        let node = json!({"properties": {"outfile": {"type": "string"}}, "required": ["outfile"]});
        assert!(resolve_object(&["properties"], &node).is_some());
        assert!(resolve_object(&["required"], &node).is_none());
    }
}
