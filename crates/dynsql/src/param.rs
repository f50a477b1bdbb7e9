//! Ordered parameter storage for rendered statements.

use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tokio_postgres::types::ToSql;

/// Ordered map from parameter key to bound value.
///
/// Entries keep insertion order, which is also placeholder order: the shared
/// parameter sequence hands out keys in traversal order. Keys are unique within
/// one map; inserting or merging a duplicate key panics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterMap {
    entries: Vec<(String, Value)>,
}

impl ParameterMap {
    /// Create a new empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a bound value under `key`.
    ///
    /// # Panics
    /// Panics if `key` is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        assert!(
            !self.contains_key(&key),
            "parameter key collision: '{key}' is already bound"
        );
        self.entries.push((key, value));
    }

    /// Move all entries of `other` into this map.
    ///
    /// # Panics
    /// Panics if any key of `other` is already present.
    pub fn merge(&mut self, other: ParameterMap) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    /// Look up a bound value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Check if `key` is bound.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Get the number of bound values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate keys in placeholder order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate values in placeholder order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Iterate entries in placeholder order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get all values as references for tokio-postgres, in placeholder order.
    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.entries
            .iter()
            .map(|(_, v)| v as &(dyn ToSql + Sync))
            .collect()
    }
}

impl Serialize for ParameterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'a> IntoIterator for &'a ParameterMap {
    type Item = (&'a str, &'a Value);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a Value)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order() {
        let mut params = ParameterMap::new();
        params.insert("p2", Value::Int(2));
        params.insert("p1", Value::Int(1));
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["p2", "p1"]);
        assert_eq!(params.get("p1"), Some(&Value::Int(1)));
        assert_eq!(params.as_refs().len(), 2);
    }

    #[test]
    fn test_merge() {
        let mut a = ParameterMap::new();
        a.insert("p1", Value::Int(1));
        let mut b = ParameterMap::new();
        b.insert("p2", Value::from("x"));
        a.merge(b);
        assert_eq!(a.len(), 2);
        assert!(a.contains_key("p2"));
    }

    #[test]
    #[should_panic(expected = "parameter key collision")]
    fn test_merge_collision_panics() {
        let mut a = ParameterMap::new();
        a.insert("p1", Value::Int(1));
        let mut b = ParameterMap::new();
        b.insert("p1", Value::Int(9));
        a.merge(b);
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let mut params = ParameterMap::new();
        params.insert("p1", Value::Int(5));
        params.insert("p2", Value::from("x"));
        assert_eq!(serde_json::to_string(&params).unwrap(), r#"{"p1":5,"p2":"x"}"#);
    }
}
