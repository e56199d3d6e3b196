//! Insertion-ordered map backing mapping nodes.

use super::node::Node;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// OrderedMap is a string-keyed map that remembers the order in which
/// keys were first inserted.
///
/// Key order and the lookup table stay consistent by construction:
/// `insert` is the only mutator, and it either appends a new key or
/// replaces the value of an existing key in place.
#[derive(Debug, Clone, Default)]
pub struct OrderedMap {
    keys: Vec<String>,
    entries: HashMap<String, Node>,
}

impl OrderedMap {
    /// Creates a new empty map.
    pub fn new() -> Self {
        OrderedMap::default()
    }

    /// Creates a new empty map with the given initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMap {
            keys: Vec::with_capacity(capacity),
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Inserts a key and associated value into the map.
    /// A new key is appended after all existing keys; an existing key
    /// keeps its position and has its value replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) {
        let key = key.into();
        if !self.entries.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.entries.insert(key, value);
    }

    /// Gets the value associated with the given key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    /// Returns true if the map contains the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns an iterator over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.as_str())
    }

    /// Returns an iterator over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.keys
            .iter()
            .filter_map(move |k| self.entries.get(k).map(|v| (k.as_str(), v)))
    }

    /// Returns an iterator over the values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.iter().map(|(_, v)| v)
    }
}

/// Key order is presentation, not identity: two maps are equal when
/// they hold the same key/value pairs in any order.
impl PartialEq for OrderedMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| v == ov))
    }
}

impl FromIterator<(String, Node)> for OrderedMap {
    fn from_iter<T: IntoIterator<Item = (String, Node)>>(iter: T) -> Self {
        let mut map = OrderedMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for OrderedMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
