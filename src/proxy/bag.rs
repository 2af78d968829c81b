//! Flat property bags a proxy can wrap.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// JSON object used by the `from_json` constructors.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// A flat mapping from property names to values.
///
/// `merge` shallow-copies every property of another bag into this one,
/// overwriting existing keys and never removing any.
pub trait PropertyBag: Send + Sync + 'static {
    type Key: Clone + Eq + Hash + Send + Sync + 'static;
    type Value: Clone + Send + Sync + 'static;

    /// Keys currently present.
    fn keys(&self) -> impl Iterator<Item = &Self::Key> + '_;

    /// Current value at `key`, if present.
    fn property(&self, key: &Self::Key) -> Option<&Self::Value>;

    /// Set `key` to `value`, replacing any previous value.
    fn assign(&mut self, key: Self::Key, value: Self::Value);

    /// Consume the bag into its properties.
    fn into_properties(self) -> impl Iterator<Item = (Self::Key, Self::Value)>;

    /// Copy every property of `other` into `self`.
    fn merge(&mut self, other: Self)
    where
        Self: Sized,
    {
        for (key, value) in other.into_properties() {
            self.assign(key, value);
        }
    }
}

impl<K, V, S> PropertyBag for HashMap<K, V, S>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    S: std::hash::BuildHasher + Send + Sync + 'static,
{
    type Key = K;
    type Value = V;

    fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        HashMap::keys(self)
    }

    fn property(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn assign(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn into_properties(self) -> impl Iterator<Item = (K, V)> {
        self.into_iter()
    }
}

impl<K, V> PropertyBag for BTreeMap<K, V>
where
    K: Clone + Ord + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    type Key = K;
    type Value = V;

    fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        BTreeMap::keys(self)
    }

    fn property(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn assign(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn into_properties(self) -> impl Iterator<Item = (K, V)> {
        self.into_iter()
    }
}

impl PropertyBag for JsonObject {
    type Key = String;
    type Value = serde_json::Value;

    fn keys(&self) -> impl Iterator<Item = &String> + '_ {
        serde_json::Map::keys(self)
    }

    fn property(&self, key: &String) -> Option<&serde_json::Value> {
        self.get(key)
    }

    fn assign(&mut self, key: String, value: serde_json::Value) {
        self.insert(key, value);
    }

    fn into_properties(self) -> impl Iterator<Item = (String, serde_json::Value)> {
        self.into_iter()
    }
}
