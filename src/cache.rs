use std::collections::HashMap;
use std::hash::Hash;

/// In-memory cache of fetched results for the lifetime of the process.
/// Revisiting a page or record is served from here; `r` evicts the entry
/// for the current view before refetching.
#[derive(Debug)]
pub struct Cache<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for Cache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V: Clone> Cache<K, V> {
    /// Cloned so the caller can move it into view state
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    pub fn remove(&mut self, key: &K) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
