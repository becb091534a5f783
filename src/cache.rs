use std::hash::Hash;

use ahash::AHashMap;

use crate::template::PathContext;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memo table keyed by path context, then element.
///
/// Owned by a single encoding call and dropped with it.
#[derive(Debug)]
pub struct ContextCache<K, V> {
    inner: AHashMap<PathContext, AHashMap<K, V>>,
    stats: CacheStats,
}

impl<K, V> Default for ContextCache<K, V> {
    fn default() -> Self {
        Self {
            inner: AHashMap::new(),
            stats: CacheStats::default(),
        }
    }
}

impl<K: Eq + Hash + Copy, V: Clone> ContextCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, context: PathContext, key: K) -> Option<&V> {
        self.inner.get(&context).and_then(|slot| slot.get(&key))
    }

    pub fn insert(&mut self, context: PathContext, key: K, value: V) {
        self.inner.entry(context).or_default().insert(key, value);
    }

    /// Returns the cached value, running `compute` only on a miss.
    pub fn compute<F: FnOnce() -> V>(&mut self, context: PathContext, key: K, compute: F) -> V {
        let slot = self.inner.entry(context).or_default();
        if let Some(value) = slot.get(&key) {
            self.stats.hits += 1;
            return value.clone();
        }
        self.stats.misses += 1;
        let value = compute();
        slot.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.inner.values().map(|slot| slot.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.inner.clear();
        self.stats = CacheStats::default();
    }
}
