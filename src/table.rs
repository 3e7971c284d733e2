//! The contract shared by both table engines

use crate::error::ResizeResult;

/// Bucket count used by `Default` tables
pub const DEFAULT_CAPACITY: usize = 11;

/// Operations common to [`OpenAddressingMap`](crate::OpenAddressingMap) and
/// [`ChainingMap`](crate::ChainingMap).
///
/// Keys are strings hashed by the function the table was built with; values are
/// owned by the table.
pub trait HashTable<V> {
    /// Inserts `value` under `key`, replacing the value of an existing key.
    ///
    /// May grow the table first when its load factor has reached the engine's threshold.
    fn put(&mut self, key: &str, value: V);

    /// Returns the value stored under `key`
    fn get(&self, key: &str) -> Option<&V>;

    /// Returns a mutable reference to the value stored under `key`
    fn get_mut(&mut self, key: &str) -> Option<&mut V>;

    /// Removes `key`, returning its value. Absent keys are a no-op.
    fn remove(&mut self, key: &str) -> Option<V>;

    /// Drops every entry while keeping the current capacity
    fn clear(&mut self);

    /// Rehashes every entry into a table of (at least) `new_capacity` buckets.
    ///
    /// # Errors
    ///
    /// Returns a [`ResizeError`](crate::ResizeError) and leaves the table untouched when
    /// `new_capacity` is not acceptable for the engine.
    fn try_resize(&mut self, new_capacity: usize) -> ResizeResult;

    /// Like [`try_resize`](Self::try_resize), but silently ignores rejected targets.
    ///
    /// Check [`capacity`](Self::capacity) afterwards when confirmation matters.
    fn resize(&mut self, new_capacity: usize) {
        self.try_resize(new_capacity).unwrap_or_default();
    }

    /// Number of live entries
    fn len(&self) -> usize;

    /// Number of buckets
    fn capacity(&self) -> usize;

    /// Number of buckets the engine reports as empty
    fn empty_buckets(&self) -> usize;

    /// Copies every live `(key, value)` pair in table order
    fn keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone;

    /// Returns true if the table holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `key` has a live entry
    fn contains_key(&self, key: &str) -> bool {
        if self.is_empty() {
            return false;
        }
        self.get(key).is_some()
    }

    /// Ratio of live entries to buckets
    #[allow(clippy::cast_precision_loss)]
    fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Returns the keys in table order
    fn keys(&self) -> Vec<String>
    where
        V: Clone,
    {
        self.keys_and_values().into_iter().map(|(k, _)| k).collect()
    }

    /// Returns the values in table order
    fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.keys_and_values().into_iter().map(|(_, v)| v).collect()
    }
}
