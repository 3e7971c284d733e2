use std::{fmt, iter, mem};

use crate::{
    chain::{Chain, ChainIter},
    error::{ResizeError, ResizeResult},
    hash::{self, HashFn, additive_hash},
    prime,
    table::{DEFAULT_CAPACITY, HashTable},
};

/// Load factor at which `put` doubles the table before inserting
pub const MAX_LOAD_FACTOR: f64 = 1.0;

/// Builds `capacity` empty chains
fn fresh_buckets<V>(capacity: usize) -> Vec<Chain<V>> {
    iter::repeat_with(Chain::new).take(capacity).collect()
}

/// A hash table resolving collisions with separate chaining.
///
/// Every bucket owns a singly linked list; colliding keys extend the list and removal
/// unlinks the node, so there are no tombstones. The capacity is always prime and `put`
/// doubles it once the load factor has reached [`MAX_LOAD_FACTOR`]. Chains degrade
/// linearly, which is why the threshold sits higher than the open-addressing one.
#[derive(Debug)]
pub struct ChainingMap<V> {
    /// The buckets storing the key-value pairs
    buckets: Vec<Chain<V>>,
    /// Current number of entries across all chains
    size: usize,
    /// Hash function applied to every key
    hash: HashFn,
}

impl<V> Default for ChainingMap<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, additive_hash)
    }
}

impl<K, V> Extend<(K, V)> for ChainingMap<V>
where
    K: AsRef<str>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.put(k.as_ref(), v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ChainingMap<V>
where
    K: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<V> ChainingMap<V> {
    /// Creates a table with at least `capacity` buckets, rounded up to the next odd prime.
    ///
    /// # Panics
    ///
    /// Panics like [`Vec::with_capacity`] when the rounded capacity does not fit in
    /// memory. A capacity with no prime above it in `usize` is treated the same way.
    #[must_use]
    pub fn new(capacity: usize, hash: HashFn) -> Self {
        let capacity = prime::next_prime(capacity).unwrap_or(usize::MAX);
        Self { buckets: fresh_buckets(capacity), size: 0, hash }
    }

    /// Creates a table of the default capacity using `hash`
    #[must_use]
    pub fn with_hasher(hash: HashFn) -> Self {
        Self::new(DEFAULT_CAPACITY, hash)
    }

    /// Length of the chain in bucket `index`, or `None` past the end of the array
    #[must_use]
    pub fn chain_len(&self, index: usize) -> Option<usize> {
        self.buckets.get(index).map(Chain::len)
    }

    /// Returns an iterator over entries in bucket order, then chain order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { buckets: self.buckets.iter(), chain: None }
    }

    /// Bucket index for `key`
    fn bucket_of(&self, key: &str) -> usize {
        hash::home_slot((self.hash)(key), self.buckets.len())
    }

    /// Inserts or updates `key`, growing first when the table is at its load limit
    fn insert<K>(&mut self, key: K, value: V)
    where
        K: AsRef<str> + Into<String>,
    {
        if self.size >= self.buckets.len() {
            let doubled = self.buckets.len().saturating_mul(2);
            self.rehash(prime::normalize_capacity(doubled).unwrap_or(usize::MAX));
        }

        let index = self.bucket_of(key.as_ref());
        if let Some(chain) = self.buckets.get_mut(index) {
            if let Some(existing) = chain.find_mut(key.as_ref()) {
                *existing = value;
            } else {
                chain.push_front(key.into(), value);
                self.size = self.size.saturating_add(1);
            }
        }
    }

    /// Rebuilds the bucket array with `capacity` buckets and replays every node through
    /// `insert`, head to tail, bucket by bucket.
    fn rehash(&mut self, capacity: usize) {
        let old = mem::replace(&mut self.buckets, fresh_buckets(capacity));
        self.size = 0;
        for (key, value) in old.into_iter().flatten() {
            self.insert(key, value);
        }
    }
}

impl<V> HashTable<V> for ChainingMap<V> {
    fn put(&mut self, key: &str, value: V) {
        self.insert(key, value);
    }

    fn get(&self, key: &str) -> Option<&V> {
        self.buckets.get(self.bucket_of(key))?.find(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.bucket_of(key);
        self.buckets.get_mut(index)?.find_mut(key)
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.bucket_of(key);
        let removed = self.buckets.get_mut(index)?.remove(key)?;
        self.size = self.size.saturating_sub(1);
        Some(removed)
    }

    fn clear(&mut self) {
        self.buckets = fresh_buckets(self.buckets.len());
        self.size = 0;
    }

    fn try_resize(&mut self, new_capacity: usize) -> ResizeResult {
        if new_capacity < 1 {
            return Err(ResizeError::BelowMinimum { requested: new_capacity });
        }
        let capacity = prime::normalize_capacity(new_capacity)
            .ok_or(ResizeError::TooLarge { requested: new_capacity })?;
        self.rehash(capacity);
        Ok(())
    }

    fn len(&self) -> usize {
        self.size
    }

    fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Buckets whose chain is empty
    fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|chain| chain.is_empty()).count()
    }

    fn keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.to_owned(), v.clone())).collect()
    }
}

impl<V> fmt::Display for ChainingMap<V>
where
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.buckets.iter().enumerate() {
            writeln!(f, "{index}: {chain}")?;
        }
        Ok(())
    }
}

/// Iterator over the entries of a [`ChainingMap`]
#[derive(Debug)]
pub struct Iter<'a, V> {
    /// Buckets not yet visited
    buckets: std::slice::Iter<'a, Chain<V>>,
    /// Position inside the current bucket's chain
    chain: Option<ChainIter<'a, V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.chain.as_mut().and_then(Iterator::next) {
                return Some(item);
            }
            self.chain = Some(self.buckets.next()?.iter());
        }
    }
}

impl<'a, V> IntoIterator for &'a ChainingMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
