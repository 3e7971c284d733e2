use std::{fmt, iter, mem};

use crate::{
    error::{ResizeError, ResizeResult},
    hash::{self, HashFn, additive_hash},
    prime,
    table::{DEFAULT_CAPACITY, HashTable},
};

/// Load factor at which `put` doubles the table before inserting
pub const MAX_LOAD_FACTOR: f64 = 0.5;

/// A key-value pair stored in a slot
#[derive(Debug, Clone)]
struct Entry<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
}

/// One position of the slot array
#[derive(Debug, Clone)]
enum Slot<V> {
    /// Never held an entry since the array was built
    Empty,
    /// Holds a live entry
    Occupied(Entry<V>),
    /// Held an entry that was removed; probes continue past it
    Tombstone,
}

/// Observable state of a slot, see [`OpenAddressingMap::slot_state`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Never held an entry since the last rebuild
    Empty,
    /// Holds a live entry
    Occupied,
    /// Held an entry that has since been removed
    Tombstone,
}

/// Outcome of walking the probe sequence for an insert
enum Placement {
    /// The key is live at this index
    Existing(usize),
    /// The key is absent and may be written at this index
    Vacant(usize),
    /// No live match and no writable slot within the probe bound
    Saturated,
}

/// Quadratic probe sequence `home, home + 1, home + 4, home + 9, ...` modulo the capacity.
///
/// Yields at most `capacity` indices; the offsets repeat after that.
#[derive(Debug, Clone)]
struct Probe {
    /// Next index to yield
    index: usize,
    /// Number of indices yielded so far (`j`)
    step: usize,
    /// Length of the slot array
    capacity: usize,
}

impl Probe {
    /// Starts a probe at `home`
    fn start(home: usize, capacity: usize) -> Self {
        Self { index: home, step: 0, capacity }
    }
}

impl Iterator for Probe {
    type Item = usize;

    #[allow(clippy::arithmetic_side_effects)]
    fn next(&mut self) -> Option<usize> {
        if self.step >= self.capacity {
            return None;
        }
        let current = self.index;
        // (j + 1)² - j² = 2j + 1
        let stride = (2 * self.step + 1) % self.capacity;
        self.index = (self.index + stride) % self.capacity;
        self.step += 1;
        Some(current)
    }
}

/// Builds `capacity` empty slots
fn empty_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}

/// A hash table resolving collisions with quadratic probing.
///
/// Each slot holds at most one entry. Removal leaves a tombstone so probe sequences that
/// passed through the removed entry still reach the keys behind it. The capacity is always
/// prime, and `put` doubles it whenever the load factor has reached [`MAX_LOAD_FACTOR`],
/// which keeps the array under half full and guarantees quadratic probing finds a free slot.
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct OpenAddressingMap<V> {
    /// The slots storing the key-value pairs
    slots: Vec<Slot<V>>,
    /// Current number of live entries; tombstones are not counted
    size: usize,
    /// Hash function applied to every key
    hash: HashFn,
}

impl<V> Default for OpenAddressingMap<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, additive_hash)
    }
}

impl<K, V> Extend<(K, V)> for OpenAddressingMap<V>
where
    K: AsRef<str>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.put(k.as_ref(), v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for OpenAddressingMap<V>
where
    K: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<V> OpenAddressingMap<V> {
    /// Creates a table with at least `capacity` slots, rounded up to the next odd prime.
    ///
    /// # Panics
    ///
    /// Panics like [`Vec::with_capacity`] when the rounded capacity does not fit in
    /// memory. A capacity with no prime above it in `usize` is treated the same way.
    #[must_use]
    pub fn new(capacity: usize, hash: HashFn) -> Self {
        let capacity = prime::next_prime(capacity).unwrap_or(usize::MAX);
        Self { slots: empty_slots(capacity), size: 0, hash }
    }

    /// Creates a table of the default capacity using `hash`
    #[must_use]
    pub fn with_hasher(hash: HashFn) -> Self {
        Self::new(DEFAULT_CAPACITY, hash)
    }

    /// Returns the state of the slot at `index`, or `None` past the end of the array
    #[must_use]
    pub fn slot_state(&self, index: usize) -> Option<SlotState> {
        self.slots.get(index).map(|slot| match slot {
            Slot::Empty => SlotState::Empty,
            Slot::Occupied(_) => SlotState::Occupied,
            Slot::Tombstone => SlotState::Tombstone,
        })
    }

    /// Counts the tombstones currently in the slot array
    #[must_use]
    pub fn tombstones(&self) -> usize {
        self.slots.iter().filter(|slot| matches!(slot, Slot::Tombstone)).count()
    }

    /// Returns an iterator over live entries in slot order.
    ///
    /// Each call starts again from slot 0.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { slots: &self.slots, index: 0 }
    }

    /// Starts the probe sequence for `key`
    fn probe(&self, key: &str) -> Probe {
        let capacity = self.slots.len();
        Probe::start(hash::home_slot((self.hash)(key), capacity), capacity)
    }

    /// Returns true once the load factor has reached [`MAX_LOAD_FACTOR`]
    fn at_load_limit(&self) -> bool {
        self.size.saturating_mul(2) >= self.slots.len()
    }

    /// Finds the slot holding `key` as a live entry
    fn find(&self, key: &str) -> Option<usize> {
        for index in self.probe(key) {
            match self.slots.get(index) {
                None | Some(Slot::Empty) => return None,
                Some(Slot::Occupied(entry)) if entry.key == key => return Some(index),
                Some(Slot::Occupied(_) | Slot::Tombstone) => {}
            }
        }
        None
    }

    /// Walks the probe sequence for an insert of `key`.
    ///
    /// The first tombstone is remembered but the walk continues, since the key may still
    /// be live further along the sequence.
    fn locate(&self, key: &str) -> Placement {
        let mut first_tombstone = None;
        for index in self.probe(key) {
            match self.slots.get(index) {
                Some(Slot::Empty) => return Placement::Vacant(first_tombstone.unwrap_or(index)),
                Some(Slot::Occupied(entry)) if entry.key == key => {
                    return Placement::Existing(index);
                }
                Some(Slot::Tombstone) if first_tombstone.is_none() => {
                    first_tombstone = Some(index);
                }
                Some(Slot::Occupied(_) | Slot::Tombstone) | None => {}
            }
        }
        first_tombstone.map_or(Placement::Saturated, Placement::Vacant)
    }

    /// Inserts or updates `key`, growing first when the table is at its load limit
    fn insert<K>(&mut self, key: K, value: V)
    where
        K: AsRef<str> + Into<String>,
    {
        if self.at_load_limit() {
            self.grow();
        }

        loop {
            match self.locate(key.as_ref()) {
                Placement::Existing(index) => {
                    if let Some(Slot::Occupied(entry)) = self.slots.get_mut(index) {
                        entry.value = value;
                    }
                    return;
                }
                Placement::Vacant(index) => {
                    if let Some(slot) = self.slots.get_mut(index) {
                        *slot = Slot::Occupied(Entry { key: key.into(), value });
                        self.size = self.size.saturating_add(1);
                    }
                    return;
                }
                Placement::Saturated => self.grow(),
            }
        }
    }

    /// Doubles the capacity (rounded up to a prime)
    fn grow(&mut self) {
        let doubled = self.slots.len().saturating_mul(2);
        self.rehash(prime::normalize_capacity(doubled).unwrap_or(usize::MAX));
    }

    /// Rebuilds the slot array with `capacity` slots and replays every live entry.
    ///
    /// Tombstones are dropped. Replays go through `insert`, so the load check runs
    /// for each of them.
    fn rehash(&mut self, capacity: usize) {
        let old = mem::replace(&mut self.slots, empty_slots(capacity));
        self.size = 0;
        for slot in old {
            if let Slot::Occupied(Entry { key, value }) = slot {
                self.insert(key, value);
            }
        }
    }
}

impl<V> HashTable<V> for OpenAddressingMap<V> {
    fn put(&mut self, key: &str, value: V) {
        self.insert(key, value);
    }

    fn get(&self, key: &str) -> Option<&V> {
        match self.slots.get(self.find(key)?) {
            Some(Slot::Occupied(entry)) => Some(&entry.value),
            _ => None,
        }
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.find(key)?;
        match self.slots.get_mut(index) {
            Some(Slot::Occupied(entry)) => Some(&mut entry.value),
            _ => None,
        }
    }

    fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.find(key)?;
        let slot = self.slots.get_mut(index)?;
        match mem::replace(slot, Slot::Tombstone) {
            Slot::Occupied(entry) => {
                self.size = self.size.saturating_sub(1);
                Some(entry.value)
            }
            other => {
                *slot = other;
                None
            }
        }
    }

    fn clear(&mut self) {
        self.slots = empty_slots(self.slots.len());
        self.size = 0;
    }

    fn try_resize(&mut self, new_capacity: usize) -> ResizeResult {
        if new_capacity < self.size {
            return Err(ResizeError::BelowSize { requested: new_capacity, len: self.size });
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
        self.slots.len()
    }

    /// Capacity minus live entries.
    ///
    /// Tombstoned slots are counted as empty here even though probes treat them as
    /// occupied; use [`tombstones`](OpenAddressingMap::tombstones) for the physical count.
    fn empty_buckets(&self) -> usize {
        self.slots.len().saturating_sub(self.size)
    }

    fn keys_and_values(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.to_owned(), v.clone())).collect()
    }
}

impl<V> fmt::Display for OpenAddressingMap<V>
where
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Empty => writeln!(f, "{index}: -")?,
                Slot::Occupied(entry) => writeln!(f, "{index}: {} -> {}", entry.key, entry.value)?,
                Slot::Tombstone => writeln!(f, "{index}: <tombstone>")?,
            }
        }
        Ok(())
    }
}

/// Iterator over the live entries of an [`OpenAddressingMap`], in slot order
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// The slot array being walked
    slots: &'a [Slot<V>],
    /// Current position in the iteration
    index: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.slots.get(self.index) {
            self.index = self.index.saturating_add(1);
            if let Slot::Occupied(entry) = slot {
                return Some((entry.key.as_str(), &entry.value));
            }
        }
        None
    }
}

impl<'a, V> IntoIterator for &'a OpenAddressingMap<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::positional_hash;

    fn constant_hash(_: &str) -> u64 {
        0
    }

    #[test]
    fn test_put_and_get() {
        let mut map = OpenAddressingMap::new(31, additive_hash);
        assert_eq!(map.get("key"), None);
        map.put("key1", 10);
        map.put("key2", 20);
        map.put("key3", 30);

        assert_eq!(map.get("key1"), Some(&10));
        assert_eq!(map.get("key2"), Some(&20));
        assert_eq!(map.get("key3"), Some(&30));
        assert_eq!(map.get("key4"), None);
    }

    #[test]
    fn test_update_keeps_size() {
        let mut map = OpenAddressingMap::new(101, additive_hash);
        map.put("key1", 10);
        map.put("key2", 20);
        map.put("key1", 30);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("key1"), Some(&30));
        assert!((map.load_factor() - 2.0 / 101.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_capacity_rounds_to_prime() {
        assert_eq!(OpenAddressingMap::<i32>::new(20, additive_hash).capacity(), 23);
        assert_eq!(OpenAddressingMap::<i32>::new(53, additive_hash).capacity(), 53);
        assert_eq!(OpenAddressingMap::<i32>::new(2, additive_hash).capacity(), 3);
        assert_eq!(OpenAddressingMap::<i32>::new(0, additive_hash).capacity(), 3);
        assert_eq!(OpenAddressingMap::<i32>::default().capacity(), 11);
        assert_eq!(OpenAddressingMap::<i32>::with_hasher(positional_hash).capacity(), 11);
    }

    #[test]
    fn test_with_hasher_uses_given_hash() {
        let mut map = OpenAddressingMap::with_hasher(constant_hash);
        map.put("a", 1);
        map.put("b", 2);
        map.put("c", 3);
        // every key starts at slot 0 and walks 0, 1, 4
        assert_eq!(map.slot_state(0), Some(SlotState::Occupied));
        assert_eq!(map.slot_state(1), Some(SlotState::Occupied));
        assert_eq!(map.slot_state(4), Some(SlotState::Occupied));
        assert_eq!(map.keys(), vec!["a", "b", "c"]);
        assert_eq!(map.values(), vec![1, 2, 3]);
    }

    #[test]
    fn test_growth_checkpoints() {
        let mut map = OpenAddressingMap::new(53, additive_hash);
        let mut checkpoints = Vec::new();
        for i in 0..150 {
            map.put(&format!("str{i}"), i * 100);
            if i % 25 == 24 {
                assert_eq!(map.empty_buckets() + map.len(), map.capacity());
                checkpoints.push((map.empty_buckets(), map.len(), map.capacity()));
            }
        }

        assert_eq!(
            checkpoints,
            vec![
                (28, 25, 53),
                (57, 50, 107),
                (148, 75, 223),
                (123, 100, 223),
                (324, 125, 449),
                (299, 150, 449)
            ]
        );
    }

    #[test]
    fn test_load_checked_before_insert() {
        let mut map = OpenAddressingMap::new(3, additive_hash);
        map.put("a", 1);
        assert_eq!(map.capacity(), 3);
        // 1/3 is under the limit, so this insert lands without growing
        map.put("b", 2);
        assert_eq!(map.capacity(), 3);
        assert!(map.load_factor() > MAX_LOAD_FACTOR);
        // 2/3 has reached the limit; the next put grows first
        map.put("c", 3);
        assert_eq!(map.capacity(), 7);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_remove_leaves_tombstone() {
        let mut map = OpenAddressingMap::new(10, positional_hash);
        for i in 0..5 {
            map.put(&i.to_string(), i * 24);
        }
        assert_eq!(map.remove("0"), Some(0));
        assert_eq!(map.remove("4"), Some(96));

        assert_eq!(map.slot_state(4), Some(SlotState::Tombstone));
        assert_eq!(map.slot_state(5), Some(SlotState::Occupied));
        assert_eq!(map.slot_state(8), Some(SlotState::Tombstone));
        assert_eq!(map.slot_state(9), Some(SlotState::Empty));
        assert_eq!(map.slot_state(11), None);
        assert_eq!(map.tombstones(), 2);

        let items: Vec<_> = map.iter().map(|(k, &v)| (k.to_string(), v)).collect();
        assert_eq!(items, vec![("1".to_string(), 24), ("2".to_string(), 48), ("3".to_string(), 72)]);
        // tombstones are reported as empty buckets
        assert_eq!(map.empty_buckets(), 8);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut map = OpenAddressingMap::new(53, additive_hash);
        map.put("key1", 10);
        assert_eq!(map.remove("key1"), Some(10));
        assert_eq!(map.remove("key1"), None);
        assert_eq!(map.remove("key4"), None);
        assert_eq!(map.get("key1"), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_lookup_continues_past_tombstone() {
        let mut map = OpenAddressingMap::new(11, constant_hash);
        map.put("a", 1);
        map.put("b", 2);
        map.put("c", 3);
        map.remove("a");
        map.remove("b");

        assert_eq!(map.get("c"), Some(&3));
        assert!(map.contains_key("c"));
        assert!(!map.contains_key("a"));
    }

    #[test]
    fn test_put_behind_tombstone_updates_existing_key() {
        let mut map = OpenAddressingMap::new(11, constant_hash);
        map.put("a", 1);
        map.put("b", 2);
        map.remove("a");
        map.put("b", 20);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("b"), Some(&20));
        assert_eq!(map.slot_state(0), Some(SlotState::Tombstone));
        assert_eq!(map.keys_and_values(), vec![("b".to_string(), 20)]);
    }

    #[test]
    fn test_put_reuses_first_tombstone() {
        let mut map = OpenAddressingMap::new(11, constant_hash);
        map.put("a", 1);
        map.put("b", 2);
        map.remove("a");
        map.put("c", 3);

        assert_eq!(map.slot_state(0), Some(SlotState::Occupied));
        assert_eq!(map.tombstones(), 0);
        assert_eq!(map.keys(), vec!["c".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_probe_terminates_when_no_empty_slot_is_left() {
        let mut map = OpenAddressingMap::new(3, constant_hash);
        // slots 0 and 1 become tombstones; 1 is reachable from 0 by the first jump
        map.put("a", 1);
        map.put("b", 2);
        map.remove("a");
        map.remove("b");
        map.put("c", 3);
        map.remove("c");
        assert_eq!(map.get("missing"), None);
        assert_eq!(map.remove("missing"), None);
        map.put("d", 4);
        assert_eq!(map.get("d"), Some(&4));
    }

    #[test]
    fn test_saturated_table_grows_and_retries() {
        // three live entries under a size that still passes the load check
        let full = |key: &str, value| Slot::Occupied(Entry { key: key.to_string(), value });
        let mut map = OpenAddressingMap {
            slots: vec![full("a", 1), full("b", 2), full("c", 3)],
            size: 1,
            hash: constant_hash,
        };
        assert!(!map.at_load_limit());
        assert!(matches!(map.locate("d"), Placement::Saturated));
        assert!(matches!(map.locate("b"), Placement::Existing(1)));

        map.put("d", 4);
        assert_eq!(map.capacity(), 7);
        assert_eq!(map.get("d"), Some(&4));
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.get("c"), Some(&3));
    }

    #[test]
    fn test_resize_without_prime_is_rejected() {
        let mut map = OpenAddressingMap::new(11, additive_hash);
        map.put("key1", 10);
        assert_eq!(
            map.try_resize(usize::MAX - 1),
            Err(ResizeError::TooLarge { requested: usize::MAX - 1 })
        );
        map.resize(usize::MAX);
        assert_eq!(map.capacity(), 11);
        assert_eq!(map.get("key1"), Some(&10));
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut map = OpenAddressingMap::new(53, additive_hash);
        map.put("key1", 10);
        map.put("key2", 20);
        map.resize(100);
        assert_eq!(map.capacity(), 101);

        map.remove("key2");
        map.clear();
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), 101);
        assert_eq!(map.tombstones(), 0);
        assert_eq!(map.get("key1"), None);
        assert!(!map.contains_key("key1"));
    }

    #[test]
    fn test_resize_below_size_is_rejected() {
        let mut map = OpenAddressingMap::new(11, positional_hash);
        for i in 1..6 {
            map.put(&i.to_string(), (i * 10).to_string());
        }
        let before = map.keys_and_values();

        assert_eq!(map.try_resize(2), Err(ResizeError::BelowSize { requested: 2, len: 5 }));
        map.resize(2);
        assert_eq!(map.capacity(), 11);
        assert_eq!(map.keys_and_values(), before);

        map.put("20", "200".to_string());
        map.remove("1");
        map.resize(12);
        assert_eq!(map.capacity(), 13);
        assert_eq!(map.keys(), vec!["4", "5", "20", "2", "3"]);
    }

    #[test]
    fn test_resize_keeps_every_key() {
        let mut map = OpenAddressingMap::new(75, positional_hash);
        let keys: Vec<usize> = (25..1000).step_by(13).collect();
        for &key in &keys {
            map.put(&key.to_string(), key * 42);
        }
        assert_eq!((map.len(), map.capacity()), (75, 163));

        let mut capacities = Vec::new();
        for capacity in (111..1000).step_by(117) {
            map.resize(capacity);
            assert!(map.load_factor() <= MAX_LOAD_FACTOR);

            map.put("some key", 0);
            assert!(map.contains_key("some key"));
            map.remove("some key");

            for &key in &keys {
                assert_eq!(map.get(&key.to_string()), Some(&(key * 42)));
                assert!(!map.contains_key(&(key + 1).to_string()));
            }
            assert_eq!(map.len(), 75);
            capacities.push(map.capacity());
        }
        assert_eq!(capacities, vec![227, 229, 347, 463, 587, 701, 821, 937]);
    }

    #[test]
    fn test_get_mut() {
        let mut map = OpenAddressingMap::default();
        map.put("key1", 1);
        if let Some(value) = map.get_mut("key1") {
            *value += 10;
        }
        assert_eq!(map.get("key1"), Some(&11));
        assert_eq!(map.get_mut("key2"), None);
    }

    #[test]
    fn test_iter_is_restartable() {
        let map: OpenAddressingMap<i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        let first: i32 = map.iter().map(|(_, v)| v).sum();
        let second: i32 = (&map).into_iter().map(|(_, v)| v).sum();
        assert_eq!(first, 6);
        assert_eq!(second, 6);
    }

    #[test]
    fn test_display() {
        let mut map = OpenAddressingMap::new(3, constant_hash);
        map.put("a", 1);
        map.put("b", 2);
        map.remove("a");
        assert_eq!(map.to_string(), "0: <tombstone>\n1: b -> 2\n2: -\n");
    }
}
