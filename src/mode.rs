//! Most frequent elements of a sequence, counted with a [`ChainingMap`]

use crate::{
    chaining::ChainingMap,
    hash::{HashFn, additive_hash},
    table::{DEFAULT_CAPACITY, HashTable},
};

/// Returns the most frequent element(s) of `items` and their frequency.
///
/// Counts are kept in a default [`ChainingMap`]. Ties are reported in the map's
/// iteration order (bucket order, then most recent insert first within a bucket), not
/// in input order. An empty input yields `(vec![], 0)`.
///
/// ```rust
/// use primebucket::find_mode;
///
/// let (mode, frequency) = find_mode(&["apple", "apple", "grape", "melon", "peach"]);
/// assert_eq!(mode, vec!["apple".to_string()]);
/// assert_eq!(frequency, 2);
/// ```
#[must_use]
pub fn find_mode<S: AsRef<str>>(items: &[S]) -> (Vec<String>, usize) {
    find_mode_with(items, DEFAULT_CAPACITY, additive_hash)
}

/// Like [`find_mode`], counting in a map of the given initial capacity and hash function.
#[must_use]
pub fn find_mode_with<S: AsRef<str>>(
    items: &[S],
    capacity: usize,
    hash: HashFn,
) -> (Vec<String>, usize) {
    let mut counts: ChainingMap<usize> = ChainingMap::new(capacity, hash);
    for item in items {
        let item = item.as_ref();
        let count = counts.get(item).copied().unwrap_or(0);
        // put, not get_mut: an update must run the same load check as an insert
        counts.put(item, count.saturating_add(1));
    }

    let mut mode = Vec::new();
    let mut frequency = 0;
    for (item, &count) in &counts {
        if count == frequency {
            mode.push(item.to_owned());
        } else if count > frequency {
            frequency = count;
            mode.clear();
            mode.push(item.to_owned());
        }
    }

    (mode, frequency)
}
