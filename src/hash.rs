//! Key hash functions and slot addressing
//!
//! Tables never hash keys themselves; they are handed a [`HashFn`] at
//! construction and only use its output modulo their capacity.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// A function mapping a string key to a non-negative integer
pub type HashFn = fn(&str) -> u64;

/// Sums the Unicode scalar values of every character in `key`.
///
/// Anagrams collide, which makes this a useful worst case for probing.
#[must_use]
pub fn additive_hash(key: &str) -> u64 {
    key.chars().fold(0u64, |hash, c| hash.wrapping_add(u64::from(c)))
}

/// Weights every character by its one-based position before summing.
#[must_use]
pub fn positional_hash(key: &str) -> u64 {
    key.chars().zip(1u64..).fold(0u64, |hash, (c, position)| {
        hash.wrapping_add(position.wrapping_mul(u64::from(c)))
    })
}

/// Hashes `key` with the standard library's SipHash-based hasher.
#[must_use]
pub fn sip_hash(key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Maps a hash onto a bucket index in `0..capacity`.
///
/// `capacity` is never zero for a live table; a zero capacity maps everything to slot 0.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn home_slot(hash: u64, capacity: usize) -> usize {
    // the remainder is below `capacity`, so narrowing back to usize is lossless
    hash.checked_rem(capacity as u64).unwrap_or(0) as usize
}
