//! # Prime Bucket
//!
//! Hash tables over a prime-sized bucket array, with string keys hashed by a caller-supplied
//! function.
//!
//! This crate provides two hash map implementations behind one [`HashTable`] trait:
//!
//! - `OpenAddressingMap`: one entry per slot, collisions resolved by quadratic probing,
//!   removal by tombstone. Grows once the load factor reaches 0.5.
//! - `ChainingMap`: every bucket owns a singly linked list. Grows once the load factor
//!   reaches 1.0.
//!
//! Both grow by doubling the capacity and rounding up to a prime, then replaying every live
//! entry into the new array. [`find_mode`] builds on `ChainingMap` to find the most frequent
//! elements of a sequence in linear time.
//!
//! ## Basic Usage
//!
//! ```rust
//! use primebucket::{HashTable, OpenAddressingMap, additive_hash};
//!
//! // Create a table with (at least) 53 slots
//! let mut map = OpenAddressingMap::new(53, additive_hash);
//!
//! // Insert values
//! map.put("apple", 1);
//! map.put("banana", 2);
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Update values
//! map.put("apple", 10);
//! assert_eq!(map.get("apple"), Some(&10));
//! assert_eq!(map.len(), 2);
//!
//! // Remove values
//! map.remove("apple");
//! assert_eq!(map.get("apple"), None);
//! ```
//!
//! ## Chaining and Resizing
//!
//! ```rust
//! use primebucket::{ChainingMap, HashTable, ResizeError, positional_hash};
//!
//! let mut map = ChainingMap::new(11, positional_hash);
//! for i in 0..20 {
//!     map.put(&format!("key-{i}"), i);
//! }
//!
//! // The table doubled once the load factor reached 1.0
//! assert_eq!(map.capacity(), 23);
//!
//! // Capacities are rounded up to a prime
//! map.resize(100);
//! assert_eq!(map.capacity(), 101);
//! assert_eq!(map.get("key-7"), Some(&7));
//!
//! // A chaining table needs at least one bucket
//! assert_eq!(map.try_resize(0), Err(ResizeError::BelowMinimum { requested: 0 }));
//! ```

/// Singly linked list used as a chaining bucket
pub mod chain;
/// Hash table resolving collisions with separate chaining
pub mod chaining;
/// Resize error definitions
mod error;
/// Key hash functions and slot addressing
pub mod hash;
/// Mode finding on top of the chaining table
mod mode;
/// Hash table resolving collisions with quadratic probing
pub mod open_addressing;
/// Prime helpers for capacities
pub mod prime;
/// The contract shared by both tables
mod table;

pub use chain::Chain;
pub use chaining::ChainingMap;
pub use error::{ResizeError, ResizeResult};
pub use hash::{HashFn, additive_hash, positional_hash, sip_hash};
pub use mode::{find_mode, find_mode_with};
pub use open_addressing::{OpenAddressingMap, SlotState};
pub use table::{DEFAULT_CAPACITY, HashTable};
