//! # EMBER Core
//!
//! Structured-data foundations for the EMBER engine:
//! - Arena allocation for parse-scoped memory (freed all at once)
//! - Open-addressing hash tables keyed by 64-bit hashes
//! - Deterministic key hashing shared across subsystems
//!
//! ## Architecture Rules
//!
//! 1. **No per-object frees** - Arena memory lives until teardown
//! 2. **Data-oriented layout** - Table slots are parallel arrays
//! 3. **No unsafe code** - Handles are indices, not raw pointers
//!
//! ## Example
//!
//! ```rust,ignore
//! use ember_core::{Arena, HashTable, key_hash};
//!
//! let mut arena = Arena::new();
//! let name = arena.bump_str("fireball");
//!
//! let mut table: HashTable<u32> = HashTable::new();
//! *table.find_or_insert(key_hash("fireball")) = 9;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod collections;
pub mod memory;

pub use collections::{key_hash, HashTable};
pub use memory::{Arena, ArenaSlice, ArenaStr};
