//! # Collections
//!
//! Data-oriented associative containers for the EMBER engine.
//!
//! Keys are pre-hashed 64-bit values (see [`key_hash`]) so that the same
//! hash can be computed once and shared between subsystems - the JSON
//! engine stores object field names this way, and gameplay tables index
//! assets by the same hashes.

mod hash;
mod table;

pub use hash::key_hash;
pub use table::HashTable;
