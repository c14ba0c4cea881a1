//! # Key Hashing
//!
//! Deterministic 64-bit hashing for asset and field names.
//!
//! SipHash-1-3 with fixed keys: the same name hashes to the same value in
//! every process, every run, on every platform. Tools can therefore bake
//! hashes into data files, and the JSON engine can compare field names by
//! hash alone.

use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// First half of the fixed SipHash key.
const HASH_KEY_0: u64 = 0x736f_6d65_7073_6575;
/// Second half of the fixed SipHash key.
const HASH_KEY_1: u64 = 0x646f_7261_6e64_6f6d;

/// Hashes a name to the 64-bit key used by [`HashTable`](crate::HashTable)
/// and the JSON engine's object fields.
///
/// # Arguments
///
/// * `key` - The name to hash
///
/// # Example
///
/// ```rust,ignore
/// let a = key_hash("player_speed");
/// let b = key_hash("player_speed");
/// assert_eq!(a, b); // stable across runs
/// ```
#[must_use]
pub fn key_hash(key: &str) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(HASH_KEY_0, HASH_KEY_1);
    hasher.write(key.as_bytes());
    hasher.finish()
}
