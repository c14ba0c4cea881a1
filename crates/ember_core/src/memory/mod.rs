//! # Memory Management
//!
//! Parse-scoped memory for the EMBER engine.
//!
//! The arena hands out bump allocations that stay valid until the whole
//! arena is torn down. Nothing is freed individually, which is exactly the
//! lifetime that loading a configuration or asset-metadata file needs.

mod arena;

pub use arena::{Arena, ArenaSlice, ArenaStr};
