//! # EMBER JSON
//!
//! The engine's configuration and asset-metadata parser: a hand-written
//! scanner, a recursive-descent parser, and a read-only query API over the
//! parsed document.
//!
//! ## Design Principles
//!
//! 1. **No exceptions** - scan/parse errors are `Result` values; the first
//!    one aborts the parse and is surfaced on the document
//! 2. **Sticky query errors** - a failed lookup poisons the queried node
//!    and its ancestors; further reads return `None` instead of crashing
//! 3. **Borrowed strings** - string values are slices of the source
//!    buffer, which must outlive the document
//! 4. **Index-arena storage** - nodes live in vectors owned by the
//!    document and are freed all at once when it drops
//!
//! ## Example
//!
//! ```rust,ignore
//! use ember_json::parse;
//!
//! let source = r#"{"speed": 4.5, "tags": ["fast", "red"]}"#;
//! let doc = parse(source);
//! let root = doc.root().expect("valid config");
//!
//! let speed = doc.lookup(root, "speed").and_then(|v| doc.as_number(v));
//! assert_eq!(speed, Some(4.5));
//! ```
//!
//! ## Known Format Restrictions
//!
//! Two deliberate simplifications, kept for compatibility with the engine's
//! data files rather than silently widened:
//! - String escape sequences are **not decoded**; values are the raw bytes
//!   between quotes
//! - Numbers have **no exponent form** (`1e10` is rejected)

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod document;
pub mod error;
pub mod parser;
pub mod scanner;

pub use document::{Document, ValueId, ValueType};
pub use error::JsonError;
pub use parser::{parse, parse_with, ParseOptions};
pub use scanner::{Scanner, Token, TokenKind};
