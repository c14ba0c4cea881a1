//! # JSON Error Types
//!
//! All errors the scanner and parser can report. Every variant carries the
//! 1-based source line so a bad config file points at itself.
//!
//! Query failures (missing key, type mismatch) are deliberately *not* here:
//! they never abort anything, they poison the queried subtree and degrade
//! further reads to `None` (see [`crate::document`]).

use thiserror::Error;

/// Errors reported while scanning or parsing a JSON document.
///
/// The first error aborts the whole parse; there is no recovery. The
/// caller decides whether to abort loading or substitute defaults.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JsonError {
    /// The scanner hit a byte that starts no token.
    #[error("line {line}: unexpected character '{found}'")]
    UnexpectedCharacter {
        /// 1-based source line.
        line: u32,
        /// The offending character.
        found: char,
    },

    /// A string ran to end of input without a closing quote.
    #[error("line {line}: unterminated string")]
    UnterminatedString {
        /// 1-based line of the opening quote.
        line: u32,
    },

    /// A bare word that is not `true`, `false`, or `null`.
    #[error("line {line}: unknown identifier '{word}'")]
    UnknownIdentifier {
        /// 1-based source line.
        line: u32,
        /// The word as written.
        word: String,
    },

    /// An object member did not start with a string key.
    #[error("line {line}: expected string key, found {found}")]
    ExpectedKey {
        /// 1-based source line.
        line: u32,
        /// Description of the token found instead.
        found: String,
    },

    /// An object key was not followed by `:`.
    #[error("line {line}: expected ':' after object key, found {found}")]
    ExpectedColon {
        /// 1-based source line.
        line: u32,
        /// Description of the token found instead.
        found: String,
    },

    /// A token that fits no grammar production at this position.
    #[error("line {line}: unexpected token {found}")]
    UnexpectedToken {
        /// 1-based source line.
        line: u32,
        /// Description of the offending token.
        found: String,
    },

    /// Non-whitespace content after a complete top-level value.
    #[error("line {line}: expected end of input after top-level value, found {found}")]
    TrailingContent {
        /// 1-based source line.
        line: u32,
        /// Description of the trailing token.
        found: String,
    },

    /// Objects/arrays nested deeper than the configured limit.
    #[error("line {line}: nesting exceeds {limit} levels")]
    DepthExceeded {
        /// 1-based source line.
        line: u32,
        /// The configured depth limit.
        limit: u32,
    },
}

impl JsonError {
    /// Returns the 1-based source line the error points at.
    #[must_use]
    pub const fn line(&self) -> u32 {
        match self {
            Self::UnexpectedCharacter { line, .. }
            | Self::UnterminatedString { line }
            | Self::UnknownIdentifier { line, .. }
            | Self::ExpectedKey { line, .. }
            | Self::ExpectedColon { line, .. }
            | Self::UnexpectedToken { line, .. }
            | Self::TrailingContent { line, .. }
            | Self::DepthExceeded { line, .. } => *line,
        }
    }
}
