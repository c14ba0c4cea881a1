//! # JSON Parser
//!
//! Recursive descent over the token stream, one function per grammar
//! production. Nodes are pushed into the document's index arena as they
//! are parsed; object members are prepended (last duplicate key wins) and
//! array element lists are reversed once their `]` is consumed.
//!
//! The first scan or parse error aborts the whole parse. Whatever partial
//! tree was built stays inside the document's arena, but the document
//! reports no root, so it can never be queried as valid.

use crate::document::{Document, Payload, ValueId};
use crate::error::JsonError;
use crate::scanner::{Scanner, Token, TokenKind};
use ember_core::key_hash;

/// Parser configuration.
///
/// Plain struct with defaults, set once per parse call.
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    /// Maximum object/array nesting depth. Bounds parser recursion so a
    /// hostile asset file cannot blow the stack.
    pub max_depth: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}

/// Parses a JSON document with default options.
///
/// Never panics and never returns an exception path: a failed parse comes
/// back as a document whose [`error`](Document::error) is set and whose
/// [`root`](Document::root) is `None`.
///
/// # Arguments
///
/// * `source` - The UTF-8 text to parse. String values borrow from it, so
///   it must outlive the returned document.
#[must_use]
pub fn parse(source: &str) -> Document<'_> {
    parse_with(source, ParseOptions::default())
}

/// Parses a JSON document with explicit options.
///
/// # Arguments
///
/// * `source` - The UTF-8 text to parse
/// * `options` - Depth limit and friends
#[must_use]
pub fn parse_with(source: &str, options: ParseOptions) -> Document<'_> {
    tracing::trace!(bytes = source.len(), "parsing document");

    let mut parser = match Parser::new(source, options) {
        Ok(parser) => parser,
        Err(error) => {
            tracing::debug!(%error, "scan failed before the first token");
            return Document::failed(error);
        }
    };

    match parser.parse_top_level() {
        Ok(root) => {
            parser.doc.set_root(root);
            tracing::trace!("document parsed");
        }
        Err(error) => {
            tracing::debug!(%error, "parse failed");
            parser.doc.set_error(error);
        }
    }
    parser.doc
}

/// Recursive-descent parser state: the scanner plus one token of
/// lookahead and the document under construction.
struct Parser<'src> {
    /// Token source.
    scanner: Scanner<'src>,
    /// The one-token lookahead.
    current: Token<'src>,
    /// The document being built.
    doc: Document<'src>,
    /// Current object/array nesting depth.
    depth: u32,
    /// Configured depth limit.
    max_depth: u32,
}

impl<'src> Parser<'src> {
    /// Primes the scanner with the first token.
    fn new(source: &'src str, options: ParseOptions) -> Result<Self, JsonError> {
        let mut scanner = Scanner::new(source);
        let current = scanner.next_token()?;
        Ok(Self {
            scanner,
            current,
            doc: Document::empty(),
            depth: 0,
            max_depth: options.max_depth,
        })
    }

    /// Advances the lookahead by one token.
    fn advance(&mut self) -> Result<(), JsonError> {
        self.current = self.scanner.next_token()?;
        Ok(())
    }

    /// Parses exactly one value followed by end of input.
    fn parse_top_level(&mut self) -> Result<ValueId, JsonError> {
        let root = self.parse_value(None)?;
        if self.current.kind == TokenKind::Eof {
            Ok(root)
        } else {
            Err(JsonError::TrailingContent {
                line: self.current.line,
                found: self.current.kind.describe(),
            })
        }
    }

    /// Dispatches on the current token to one of the productions.
    fn parse_value(&mut self, parent: Option<ValueId>) -> Result<ValueId, JsonError> {
        match self.current.kind {
            TokenKind::LeftBrace => self.parse_object(parent),
            TokenKind::LeftBracket => self.parse_array(parent),
            TokenKind::String(text) => {
                let id = self.doc.push_value(Payload::String(text), parent);
                self.advance()?;
                Ok(id)
            }
            TokenKind::Number(text) => {
                let id = self
                    .doc
                    .push_value(Payload::Number(decimal_to_double(text)), parent);
                self.advance()?;
                Ok(id)
            }
            TokenKind::True => {
                let id = self.doc.push_value(Payload::Boolean(true), parent);
                self.advance()?;
                Ok(id)
            }
            TokenKind::False => {
                let id = self.doc.push_value(Payload::Boolean(false), parent);
                self.advance()?;
                Ok(id)
            }
            TokenKind::Null => {
                let id = self.doc.push_value(Payload::Null, parent);
                self.advance()?;
                Ok(id)
            }
            _ => Err(JsonError::UnexpectedToken {
                line: self.current.line,
                found: self.current.kind.describe(),
            }),
        }
    }

    /// Parses an object: `{}` or `{ key : value (, key : value)* }`.
    ///
    /// A comma must be followed by another key - a trailing comma before
    /// `}` is rejected.
    fn parse_object(&mut self, parent: Option<ValueId>) -> Result<ValueId, JsonError> {
        self.enter_nesting()?;
        let object = self.doc.push_value(Payload::Object { first: None }, parent);
        self.advance()?; // consume '{'

        if self.current.kind == TokenKind::RightBrace {
            self.advance()?;
            self.leave_nesting();
            return Ok(object);
        }

        loop {
            let TokenKind::String(key) = self.current.kind else {
                return Err(JsonError::ExpectedKey {
                    line: self.current.line,
                    found: self.current.kind.describe(),
                });
            };
            let hash = key_hash(key);
            self.advance()?;

            if self.current.kind != TokenKind::Colon {
                return Err(JsonError::ExpectedColon {
                    line: self.current.line,
                    found: self.current.kind.describe(),
                });
            }
            self.advance()?;

            let value = self.parse_value(Some(object))?;
            self.doc.prepend_member(object, hash, value);

            match self.current.kind {
                TokenKind::Comma => self.advance()?, // next iteration expects a key
                TokenKind::RightBrace => {
                    self.advance()?;
                    break;
                }
                _ => {
                    return Err(JsonError::UnexpectedToken {
                        line: self.current.line,
                        found: self.current.kind.describe(),
                    });
                }
            }
        }

        self.leave_nesting();
        Ok(object)
    }

    /// Parses an array: `[]` or `[ value (, value)* ]`, then reverses the
    /// element list into ascending order.
    fn parse_array(&mut self, parent: Option<ValueId>) -> Result<ValueId, JsonError> {
        self.enter_nesting()?;
        let array = self
            .doc
            .push_value(Payload::Array { first: None, len: 0 }, parent);
        self.advance()?; // consume '['

        if self.current.kind == TokenKind::RightBracket {
            self.advance()?;
            self.leave_nesting();
            return Ok(array);
        }

        loop {
            let value = self.parse_value(Some(array))?;
            self.doc.prepend_element(array, value);

            match self.current.kind {
                TokenKind::Comma => self.advance()?, // next iteration expects a value
                TokenKind::RightBracket => {
                    self.advance()?;
                    break;
                }
                _ => {
                    return Err(JsonError::UnexpectedToken {
                        line: self.current.line,
                        found: self.current.kind.describe(),
                    });
                }
            }
        }

        self.doc.reverse_elements(array);
        self.leave_nesting();
        Ok(array)
    }

    /// Steps one nesting level deeper, enforcing the depth limit.
    fn enter_nesting(&mut self) -> Result<(), JsonError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(JsonError::DepthExceeded {
                line: self.current.line,
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    /// Steps back out of a nesting level.
    fn leave_nesting(&mut self) {
        self.depth -= 1;
    }
}

/// Decimal-only string-to-double conversion.
///
/// Handles exactly what the scanner produces: optional sign, digit run,
/// optional fraction. No exponents, mirroring the scanner restriction.
fn decimal_to_double(text: &str) -> f64 {
    let bytes = text.as_bytes();
    let mut pos = 0;

    let negative = bytes.first() == Some(&b'-');
    if negative {
        pos = 1;
    }

    let mut value = 0.0_f64;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        value = value * 10.0 + f64::from(bytes[pos] - b'0');
        pos += 1;
    }

    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        let mut scale = 0.1_f64;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            value += f64::from(bytes[pos] - b'0') * scale;
            scale *= 0.1;
            pos += 1;
        }
    }

    if negative {
        -value
    } else {
        value
    }
}
