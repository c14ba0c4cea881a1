//! # JSON Scanner
//!
//! Single-pass tokenizer with line/column tracking for diagnostics.
//!
//! Two deliberate restrictions of the engine's data format live here and
//! are preserved, not "fixed":
//! - String escape sequences are **not decoded**. A string token is the
//!   raw byte slice between the quotes, backslashes included.
//! - Numbers are plain decimals: optional `-`, digit run, optional `.`
//!   plus digit run. No exponents.

use crate::error::JsonError;

/// The kind of a scanned token.
///
/// String and number tokens borrow their text from the source buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TokenKind<'src> {
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// The literal `true`.
    True,
    /// The literal `false`.
    False,
    /// The literal `null`.
    Null,
    /// A string: the raw bytes between the quotes, escapes not decoded.
    String(&'src str),
    /// A number: the decimal text, converted to a double by the parser.
    Number(&'src str),
    /// End of input.
    Eof,
}

impl TokenKind<'_> {
    /// Human description of the token for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::LeftBrace => "'{'".to_string(),
            Self::RightBrace => "'}'".to_string(),
            Self::LeftBracket => "'['".to_string(),
            Self::RightBracket => "']'".to_string(),
            Self::Colon => "':'".to_string(),
            Self::Comma => "','".to_string(),
            Self::True => "'true'".to_string(),
            Self::False => "'false'".to_string(),
            Self::Null => "'null'".to_string(),
            Self::String(text) => format!("string \"{text}\""),
            Self::Number(text) => format!("number {text}"),
            Self::Eof => "end of input".to_string(),
        }
    }
}

/// A scanned token with its source position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token<'src> {
    /// What was scanned.
    pub kind: TokenKind<'src>,
    /// 1-based line of the token's first character.
    pub line: u32,
    /// 1-based column of the token's first character.
    pub column: u32,
}

/// Single-pass JSON tokenizer.
///
/// The parser keeps one token of lookahead by holding the most recent
/// [`Token`] and calling [`next_token`](Self::next_token) to advance.
///
/// # Example
///
/// ```rust,ignore
/// let mut scanner = Scanner::new("[1, 2]");
/// let token = scanner.next_token()?;
/// assert_eq!(token.kind, TokenKind::LeftBracket);
/// ```
pub struct Scanner<'src> {
    /// The full source text.
    source: &'src str,
    /// Byte offset of the next unread character.
    pos: usize,
    /// 1-based line, incremented on LF.
    line: u32,
    /// 1-based column, reset on LF.
    column: u32,
}

impl<'src> Scanner<'src> {
    /// Creates a scanner positioned at the start of `source`.
    #[must_use]
    pub const fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scans the next token, skipping leading whitespace.
    ///
    /// # Errors
    ///
    /// [`JsonError::UnexpectedCharacter`] for a byte that starts no token,
    /// [`JsonError::UnterminatedString`] for a string without a closing
    /// quote, [`JsonError::UnknownIdentifier`] for a bare word that is not
    /// `true`/`false`/`null`.
    pub fn next_token(&mut self) -> Result<Token<'src>, JsonError> {
        self.skip_whitespace();

        let line = self.line;
        let column = self.column;

        let Some(byte) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                line,
                column,
            });
        };

        let kind = match byte {
            b'{' => self.punct(TokenKind::LeftBrace),
            b'}' => self.punct(TokenKind::RightBrace),
            b'[' => self.punct(TokenKind::LeftBracket),
            b']' => self.punct(TokenKind::RightBracket),
            b':' => self.punct(TokenKind::Colon),
            b',' => self.punct(TokenKind::Comma),
            b'"' => self.scan_string()?,
            b'-' | b'0'..=b'9' => self.scan_number()?,
            b if b.is_ascii_alphabetic() => self.scan_identifier()?,
            _ => {
                let found = self.source[self.pos..].chars().next().unwrap_or('\u{fffd}');
                return Err(JsonError::UnexpectedCharacter { line, found });
            }
        };

        Ok(Token { kind, line, column })
    }

    /// Next unread byte, if any.
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.pos).copied()
    }

    /// Consumes one byte on the current line.
    #[inline]
    fn advance(&mut self) {
        self.pos += 1;
        self.column += 1;
    }

    /// Consumes a single-byte punctuation token.
    #[inline]
    fn punct(&mut self, kind: TokenKind<'src>) -> TokenKind<'src> {
        self.advance();
        kind
    }

    /// Skips spaces, tabs, CR and LF. LF bumps the line counter and resets
    /// the column.
    fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek() {
            match byte {
                b' ' | b'\t' | b'\r' => self.advance(),
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.column = 1;
                }
                _ => return,
            }
        }
    }

    /// Scans a string token. The slice excludes the quotes and keeps any
    /// backslash sequences exactly as written.
    fn scan_string(&mut self) -> Result<TokenKind<'src>, JsonError> {
        let open_line = self.line;
        self.advance(); // opening quote
        let start = self.pos;

        loop {
            match self.peek() {
                None => return Err(JsonError::UnterminatedString { line: open_line }),
                Some(b'"') => {
                    let text = &self.source[start..self.pos];
                    self.advance(); // closing quote
                    return Ok(TokenKind::String(text));
                }
                Some(b'\n') => {
                    self.pos += 1;
                    self.line += 1;
                    self.column = 1;
                }
                Some(_) => self.advance(),
            }
        }
    }

    /// Scans a number token: optional `-`, digits, optional `.` + digits.
    fn scan_number(&mut self) -> Result<TokenKind<'src>, JsonError> {
        let start = self.pos;

        if self.peek() == Some(b'-') {
            self.advance();
            if !self.peek().is_some_and(|b| b.is_ascii_digit()) {
                return Err(JsonError::UnexpectedCharacter {
                    line: self.line,
                    found: '-',
                });
            }
        }
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some(b'.') {
            self.advance();
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.advance();
            }
        }

        Ok(TokenKind::Number(&self.source[start..self.pos]))
    }

    /// Scans a run of letters and matches it against the three literals.
    fn scan_identifier(&mut self) -> Result<TokenKind<'src>, JsonError> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.advance();
        }
        let word = &self.source[start..self.pos];

        match word {
            "true" => Ok(TokenKind::True),
            "false" => Ok(TokenKind::False),
            "null" => Ok(TokenKind::Null),
            _ => Err(JsonError::UnknownIdentifier {
                line: self.line,
                word: word.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind<'_>> {
        let mut scanner = Scanner::new(source);
        let mut out = Vec::new();
        loop {
            let token = scanner.next_token().expect("scan error");
            let done = token.kind == TokenKind::Eof;
            out.push(token.kind);
            if done {
                return out;
            }
        }
    }

    #[test]
    fn test_scans_simple_object() {
        assert_eq!(
            kinds(r#"{"a": 1}"#),
            vec![
                TokenKind::LeftBrace,
                TokenKind::String("a"),
                TokenKind::Colon,
                TokenKind::Number("1"),
                TokenKind::RightBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_scans_literals_and_numbers() {
        assert_eq!(
            kinds("[true, false, null, -3.25, 0.5]"),
            vec![
                TokenKind::LeftBracket,
                TokenKind::True,
                TokenKind::Comma,
                TokenKind::False,
                TokenKind::Comma,
                TokenKind::Null,
                TokenKind::Comma,
                TokenKind::Number("-3.25"),
                TokenKind::Comma,
                TokenKind::Number("0.5"),
                TokenKind::RightBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lf_advances_line_and_resets_column() {
        let mut scanner = Scanner::new("{\n  \"a\": 1\n}");
        assert_eq!(scanner.next_token().unwrap().line, 1);
        let key = scanner.next_token().unwrap();
        assert_eq!(key.line, 2);
        assert_eq!(key.column, 3);
        let colon = scanner.next_token().unwrap();
        let one = scanner.next_token().unwrap();
        assert_eq!((colon.line, one.line), (2, 2));
        assert_eq!(scanner.next_token().unwrap().line, 3);
    }

    #[test]
    fn test_escapes_are_not_decoded() {
        // Raw input is "a\nb" - four bytes between quotes, backslash kept
        let mut scanner = Scanner::new("\"a\\nb\"");
        assert_eq!(
            scanner.next_token().unwrap().kind,
            TokenKind::String("a\\nb")
        );
    }

    #[test]
    fn test_unterminated_string_reports_opening_line() {
        let mut scanner = Scanner::new("\n\"never closed");
        assert_eq!(
            scanner.next_token(),
            Err(JsonError::UnterminatedString { line: 2 })
        );
    }

    #[test]
    fn test_unknown_identifier_is_an_error() {
        let mut scanner = Scanner::new("nil");
        assert_eq!(
            scanner.next_token(),
            Err(JsonError::UnknownIdentifier {
                line: 1,
                word: "nil".to_string(),
            })
        );
    }

    #[test]
    fn test_unexpected_character_is_an_error() {
        let mut scanner = Scanner::new("  @");
        assert_eq!(
            scanner.next_token(),
            Err(JsonError::UnexpectedCharacter { line: 1, found: '@' })
        );
    }

    #[test]
    fn test_bare_minus_is_an_error() {
        let mut scanner = Scanner::new("-x");
        assert!(matches!(
            scanner.next_token(),
            Err(JsonError::UnexpectedCharacter { found: '-', .. })
        ));
    }

    #[test]
    fn test_exponent_form_is_rejected() {
        // "1e10" scans as number 1 then the unknown identifier "e"
        let mut scanner = Scanner::new("1e10");
        assert_eq!(scanner.next_token().unwrap().kind, TokenKind::Number("1"));
        assert!(matches!(
            scanner.next_token(),
            Err(JsonError::UnknownIdentifier { .. })
        ));
    }
}
