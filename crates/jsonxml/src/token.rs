//! Tokens pulled from a JSON source and the [`TokenSource`] contract.
//!
//! A `Token` is one lexical unit of the JSON input: a structural marker, a
//! field name, or a scalar value together with its lexical kind. The
//! transcoder only ever looks at one token at a time.
//!
//! # Examples
//!
//! Replaying a recorded token stream:
//!
//! ```
//! use jsonxml::{Scalar, Token, TokenReplay, TokenSource};
//!
//! let mut source = TokenReplay::new(vec![
//!     Token::ObjectStart,
//!     Token::FieldName("a".into()),
//!     Token::Scalar(Scalar::int("1")),
//!     Token::ObjectEnd,
//! ]);
//! assert_eq!(source.next_token().unwrap(), Token::ObjectStart);
//! ```
use alloc::{string::String, sync::Arc};
use core::fmt;

use crate::lexer::SourceError;

/// Lexical classification of a scalar value.
///
/// The classification is whatever the source decided while lexing: a number
/// written as `1.0` is a [`ScalarKind::Float`] even though its value is
/// integral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub enum ScalarKind {
    Int,
    Float,
    True,
    False,
    String,
    Null,
}

impl ScalarKind {
    /// The advisory `type` attribute value for this kind.
    #[must_use]
    pub fn type_name(self) -> &'static str {
        match self {
            ScalarKind::Int => "int",
            ScalarKind::Float => "float",
            ScalarKind::True | ScalarKind::False => "boolean",
            ScalarKind::String => "string",
            ScalarKind::Null => "null",
        }
    }
}

/// A scalar value: its kind and its canonical text.
///
/// For strings `text` is the decoded string, for numbers it is the literal
/// source text (no reformatting), and for literals it is `true`, `false` or
/// `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub struct Scalar {
    pub kind: ScalarKind,
    pub text: String,
}

impl Scalar {
    #[must_use]
    pub fn new(kind: ScalarKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn int(text: impl Into<String>) -> Self {
        Self::new(ScalarKind::Int, text)
    }

    #[must_use]
    pub fn float(text: impl Into<String>) -> Self {
        Self::new(ScalarKind::Float, text)
    }

    #[must_use]
    pub fn string(text: impl Into<String>) -> Self {
        Self::new(ScalarKind::String, text)
    }

    #[must_use]
    pub fn boolean(value: bool) -> Self {
        if value {
            Self::new(ScalarKind::True, "true")
        } else {
            Self::new(ScalarKind::False, "false")
        }
    }

    #[must_use]
    pub fn null() -> Self {
        Self::new(ScalarKind::Null, "null")
    }
}

/// One lexical unit of JSON input.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub enum Token {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    FieldName(String),
    Scalar(Scalar),
    /// End of the token stream.
    Eof,
}

impl Token {
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::ObjectStart => TokenKind::ObjectStart,
            Token::ObjectEnd => TokenKind::ObjectEnd,
            Token::ArrayStart => TokenKind::ArrayStart,
            Token::ArrayEnd => TokenKind::ArrayEnd,
            Token::FieldName(_) => TokenKind::FieldName,
            Token::Scalar(scalar) => TokenKind::Scalar(scalar.kind),
            Token::Eof => TokenKind::Eof,
        }
    }

    /// Returns `true` if the token is [`Token::Eof`].
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// The advisory `type` attribute for an element opened while this token
    /// is current, if any.
    ///
    /// Objects, field names and end markers carry no type.
    #[must_use]
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Token::Scalar(scalar) => Some(scalar.kind.type_name()),
            Token::ArrayStart => Some("array"),
            _ => None,
        }
    }
}

/// Payload-free discriminant of a [`Token`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    FieldName,
    Scalar(ScalarKind),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::ObjectStart => f.write_str("'{'"),
            TokenKind::ObjectEnd => f.write_str("'}'"),
            TokenKind::ArrayStart => f.write_str("'['"),
            TokenKind::ArrayEnd => f.write_str("']'"),
            TokenKind::FieldName => f.write_str("field name"),
            TokenKind::Scalar(kind) => write!(f, "{} value", kind.type_name()),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

/// A location in the JSON input. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    /// Opaque reference to the input, such as a file name.
    pub source: Option<Arc<str>>,
}

impl Position {
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Option<Arc<str>>) -> Self {
        self.source = source;
        self
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{source}:{}:{}", self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}

/// A forward-only stream of JSON tokens.
///
/// Sources are pulled by the transcoder one token at a time. Once a source has
/// returned [`Token::Eof`] it should keep returning it.
pub trait TokenSource {
    /// Advance to and return the next token.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the underlying input cannot be read or is
    /// not valid JSON.
    fn next_token(&mut self) -> Result<Token, SourceError>;

    /// Where the source currently is, if it tracks positions.
    fn position(&self) -> Option<Position> {
        None
    }
}

impl<T: TokenSource + ?Sized> TokenSource for &mut T {
    fn next_token(&mut self) -> Result<Token, SourceError> {
        (**self).next_token()
    }

    fn position(&self) -> Option<Position> {
        (**self).position()
    }
}

/// A [`TokenSource`] replaying tokens from an iterator.
///
/// Returns [`Token::Eof`] once the iterator is exhausted. Replayed streams are
/// not validated, which makes this useful for driving the transcoder with
/// token sequences a real lexer would reject.
#[derive(Debug, Clone)]
pub struct TokenReplay<I> {
    tokens: I,
    index: usize,
}

impl<I: Iterator<Item = Token>> TokenReplay<I> {
    pub fn new(tokens: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            index: 0,
        }
    }
}

impl<I: Iterator<Item = Token>> TokenSource for TokenReplay<I> {
    fn next_token(&mut self) -> Result<Token, SourceError> {
        match self.tokens.next() {
            Some(token) => {
                self.index += 1;
                Ok(token)
            }
            None => Ok(Token::Eof),
        }
    }

    /// Replayed tokens are located by index: line 1, column = token number.
    fn position(&self) -> Option<Position> {
        Some(Position::new(1, self.index))
    }
}
