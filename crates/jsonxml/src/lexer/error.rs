use thiserror::Error;

use crate::token::Position;

/// Failure to read or tokenize JSON input.
#[derive(Error, Debug)]
#[error("{source} at {line}:{column}")]
pub struct SourceError {
    pub(crate) source: ErrorSource,
    pub line: usize,
    pub column: usize,
}

impl SourceError {
    pub fn new(source: impl Into<ErrorSource>, line: usize, column: usize) -> Self {
        Self {
            source: source.into(),
            line,
            column,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &ErrorSource {
        &self.source
    }

    /// The syntax error, if this is one.
    #[must_use]
    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        match &self.source {
            ErrorSource::Syntax(err) => Some(err),
            #[cfg(feature = "std")]
            ErrorSource::Io(_) => None,
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

#[derive(Error, Debug)]
pub enum ErrorSource {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[cfg(feature = "std")]
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),
    #[error("invalid unicode escape character {0:?}")]
    InvalidUnicodeEscapeChar(char),
    #[error("invalid unicode escape sequence \\u{0:04X}")]
    InvalidUnicodeEscapeSequence(u32),
    #[error("invalid UTF-8 in input")]
    InvalidUtf8,
    #[error("{0}")]
    Syntax(&'static str),
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}
