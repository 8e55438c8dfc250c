use core::fmt;

use thiserror::Error;

use crate::{lexer::SourceError, token::Position, token::TokenKind};

/// Failure of a transcode, with the JSON location it happened at.
///
/// `E` is the error type of the event sink.
#[derive(Error, Debug)]
#[error("{kind} at {location}")]
pub struct ConversionError<E> {
    pub kind: ErrorKind<E>,
    pub location: Location,
}

impl<E> ConversionError<E> {
    pub(crate) fn new(kind: ErrorKind<E>, location: Location) -> Self {
        Self { kind, location }
    }

    #[must_use]
    pub fn kind(&self) -> &ErrorKind<E> {
        &self.kind
    }

    /// The position, if the token source reported one.
    #[must_use]
    pub fn position(&self) -> Option<&Position> {
        match &self.location {
            Location::At(position) => Some(position),
            Location::Unknown => None,
        }
    }

    pub fn into_kind(self) -> ErrorKind<E> {
        self.kind
    }
}

#[derive(Error, Debug)]
pub enum ErrorKind<E> {
    /// The token stream does not fit the grammar at this point.
    #[error("unexpected {found}, expected {expected}")]
    UnexpectedToken {
        found: TokenKind,
        expected: &'static str,
    },
    /// The top level produced more than one element and there is no
    /// artificial root.
    #[error("document would have {count} root elements; configure an artificial root")]
    MultipleRoots { count: usize },
    /// The token source failed to read or tokenize its input. The error's
    /// own position becomes the [`Location`].
    #[error("cannot read JSON: {}", .0.kind())]
    SourceRead(#[source] SourceError),
    #[error("nesting deeper than {limit} levels")]
    DepthLimitExceeded { limit: usize },
    /// The event sink failed.
    #[error("event sink failed: {0}")]
    Sink(#[source] E),
}

/// Where in the JSON input an error happened.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Location {
    #[default]
    Unknown,
    At(Position),
}

impl From<Option<Position>> for Location {
    fn from(position: Option<Position>) -> Self {
        position.map_or(Location::Unknown, Location::At)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Unknown => f.write_str("unknown location"),
            Location::At(position) => position.fmt(f),
        }
    }
}

/// Facade configuration error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("unsupported feature {0:?}")]
    UnsupportedFeature(alloc::string::String),
    #[error("unsupported property {0:?}")]
    UnsupportedProperty(alloc::string::String),
}
