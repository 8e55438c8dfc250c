//! Pull-based JSON tokenizer.
//!
//! [`JsonLexer`] reads characters from a [`CharSource`] and hands out one
//! [`Token`] per call to [`TokenSource::next_token`]. It validates the JSON
//! grammar as it goes (separators, nesting, literal spelling), so a
//! transcoder driven by it only ever sees well-formed token streams.
//!
//! Memory use is bounded by the nesting depth (one frame per open container)
//! plus the longest single string or number.
//!
//! # Examples
//!
//! ```rust
//! use jsonxml::{JsonLexer, LexerOptions, Scalar, Token, TokenSource};
//!
//! let mut lexer = JsonLexer::for_str(r#"{"n": 3.5}"#, LexerOptions::default());
//! assert_eq!(lexer.next_token().unwrap(), Token::ObjectStart);
//! assert_eq!(lexer.next_token().unwrap(), Token::FieldName("n".into()));
//! assert_eq!(lexer.next_token().unwrap(), Token::Scalar(Scalar::float("3.5")));
//! assert_eq!(lexer.next_token().unwrap(), Token::ObjectEnd);
//! assert_eq!(lexer.next_token().unwrap(), Token::Eof);
//! ```
#![allow(clippy::enum_glob_use)]

mod error;
mod escape_buffer;
mod literal_buffer;
mod options;
mod source;

use alloc::{string::String, sync::Arc, vec::Vec};

pub use error::{ErrorSource, SourceError, SyntaxError};
use escape_buffer::{UnicodeEscapeBuffer, combine_surrogates};
use literal_buffer::{ExpectedLiteralBuffer, Step};
pub use options::LexerOptions;
#[cfg(feature = "std")]
pub use source::ReadSource;
pub use source::{CharSource, StrSource};

use crate::token::{Position, ScalarKind, Token, TokenSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Represents a peeked character from the input.
enum PeekedChar {
    Char(char),
    /// End of input, the input stream is closed.
    EndOfInput,
}

use PeekedChar::*;

// ------------------------------------------------------------------------------------------------
// State machines
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    /// `first` is set directly after `{`, where `}` may close the object.
    BeforePropertyName {
        first: bool,
    },
    AfterPropertyName,
    BeforePropertyValue,
    /// `first` is set directly after `[`, where `]` may close the array.
    BeforeArrayValue {
        first: bool,
    },
    AfterPropertyValue,
    AfterArrayValue,
    End,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Sign,
    Zero,
    DecimalInteger,
    DecimalPoint,
    DecimalFraction,
    DecimalExponent,
    DecimalExponentSign,
    DecimalExponentInteger,
}

/// Stack entry, one per open container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Array,
    Object,
}

/// The pull-based JSON lexer.
///
/// Implements [`TokenSource`]. After the first error the lexer is poisoned and
/// only returns [`Token::Eof`].
#[derive(Debug)]
pub struct JsonLexer<S> {
    source: S,
    options: LexerOptions,
    source_name: Option<Arc<str>>,

    line: usize,
    column: usize,

    parse_state: ParseState,
    frames: Vec<Frame>,

    /// Scratch buffer for string contents.
    buffer: String,
    unicode_escape_buffer: UnicodeEscapeBuffer,
}

impl<'src> JsonLexer<StrSource<'src>> {
    /// Creates a lexer over an in-memory string.
    #[must_use]
    pub fn for_str(json: &'src str, options: LexerOptions) -> Self {
        Self::new(StrSource::new(json), options)
    }
}

#[cfg(feature = "std")]
impl<R: std::io::BufRead> JsonLexer<ReadSource<R>> {
    /// Creates a lexer decoding UTF-8 from a buffered reader.
    pub fn for_reader(reader: R, options: LexerOptions) -> Self {
        Self::new(ReadSource::new(reader), options)
    }
}

impl<S: CharSource> JsonLexer<S> {
    /// Creates a lexer reading from `source`.
    pub fn new(source: S, options: LexerOptions) -> Self {
        Self {
            source,
            options,
            source_name: None,
            line: 1,
            column: 1,
            parse_state: ParseState::Start,
            frames: Vec::with_capacity(16),
            buffer: String::new(),
            unicode_escape_buffer: UnicodeEscapeBuffer::new(),
        }
    }

    /// Attaches a name (for example a file path) reported in positions.
    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    /// The options this lexer was created with.
    #[must_use]
    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    /// Current nesting depth of open objects and arrays.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Consumes the lexer, returning the character source.
    pub fn into_inner(self) -> S {
        self.source
    }

    // ------------------------------------------------------------------------------------------------
    // Token dispatch
    // ------------------------------------------------------------------------------------------------

    fn lex(&mut self) -> Result<Token, SourceError> {
        use ParseState::*;

        if self.parse_state == Error {
            return Ok(Token::Eof);
        }

        loop {
            self.skip_whitespace()?;
            let next_char = self.peek_char()?;

            match self.parse_state {
                Error => return Ok(Token::Eof),
                Start => {
                    if next_char == EndOfInput && self.options.allow_multiple_values {
                        self.parse_state = End;
                        return Ok(Token::Eof);
                    }
                    return self.lex_value(next_char);
                }
                End => match next_char {
                    EndOfInput => return Ok(Token::Eof),
                    Char(_) if self.options.allow_multiple_values => self.parse_state = Start,
                    c => return Err(self.invalid_char(c)),
                },
                BeforePropertyName { first } => match next_char {
                    Char('}') if first => {
                        self.advance_char()?;
                        return Ok(self.pop());
                    }
                    Char('"') => {
                        self.advance_char()?;
                        let name = self.lex_string()?;
                        self.parse_state = AfterPropertyName;
                        return Ok(Token::FieldName(name));
                    }
                    Char(c) if self.options.allow_unquoted_field_names && is_name_start(c) => {
                        let name = self.lex_unquoted_name()?;
                        self.parse_state = AfterPropertyName;
                        return Ok(Token::FieldName(name));
                    }
                    c => return Err(self.invalid_char(c)),
                },
                AfterPropertyName => match next_char {
                    Char(':') => {
                        self.advance_char()?;
                        self.parse_state = BeforePropertyValue;
                    }
                    c => return Err(self.invalid_char(c)),
                },
                BeforePropertyValue => return self.lex_value(next_char),
                BeforeArrayValue { first } => match next_char {
                    Char(']') if first => {
                        self.advance_char()?;
                        return Ok(self.pop());
                    }
                    c => return self.lex_value(c),
                },
                AfterPropertyValue => match next_char {
                    Char(',') => {
                        self.advance_char()?;
                        self.parse_state = BeforePropertyName { first: false };
                    }
                    Char('}') => {
                        self.advance_char()?;
                        return Ok(self.pop());
                    }
                    c => return Err(self.invalid_char(c)),
                },
                AfterArrayValue => match next_char {
                    Char(',') => {
                        self.advance_char()?;
                        self.parse_state = BeforeArrayValue { first: false };
                    }
                    Char(']') => {
                        self.advance_char()?;
                        return Ok(self.pop());
                    }
                    c => return Err(self.invalid_char(c)),
                },
            }
        }
    }

    fn lex_value(&mut self, next_char: PeekedChar) -> Result<Token, SourceError> {
        match next_char {
            Char('{') => {
                self.advance_char()?;
                self.frames.push(Frame::Object);
                self.parse_state = ParseState::BeforePropertyName { first: true };
                Ok(Token::ObjectStart)
            }
            Char('[') => {
                self.advance_char()?;
                self.frames.push(Frame::Array);
                self.parse_state = ParseState::BeforeArrayValue { first: true };
                Ok(Token::ArrayStart)
            }
            Char('"') => {
                self.advance_char()?;
                let text = self.lex_string()?;
                Ok(self.scalar(ScalarKind::String, text))
            }
            Char(c @ ('n' | 't' | 'f')) => self.lex_literal(c),
            Char(c) if c == '-' || c.is_ascii_digit() => self.lex_number(),
            c => Err(self.invalid_char(c)),
        }
    }

    /// Finishes a value: the state now depends on the enclosing container.
    fn scalar(&mut self, kind: ScalarKind, text: String) -> Token {
        self.after_value();
        Token::Scalar(crate::token::Scalar { kind, text })
    }

    fn pop(&mut self) -> Token {
        let token = match self.frames.pop() {
            Some(Frame::Object) => Token::ObjectEnd,
            Some(Frame::Array) => Token::ArrayEnd,
            None => Token::Eof,
        };
        self.after_value();
        token
    }

    fn after_value(&mut self) {
        self.parse_state = match self.frames.last() {
            None => ParseState::End,
            Some(Frame::Array) => ParseState::AfterArrayValue,
            Some(Frame::Object) => ParseState::AfterPropertyValue,
        };
    }

    // ------------------------------------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------------------------------------

    fn lex_literal(&mut self, first: char) -> Result<Token, SourceError> {
        let mut expected = ExpectedLiteralBuffer::new(first)
            .ok_or_else(|| self.invalid_char(Char(first)))?;
        self.advance_char()?;
        loop {
            let next_char = self.peek_char()?;
            let Char(c) = next_char else {
                return Err(self.invalid_char(next_char));
            };
            match expected.step(c) {
                Step::NeedMore => self.advance_char()?,
                Step::Done(kind) => {
                    self.advance_char()?;
                    let text = match kind {
                        ScalarKind::Null => "null",
                        ScalarKind::True => "true",
                        _ => "false",
                    };
                    return Ok(self.scalar(kind, String::from(text)));
                }
                Step::Reject => return Err(self.invalid_char(next_char)),
            }
        }
    }

    fn lex_number(&mut self) -> Result<Token, SourceError> {
        use NumberState::*;

        let mut text = String::new();
        let mut state = match self.peek_char()? {
            Char('-') => Sign,
            Char('0') => Zero,
            _ => DecimalInteger,
        };
        let mut is_float = false;
        text.push(self.take_char()?);

        loop {
            let next_char = self.peek_char()?;
            let digit = matches!(next_char, Char(c) if c.is_ascii_digit());
            state = match (state, next_char) {
                (Sign, Char('0')) => Zero,
                (Sign, _) if digit => DecimalInteger,
                (Zero | DecimalInteger | DecimalFraction, Char('e' | 'E')) => DecimalExponent,
                (Zero | DecimalInteger, Char('.')) => DecimalPoint,
                (DecimalInteger, _) if digit => DecimalInteger,
                (DecimalPoint | DecimalFraction, _) if digit => DecimalFraction,
                (DecimalExponent, Char('+' | '-')) => DecimalExponentSign,
                (DecimalExponent | DecimalExponentSign | DecimalExponentInteger, _) if digit => {
                    DecimalExponentInteger
                }
                // No leading zeros.
                (Zero, c) if digit => return Err(self.invalid_char(c)),
                // Complete number; the delimiter is left for the caller.
                (Zero | DecimalInteger | DecimalFraction | DecimalExponentInteger, _) => break,
                (_, c) => return Err(self.invalid_char(c)),
            };
            is_float |= matches!(state, DecimalPoint | DecimalExponent);
            text.push(self.take_char()?);
        }

        let kind = if is_float {
            ScalarKind::Float
        } else {
            ScalarKind::Int
        };
        Ok(self.scalar(kind, text))
    }

    /// Reads string contents after the opening quote, through the closing
    /// quote.
    fn lex_string(&mut self) -> Result<String, SourceError> {
        self.buffer.clear();
        loop {
            // Fast-path: copy as many consecutive plain characters as possible.
            // The copied characters cannot contain a newline, so only the
            // column moves.
            let copied = self
                .source
                .copy_while(&mut self.buffer, |ch| {
                    ch != '\\' && ch != '"' && ch >= '\u{20}'
                })
                .map_err(|err| SourceError::new(err, self.line, self.column))?;
            self.column += copied;

            match self.peek_char()? {
                Char('"') => {
                    self.advance_char()?;
                    return Ok(core::mem::take(&mut self.buffer));
                }
                Char('\\') => {
                    self.advance_char()?;
                    self.lex_escape()?;
                }
                // JSON allows 0x20 .. 0x10FFFF unescaped.
                c => return Err(self.invalid_char(c)),
            }
        }
    }

    fn lex_escape(&mut self) -> Result<(), SourceError> {
        let next_char = self.peek_char()?;
        let decoded = match next_char {
            Char(c @ ('"' | '\\' | '/')) => c,
            Char('b') => '\u{0008}',
            Char('f') => '\u{000C}',
            Char('n') => '\n',
            Char('r') => '\r',
            Char('t') => '\t',
            Char('u') => {
                self.advance_char()?;
                let unit = self.lex_unicode_escape()?;
                let ch = match unit {
                    0xD800..=0xDBFF => {
                        // A high surrogate must be followed by an escaped low
                        // surrogate.
                        self.expect_char('\\')?;
                        self.expect_char('u')?;
                        let low = self.lex_unicode_escape()?;
                        combine_surrogates(unit, low).ok_or_else(|| {
                            self.syntax_error(SyntaxError::InvalidUnicodeEscapeSequence(
                                u32::from(low),
                            ))
                        })?
                    }
                    _ => char::from_u32(u32::from(unit)).ok_or_else(|| {
                        self.syntax_error(SyntaxError::InvalidUnicodeEscapeSequence(u32::from(
                            unit,
                        )))
                    })?,
                };
                self.buffer.push(ch);
                return Ok(());
            }
            c => return Err(self.invalid_char(c)),
        };
        self.advance_char()?;
        self.buffer.push(decoded);
        Ok(())
    }

    fn lex_unicode_escape(&mut self) -> Result<u16, SourceError> {
        self.unicode_escape_buffer.reset();
        loop {
            let next_char = self.peek_char()?;
            let Char(c) = next_char else {
                return Err(self.invalid_char(next_char));
            };
            let fed = self
                .unicode_escape_buffer
                .feed(c)
                .map_err(|err| self.syntax_error(err))?;
            self.advance_char()?;
            if let Some(unit) = fed {
                return Ok(unit);
            }
        }
    }

    fn lex_unquoted_name(&mut self) -> Result<String, SourceError> {
        self.buffer.clear();
        let copied = self
            .source
            .copy_while(&mut self.buffer, is_name_part)
            .map_err(|err| SourceError::new(err, self.line, self.column))?;
        self.column += copied;
        Ok(core::mem::take(&mut self.buffer))
    }

    // ------------------------------------------------------------------------------------------------
    // Characters
    // ------------------------------------------------------------------------------------------------

    fn skip_whitespace(&mut self) -> Result<(), SourceError> {
        loop {
            match self.peek_char()? {
                Char('\t' | '\n' | '\r' | ' ') => self.advance_char()?,
                Char(c)
                    if self.options.allow_unicode_whitespace
                        && (c.is_whitespace() || c == '\u{FEFF}') =>
                {
                    self.advance_char()?;
                }
                Char('/') if self.options.allow_comments => self.skip_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_comment(&mut self) -> Result<(), SourceError> {
        self.advance_char()?;
        match self.peek_char()? {
            Char('/') => loop {
                match self.take_char_or_eof()? {
                    None | Some('\n') => return Ok(()),
                    Some(_) => {}
                }
            },
            Char('*') => {
                self.advance_char()?;
                let mut star = false;
                loop {
                    match self.take_char_or_eof()? {
                        None => return Err(self.syntax_error(SyntaxError::UnexpectedEndOfInput)),
                        Some('/') if star => return Ok(()),
                        Some(c) => star = c == '*',
                    }
                }
            }
            c => Err(self.invalid_char(c)),
        }
    }

    fn peek_char(&mut self) -> Result<PeekedChar, SourceError> {
        match self.source.peek() {
            Ok(Some(ch)) => Ok(Char(ch)),
            Ok(None) => Ok(EndOfInput),
            Err(err) => Err(SourceError::new(err, self.line, self.column)),
        }
    }

    fn take_char_or_eof(&mut self) -> Result<Option<char>, SourceError> {
        let ch = self
            .source
            .bump()
            .map_err(|err| SourceError::new(err, self.line, self.column))?;
        match ch {
            Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            Some(_) => self.column += 1,
            None => {}
        }
        Ok(ch)
    }

    fn take_char(&mut self) -> Result<char, SourceError> {
        self.take_char_or_eof()?
            .ok_or_else(|| self.syntax_error(SyntaxError::UnexpectedEndOfInput))
    }

    #[inline]
    fn advance_char(&mut self) -> Result<(), SourceError> {
        self.take_char_or_eof().map(|_| ())
    }

    fn expect_char(&mut self, expected: char) -> Result<(), SourceError> {
        match self.peek_char()? {
            Char(c) if c == expected => self.advance_char(),
            c => Err(self.invalid_char(c)),
        }
    }

    // ------------------------------------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------------------------------------

    fn invalid_char(&self, c: PeekedChar) -> SourceError {
        match c {
            EndOfInput => self.syntax_error(SyntaxError::UnexpectedEndOfInput),
            Char(c) => self.syntax_error(SyntaxError::InvalidCharacter(c)),
        }
    }

    fn syntax_error(&self, err: SyntaxError) -> SourceError {
        SourceError::new(err, self.line, self.column)
    }
}

impl<S: CharSource> TokenSource for JsonLexer<S> {
    fn next_token(&mut self) -> Result<Token, SourceError> {
        match self.lex() {
            Ok(token) => Ok(token),
            Err(err) => {
                self.parse_state = ParseState::Error;
                Err(err)
            }
        }
    }

    fn position(&self) -> Option<Position> {
        Some(Position::new(self.line, self.column).with_source(self.source_name.clone()))
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_name_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
