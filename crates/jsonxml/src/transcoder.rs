//! The token to event transcoding engine.
//!
//! The engine pulls one token at a time from a [`TokenSource`] and pushes XML
//! events to an [`EventSink`]. It is a recursive descent over the token
//! stream with three mutually recursive steps:
//!
//! - a *container* step for the body of an object (or of a top-level array),
//!   turning every field into an element;
//! - an *element* step deciding whether a value gets a wrapping element named
//!   after its field, and dispatching on the value;
//! - an *array* step re-entering the element step for each item with the
//!   array's own field name.
//!
//! Nothing is buffered beyond the current token. Every element start is
//! matched by an element end before the step that opened it returns.
use alloc::{vec, vec::Vec};

use log::{debug, trace};

use crate::{
    error::{ConversionError, ErrorKind, Location},
    event::{Attribute, EventSink},
    lexer::SourceError,
    options::TranscodeOptions,
    token::{Position, Scalar, ScalarKind, Token, TokenKind, TokenSource},
};

/// Element name for scalars inside an array that has no field name.
const ITEM_ELEMENT: &str = "item";

const TYPE_ATTRIBUTE: &str = "type";

type Result<T, E> = core::result::Result<T, ConversionError<E>>;

/// Explicit read position in the token stream.
///
/// Owns the nesting bookkeeping so the recursion depth is bounded by
/// configuration rather than by the native stack.
struct Cursor<S> {
    source: S,
    depth: usize,
    max_depth: usize,
}

impl<S: TokenSource> Cursor<S> {
    fn new(source: S, max_depth: usize) -> Self {
        Self {
            source,
            depth: 0,
            max_depth,
        }
    }

    fn next(&mut self) -> core::result::Result<Token, SourceError> {
        self.source.next_token()
    }

    /// Returns `false` if the container would be nested too deeply.
    #[must_use]
    fn enter(&mut self) -> bool {
        if self.depth >= self.max_depth {
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn position(&self) -> Option<Position> {
        self.source.position()
    }
}

struct Engine<'o, S, K> {
    cursor: Cursor<S>,
    sink: K,
    options: &'o TranscodeOptions,
    #[cfg(any(test, feature = "fuzzing"))]
    open: usize,
}

impl<S: TokenSource, K: EventSink> Engine<'_, S, K> {
    fn run(&mut self) -> Result<(), K::Error> {
        let first = self.advance()?;

        self.sync_position();
        self.sink.document_start().map_err(|e| self.sink_error(e))?;

        let options = self.options;
        let count = match options.root() {
            Some(root) => {
                let attributes = self.type_attributes(&first);
                self.start(root, &attributes)?;
                self.parse_document(first)?;
                self.end(root)?;
                1
            }
            None => self.parse_document(first)?,
        };

        if count > 1 {
            return Err(self.error(ErrorKind::MultipleRoots { count }));
        }

        #[cfg(any(test, feature = "fuzzing"))]
        assert_eq!(self.open, 0, "Internal error: unbalanced elements");

        self.sync_position();
        self.sink.document_end().map_err(|e| self.sink_error(e))?;
        Ok(())
    }

    /// Top level: every value until the end of the stream. A top-level array
    /// is read like an object body in array context; top-level scalars
    /// become items.
    fn parse_document(&mut self, first: Token) -> Result<usize, K::Error> {
        let mut count = 0;
        let mut token = first;
        loop {
            match token {
                Token::Eof => return Ok(count),
                Token::ObjectStart => {
                    self.enter()?;
                    count += self.parse_container(false)?;
                    self.cursor.leave();
                }
                Token::ArrayStart => {
                    self.enter()?;
                    count += self.parse_container(true)?;
                    self.cursor.leave();
                }
                Token::Scalar(scalar) => {
                    self.write_item(&scalar)?;
                    count += 1;
                }
                other => return Err(self.unexpected(other.kind(), "a JSON value")),
            }
            token = self.advance()?;
        }
    }

    /// Body of an object, or of an array reached without a field name.
    /// Returns the number of fields and items read at this level. A
    /// flattened array field counts once.
    fn parse_container(&mut self, in_array: bool) -> Result<usize, K::Error> {
        let mut count = 0;
        loop {
            match self.advance()? {
                Token::FieldName(name) => {
                    let value = self.advance()?;
                    self.parse_element(&name, value)?;
                    count += 1;
                }
                Token::Scalar(scalar) if in_array => {
                    self.write_item(&scalar)?;
                    count += 1;
                }
                Token::ArrayEnd if in_array => return Ok(count),
                Token::ObjectEnd if !in_array => return Ok(count),
                Token::Eof => return Ok(count),
                other => {
                    let expected = if in_array {
                        "a scalar or ']'"
                    } else {
                        "a field name or '}'"
                    };
                    return Err(self.unexpected(other.kind(), expected));
                }
            }
        }
    }

    /// Emits the XML for one field value.
    fn parse_element(&mut self, name: &str, token: Token) -> Result<(), K::Error> {
        if !matches!(
            token,
            Token::ObjectStart | Token::ArrayStart | Token::Scalar(_)
        ) {
            return Err(self.unexpected(token.kind(), "a field value"));
        }
        let is_array = matches!(token, Token::ArrayStart);
        let wrap = !is_array || self.options.wrap_arrays;

        if wrap {
            let attributes = self.type_attributes(&token);
            self.start(name, &attributes)?;
        }

        match token {
            Token::ObjectStart => {
                self.enter()?;
                self.parse_container(false)?;
                self.cursor.leave();
            }
            Token::ArrayStart => {
                self.enter()?;
                self.parse_array(name)?;
                self.cursor.leave();
            }
            Token::Scalar(scalar) => self.write_value(&scalar)?,
            _ => {}
        }

        if wrap {
            self.end(name)?;
        }
        Ok(())
    }

    /// Items of an array valued field, each named after the field.
    fn parse_array(&mut self, name: &str) -> Result<(), K::Error> {
        loop {
            match self.advance()? {
                Token::ArrayEnd | Token::Eof => return Ok(()),
                item => self.parse_element(name, item)?,
            }
        }
    }

    fn write_item(&mut self, scalar: &Scalar) -> Result<(), K::Error> {
        let attributes = self.scalar_attributes(scalar);
        self.start(ITEM_ELEMENT, &attributes)?;
        self.write_value(scalar)?;
        self.end(ITEM_ELEMENT)
    }

    /// Null has no character data.
    fn write_value(&mut self, scalar: &Scalar) -> Result<(), K::Error> {
        if scalar.kind == ScalarKind::Null {
            return Ok(());
        }
        self.sync_position();
        trace!("characters {:?}", scalar.text);
        self.sink
            .characters(&scalar.text)
            .map_err(|e| self.sink_error(e))
    }

    // ------------------------------------------------------------------------------------------------
    // Sink helpers
    // ------------------------------------------------------------------------------------------------

    fn start(&mut self, name: &str, attributes: &[Attribute]) -> Result<(), K::Error> {
        self.sync_position();
        trace!("element start {name}");
        #[cfg(any(test, feature = "fuzzing"))]
        {
            self.open += 1;
        }
        self.sink
            .element_start(self.options.namespace(), name, attributes)
            .map_err(|e| self.sink_error(e))
    }

    fn end(&mut self, name: &str) -> Result<(), K::Error> {
        self.sync_position();
        trace!("element end {name}");
        #[cfg(any(test, feature = "fuzzing"))]
        {
            self.open -= 1;
        }
        self.sink
            .element_end(self.options.namespace(), name)
            .map_err(|e| self.sink_error(e))
    }

    fn sync_position(&mut self) {
        if let Some(position) = self.cursor.position() {
            self.sink.position_changed(&position);
        }
    }

    fn type_attributes(&self, token: &Token) -> Vec<Attribute> {
        match token.type_name() {
            Some(type_name) if self.options.add_type_attributes => {
                vec![Attribute::new(TYPE_ATTRIBUTE, type_name)]
            }
            _ => Vec::new(),
        }
    }

    fn scalar_attributes(&self, scalar: &Scalar) -> Vec<Attribute> {
        if self.options.add_type_attributes {
            vec![Attribute::new(TYPE_ATTRIBUTE, scalar.kind.type_name())]
        } else {
            Vec::new()
        }
    }

    // ------------------------------------------------------------------------------------------------
    // Cursor helpers
    // ------------------------------------------------------------------------------------------------

    fn advance(&mut self) -> Result<Token, K::Error> {
        self.cursor.next().map_err(|err| self.read_error(err))
    }

    fn enter(&mut self) -> Result<(), K::Error> {
        if self.cursor.enter() {
            Ok(())
        } else {
            Err(self.error(ErrorKind::DepthLimitExceeded {
                limit: self.cursor.max_depth,
            }))
        }
    }

    fn error(&self, kind: ErrorKind<K::Error>) -> ConversionError<K::Error> {
        ConversionError::new(kind, self.cursor.position().into())
    }

    /// Source errors carry their own line and column; the source name comes
    /// from the current position.
    fn read_error(&self, err: SourceError) -> ConversionError<K::Error> {
        let position = err
            .position()
            .with_source(self.cursor.position().and_then(|p| p.source));
        ConversionError::new(ErrorKind::SourceRead(err), Location::At(position))
    }

    fn unexpected(&self, found: TokenKind, expected: &'static str) -> ConversionError<K::Error> {
        self.error(ErrorKind::UnexpectedToken { found, expected })
    }

    fn sink_error(&self, err: K::Error) -> ConversionError<K::Error> {
        self.error(ErrorKind::Sink(err))
    }
}

/// Transcodes the tokens of `source` into events on `sink`.
///
/// Events already pushed when an error occurs are not retracted; discarding
/// partial output is up to the caller.
///
/// # Errors
///
/// - [`ErrorKind::UnexpectedToken`] if the token stream does not fit the
///   mapping, notably a top-level array containing objects or arrays.
/// - [`ErrorKind::MultipleRoots`] if the top level holds more than one field
///   or value and no artificial root is configured. A flattened array field
///   counts once.
/// - [`ErrorKind::SourceRead`] if the source fails.
/// - [`ErrorKind::DepthLimitExceeded`] past
///   [`TranscodeOptions::max_depth`].
/// - [`ErrorKind::Sink`] if the sink fails.
///
/// # Examples
///
/// ```
/// use jsonxml::{JsonLexer, LexerOptions, TranscodeOptions, XmlEvent, transcode};
///
/// let mut lexer = JsonLexer::for_str(r#"{"a": [1, 2]}"#, LexerOptions::default());
/// let mut events: Vec<XmlEvent> = Vec::new();
/// let options = TranscodeOptions {
///     artificial_root: Some("root".into()),
///     ..Default::default()
/// };
/// transcode(&mut lexer, &mut events, &options).unwrap();
/// assert_eq!(events.iter().filter(|e| e.is_element_start()).count(), 3);
/// ```
pub fn transcode<S, K>(
    source: S,
    sink: K,
    options: &TranscodeOptions,
) -> core::result::Result<(), ConversionError<K::Error>>
where
    S: TokenSource,
    K: EventSink,
{
    let mut engine = Engine {
        cursor: Cursor::new(source, options.max_depth),
        sink,
        options,
        #[cfg(any(test, feature = "fuzzing"))]
        open: 0,
    };
    debug!(
        "transcode start (root: {:?}, wrap arrays: {}, type attributes: {})",
        options.root(),
        options.wrap_arrays,
        options.add_type_attributes
    );
    match engine.run() {
        Ok(()) => {
            debug!("transcode finished");
            Ok(())
        }
        Err(err) => {
            debug!("transcode failed: {err}");
            Err(err)
        }
    }
}

/// A reusable transcoder with fixed options.
///
/// # Examples
///
/// ```
/// use jsonxml::{JsonLexer, LexerOptions, TranscodeOptions, Transcoder, XmlEvent};
///
/// let transcoder = Transcoder::new(TranscodeOptions::default());
/// for json in [r#"{"a": 1}"#, r#"{"b": null}"#] {
///     let mut events: Vec<XmlEvent> = Vec::new();
///     transcoder
///         .transcode(JsonLexer::for_str(json, LexerOptions::default()), &mut events)
///         .unwrap();
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Transcoder {
    options: TranscodeOptions,
}

impl Transcoder {
    #[must_use]
    pub fn new(options: TranscodeOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &TranscodeOptions {
        &self.options
    }

    /// Runs [`transcode`] with these options.
    ///
    /// # Errors
    ///
    /// See [`transcode`].
    pub fn transcode<S: TokenSource, K: EventSink>(
        &self,
        source: S,
        sink: K,
    ) -> core::result::Result<(), ConversionError<K::Error>> {
        transcode(source, sink, &self.options)
    }
}
