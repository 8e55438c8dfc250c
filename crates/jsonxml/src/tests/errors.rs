use alloc::{
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};

use rstest::rstest;
use thiserror::Error;

use super::utils::{rooted, try_events, try_xml};
use crate::{
    Attribute, ConversionError, ErrorKind, EventSink, JsonLexer, LexerOptions, Location, Position,
    Scalar, ScalarKind, SourceError, SyntaxError, Token, TokenKind, TokenReplay, TokenSource,
    TranscodeOptions, XmlEvent, transcode,
};

#[rstest]
#[case::objects_in_top_level_array(r#"[{"x":1}]"#, TokenKind::ObjectStart)]
#[case::arrays_in_top_level_array("[1,[2]]", TokenKind::ArrayStart)]
fn top_level_array_of_containers_fails(#[case] json: &str, #[case] found: TokenKind) {
    for options in [TranscodeOptions::default(), rooted()] {
        let err = try_events(json, &options).unwrap_err();
        assert!(
            matches!(
                err.kind,
                ErrorKind::UnexpectedToken { found: f, expected: "a scalar or ']'" } if f == found
            ),
            "{err:?}"
        );
    }
}

#[test]
fn multiple_roots_are_counted() {
    let err = try_xml(r#"{"a":1,"b":2}"#, &TranscodeOptions::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MultipleRoots { count: 2 }));
    assert_eq!(
        err.to_string(),
        "document would have 2 root elements; configure an artificial root at 1:14"
    );
}

#[test]
fn flattened_array_field_counts_as_one_root() {
    let xml = try_xml(r#"{"a":[1,2,3]}"#, &TranscodeOptions::default()).unwrap();
    assert_eq!(xml, "<a>1</a><a>2</a><a>3</a>");

    let events = try_events(r#"{"a":[1,2,3]}"#, &TranscodeOptions::default()).unwrap();
    assert_eq!(events.last(), Some(&XmlEvent::DocumentEnd));
    let top_level = events
        .iter()
        .filter(|e| matches!(e, XmlEvent::ElementStart { name, .. } if name == "a"))
        .count();
    assert_eq!(top_level, 3);
}

#[test]
fn flattened_array_next_to_another_field_needs_a_root() {
    let err = try_xml(r#"{"a":[1,2,3],"b":4}"#, &TranscodeOptions::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MultipleRoots { count: 2 }));
}

#[test]
fn multiple_top_level_values_need_a_root() {
    let err = try_events(r#"{"a":1} {"b":2}"#, &TranscodeOptions::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MultipleRoots { count: 2 }));
}

#[test]
fn multiple_roots_fail_before_document_end() {
    let mut events: Vec<XmlEvent> = Vec::new();
    let lexer = JsonLexer::for_str(r#"{"a":1,"b":2}"#, LexerOptions::default());
    transcode(lexer, &mut events, &TranscodeOptions::default()).unwrap_err();
    assert_ne!(events.last(), Some(&XmlEvent::DocumentEnd));
    assert_eq!(events.len(), 7);
}

#[test]
fn syntax_errors_carry_their_position() {
    let err = try_events("{\n  \"a\": }", &rooted()).unwrap_err();
    let ErrorKind::SourceRead(source) = &err.kind else {
        panic!("expected a read error, got {err:?}");
    };
    assert_eq!(
        source.syntax_error(),
        Some(&SyntaxError::InvalidCharacter('}'))
    );
    assert_eq!(err.location, Location::At(Position::new(2, 8)));
    assert_eq!(
        err.to_string(),
        "cannot read JSON: syntax error: invalid character '}' at 2:8"
    );
}

#[test]
fn read_errors_name_the_source() {
    let lexer = JsonLexer::for_str("[1,]", LexerOptions::default()).with_source_name("list.json");
    let mut events: Vec<XmlEvent> = Vec::new();
    let err = transcode(lexer, &mut events, &rooted()).unwrap_err();
    let position = err.position().unwrap();
    assert_eq!(position.source.as_deref(), Some("list.json"));
    assert_eq!((position.line, position.column), (1, 4));
}

#[test]
fn depth_limit() {
    let options = TranscodeOptions {
        max_depth: 2,
        ..Default::default()
    };
    assert!(try_events(r#"{"a":{"b":1}}"#, &options).is_ok());
    let err = try_events(r#"{"a":{"a":{"a":1}}}"#, &options).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DepthLimitExceeded { limit: 2 }));
}

#[test]
fn deep_nesting_fails_without_overflowing() {
    let depth = 100_000;
    let json = format!("{{\"a\":{}{}}}", "[".repeat(depth), "]".repeat(depth));
    let err = try_events(&json, &TranscodeOptions::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DepthLimitExceeded { limit: 128 }));
}

#[rstest]
#[case::field_name_at_top_level(
    vec![Token::FieldName("a".into())],
    TokenKind::FieldName,
    "a JSON value"
)]
#[case::object_end_at_top_level(vec![Token::ObjectEnd], TokenKind::ObjectEnd, "a JSON value")]
#[case::array_end_in_object(
    vec![Token::ObjectStart, Token::ArrayEnd],
    TokenKind::ArrayEnd,
    "a field name or '}'"
)]
#[case::scalar_in_object(
    vec![Token::ObjectStart, Token::Scalar(Scalar::int("1"))],
    TokenKind::Scalar(ScalarKind::Int),
    "a field name or '}'"
)]
#[case::object_end_in_array(
    vec![Token::ArrayStart, Token::ObjectEnd],
    TokenKind::ObjectEnd,
    "a scalar or ']'"
)]
#[case::field_without_value(
    vec![Token::ObjectStart, Token::FieldName("a".into()), Token::ObjectEnd],
    TokenKind::ObjectEnd,
    "a field value"
)]
fn grammar_violations(
    #[case] tokens: Vec<Token>,
    #[case] found: TokenKind,
    #[case] expected: &'static str,
) {
    let mut events: Vec<XmlEvent> = Vec::new();
    let err = transcode(TokenReplay::new(tokens), &mut events, &rooted()).unwrap_err();
    match err.kind {
        ErrorKind::UnexpectedToken {
            found: f,
            expected: e,
        } => {
            assert_eq!(f, found);
            assert_eq!(e, expected);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn truncated_token_stream_still_balances() {
    let tokens = vec![
        Token::ObjectStart,
        Token::FieldName("a".into()),
        Token::ObjectStart,
        Token::FieldName("b".into()),
        Token::Scalar(Scalar::int("1")),
    ];
    let mut events: Vec<XmlEvent> = Vec::new();
    transcode(TokenReplay::new(tokens), &mut events, &TranscodeOptions::default()).unwrap();
    assert_eq!(super::utils::check_balanced(&events), Ok(1));
}

/// A source without position tracking.
struct Blind(Vec<Token>);

impl TokenSource for Blind {
    fn next_token(&mut self) -> Result<Token, SourceError> {
        Ok(if self.0.is_empty() {
            Token::Eof
        } else {
            self.0.remove(0)
        })
    }
}

#[test]
fn unknown_location_without_positions() {
    let mut events: Vec<XmlEvent> = Vec::new();
    let err = transcode(Blind(vec![Token::ArrayEnd]), &mut events, &rooted()).unwrap_err();
    assert_eq!(err.location, Location::Unknown);
    assert!(err.to_string().ends_with(" at unknown location"));
}

#[derive(Debug, Error)]
#[error("sink is full")]
struct Full;

/// Accepts a fixed number of events.
struct Limited(usize);

impl Limited {
    fn take(&mut self) -> Result<(), Full> {
        if self.0 == 0 {
            return Err(Full);
        }
        self.0 -= 1;
        Ok(())
    }
}

impl EventSink for Limited {
    type Error = Full;

    fn document_start(&mut self) -> Result<(), Full> {
        self.take()
    }

    fn element_start(
        &mut self,
        _namespace: Option<&str>,
        _local_name: &str,
        _attributes: &[Attribute],
    ) -> Result<(), Full> {
        self.take()
    }

    fn characters(&mut self, _text: &str) -> Result<(), Full> {
        self.take()
    }

    fn element_end(&mut self, _namespace: Option<&str>, _local_name: &str) -> Result<(), Full> {
        self.take()
    }

    fn document_end(&mut self) -> Result<(), Full> {
        self.take()
    }
}

#[test]
fn sink_errors_abort() {
    let lexer = JsonLexer::for_str(r#"{"a":"x"}"#, LexerOptions::default());
    let err: ConversionError<Full> =
        transcode(lexer, Limited(2), &TranscodeOptions::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Sink(Full)));
    assert_eq!(err.to_string(), "event sink failed: sink is full at 1:9");
}

/// Records the position reported before each event.
#[derive(Default)]
struct Positions {
    events: Vec<XmlEvent>,
    positions: Vec<String>,
    current: Option<Position>,
}

impl EventSink for Positions {
    type Error = core::convert::Infallible;

    fn document_start(&mut self) -> Result<(), Self::Error> {
        self.record();
        self.events.document_start()
    }

    fn element_start(
        &mut self,
        namespace: Option<&str>,
        local_name: &str,
        attributes: &[Attribute],
    ) -> Result<(), Self::Error> {
        self.record();
        self.events.element_start(namespace, local_name, attributes)
    }

    fn characters(&mut self, text: &str) -> Result<(), Self::Error> {
        self.record();
        self.events.characters(text)
    }

    fn element_end(
        &mut self,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Result<(), Self::Error> {
        self.record();
        self.events.element_end(namespace, local_name)
    }

    fn document_end(&mut self) -> Result<(), Self::Error> {
        self.record();
        self.events.document_end()
    }

    fn position_changed(&mut self, position: &Position) {
        self.current = Some(position.clone());
    }
}

impl Positions {
    fn record(&mut self) {
        let position = self
            .current
            .as_ref()
            .map_or_else(|| "?".to_string(), ToString::to_string);
        self.positions.push(position);
    }
}

#[test]
fn sink_sees_json_positions() {
    let lexer = JsonLexer::for_str("{\"a\":\n \"x\"}", LexerOptions::default());
    let mut sink = Positions::default();
    transcode(lexer, &mut sink, &TranscodeOptions::default()).unwrap();
    assert_eq!(sink.events.len(), 5);
    assert_eq!(sink.positions, ["1:2", "2:5", "2:5", "2:5", "2:6"]);
}
