#![allow(clippy::struct_excessive_bools)]

/// Configuration options for the JSON lexer.
///
/// These options relax the JSON grammar the lexer accepts. The transcoder is
/// unaffected by them; it only ever sees well-formed token streams.
///
/// # Examples
///
/// ```rust
/// use jsonxml::{JsonLexer, LexerOptions};
///
/// let lexer = JsonLexer::for_str(
///     "{a: 1 /* one */}",
///     LexerOptions {
///         allow_comments: true,
///         allow_unquoted_field_names: true,
///         ..Default::default()
///     },
/// );
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(any(test, feature = "serde"), serde(default))]
pub struct LexerOptions {
    /// Whether to skip `// line` and `/* block */` comments wherever
    /// whitespace is allowed.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_comments: bool,

    /// Whether object keys may be written without quotes.
    ///
    /// Unquoted names start with a letter, `_` or `$` and continue with
    /// letters, digits, `_` or `$`.
    ///
    /// # Examples
    ///
    /// ```json
    /// {name: "Ada", $id: 1}
    /// ```
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unquoted_field_names: bool,

    /// Whether to parse multiple JSON values in a single input stream.
    ///
    /// When `true`, the lexer continues with any further whitespace-delimited
    /// root values after the first one, as in JSON Lines. An input without
    /// any value is then an empty stream rather than an error.
    ///
    /// # Examples
    ///
    /// ```json
    /// {"a": 1}
    /// {"b": 2}
    /// ```
    ///
    /// # Default
    ///
    /// `false`
    pub allow_multiple_values: bool,

    /// Whether to allow any Unicode whitespace between JSON values.
    ///
    /// By default, the lexer only recognizes the four whitespace characters
    /// defined by RFC 8259: space (U+0020), line feed (U+000A),
    /// carriage return (U+000D), and horizontal tab (U+0009).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unicode_whitespace: bool,
}
