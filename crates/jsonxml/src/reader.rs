//! A configurable reader in the style of pull-parser facades.
//!
//! [`JsonXmlReader`] bundles lexer and transcode options behind named
//! features and properties, and runs the whole pipeline from JSON text to an
//! [`EventSink`]. Unknown feature or property names are rejected; nothing is
//! silently ignored.
use alloc::{
    string::{String, ToString},
    sync::Arc,
};

use crate::{
    error::{ConversionError, FeatureError},
    event::EventSink,
    lexer::{JsonLexer, LexerOptions},
    options::TranscodeOptions,
    transcoder::transcode,
};

/// Wrap array-valued fields in an element named after the field.
pub const FEATURE_WRAP_ARRAYS: &str = "wrap-arrays";
/// Add advisory `type` attributes.
pub const FEATURE_TYPE_ATTRIBUTES: &str = "type-attributes";
pub const FEATURE_ALLOW_COMMENTS: &str = "allow-comments";
pub const FEATURE_ALLOW_UNQUOTED_FIELD_NAMES: &str = "allow-unquoted-field-names";
/// Accept several whitespace separated top-level values.
pub const FEATURE_ALLOW_MULTIPLE_VALUES: &str = "allow-multiple-values";

pub const PROPERTY_NAMESPACE_URI: &str = "namespace-uri";
pub const PROPERTY_ARTIFICIAL_ROOT: &str = "artificial-root";

/// Reads JSON documents as XML events.
///
/// Comments, unquoted field names and several whitespace separated
/// top-level values are accepted by default.
///
/// # Examples
///
/// ```
/// use jsonxml::{JsonXmlReader, XmlEvent};
///
/// let mut reader = JsonXmlReader::new();
/// reader.set_feature("type-attributes", true).unwrap();
/// reader.set_property("artificial-root", Some("doc")).unwrap();
/// assert!(reader.set_feature("validation", true).is_err());
///
/// let mut events: Vec<XmlEvent> = Vec::new();
/// reader.parse_str("{id: 7} // trailing comment", &mut events).unwrap();
/// assert_eq!(events.len(), 7);
/// ```
#[derive(Debug, Clone)]
pub struct JsonXmlReader {
    options: TranscodeOptions,
    lexer_options: LexerOptions,
    source_name: Option<Arc<str>>,
}

impl Default for JsonXmlReader {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonXmlReader {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(
            TranscodeOptions::default(),
            LexerOptions {
                allow_comments: true,
                allow_unquoted_field_names: true,
                allow_multiple_values: true,
                ..Default::default()
            },
        )
    }

    #[must_use]
    pub fn with_options(options: TranscodeOptions, lexer_options: LexerOptions) -> Self {
        Self {
            options,
            lexer_options,
            source_name: None,
        }
    }

    /// Names the input in reported positions, for example with a file path.
    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn options(&self) -> &TranscodeOptions {
        &self.options
    }

    #[must_use]
    pub fn lexer_options(&self) -> &LexerOptions {
        &self.lexer_options
    }

    /// Current value of a named feature.
    ///
    /// # Errors
    ///
    /// [`FeatureError::UnsupportedFeature`] for unknown names.
    pub fn feature(&self, name: &str) -> Result<bool, FeatureError> {
        Ok(match name {
            FEATURE_WRAP_ARRAYS => self.options.wrap_arrays,
            FEATURE_TYPE_ATTRIBUTES => self.options.add_type_attributes,
            FEATURE_ALLOW_COMMENTS => self.lexer_options.allow_comments,
            FEATURE_ALLOW_UNQUOTED_FIELD_NAMES => self.lexer_options.allow_unquoted_field_names,
            FEATURE_ALLOW_MULTIPLE_VALUES => self.lexer_options.allow_multiple_values,
            _ => return Err(FeatureError::UnsupportedFeature(name.to_string())),
        })
    }

    /// Turns a named feature on or off.
    ///
    /// # Errors
    ///
    /// [`FeatureError::UnsupportedFeature`] for unknown names.
    pub fn set_feature(&mut self, name: &str, value: bool) -> Result<(), FeatureError> {
        let flag = match name {
            FEATURE_WRAP_ARRAYS => &mut self.options.wrap_arrays,
            FEATURE_TYPE_ATTRIBUTES => &mut self.options.add_type_attributes,
            FEATURE_ALLOW_COMMENTS => &mut self.lexer_options.allow_comments,
            FEATURE_ALLOW_UNQUOTED_FIELD_NAMES => {
                &mut self.lexer_options.allow_unquoted_field_names
            }
            FEATURE_ALLOW_MULTIPLE_VALUES => &mut self.lexer_options.allow_multiple_values,
            _ => return Err(FeatureError::UnsupportedFeature(name.to_string())),
        };
        *flag = value;
        Ok(())
    }

    /// Current value of a named property.
    ///
    /// # Errors
    ///
    /// [`FeatureError::UnsupportedProperty`] for unknown names.
    pub fn property(&self, name: &str) -> Result<Option<&str>, FeatureError> {
        match name {
            PROPERTY_NAMESPACE_URI => Ok(self.options.namespace_uri.as_deref()),
            PROPERTY_ARTIFICIAL_ROOT => Ok(self.options.artificial_root.as_deref()),
            _ => Err(FeatureError::UnsupportedProperty(name.to_string())),
        }
    }

    /// Sets or clears a named property.
    ///
    /// # Errors
    ///
    /// [`FeatureError::UnsupportedProperty`] for unknown names.
    pub fn set_property(&mut self, name: &str, value: Option<&str>) -> Result<(), FeatureError> {
        let slot = match name {
            PROPERTY_NAMESPACE_URI => &mut self.options.namespace_uri,
            PROPERTY_ARTIFICIAL_ROOT => &mut self.options.artificial_root,
            _ => return Err(FeatureError::UnsupportedProperty(name.to_string())),
        };
        *slot = value.map(String::from);
        Ok(())
    }

    /// Transcodes an in-memory JSON document.
    ///
    /// # Errors
    ///
    /// See [`transcode`].
    pub fn parse_str<K: EventSink>(
        &self,
        json: &str,
        sink: K,
    ) -> Result<(), ConversionError<K::Error>> {
        let lexer = self.named(JsonLexer::for_str(json, self.lexer_options));
        transcode(lexer, sink, &self.options)
    }

    /// Transcodes a JSON document read incrementally from `reader`.
    ///
    /// # Errors
    ///
    /// See [`transcode`]. I/O failures are reported as
    /// [`ErrorKind::SourceRead`](crate::ErrorKind::SourceRead).
    #[cfg(feature = "std")]
    pub fn parse_reader<R: std::io::BufRead, K: EventSink>(
        &self,
        reader: R,
        sink: K,
    ) -> Result<(), ConversionError<K::Error>> {
        let lexer = self.named(JsonLexer::for_reader(reader, self.lexer_options));
        transcode(lexer, sink, &self.options)
    }

    fn named<S: crate::lexer::CharSource>(&self, lexer: JsonLexer<S>) -> JsonLexer<S> {
        match &self.source_name {
            Some(name) => lexer.with_source_name(Arc::clone(name)),
            None => lexer,
        }
    }
}
