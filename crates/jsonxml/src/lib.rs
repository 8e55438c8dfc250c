//! Streaming JSON to XML transcoding.
//!
//! `jsonxml` converts a JSON document into a sequence of XML structural
//! events in a single pass. Tokens are pulled from a [`TokenSource`] one at a
//! time and events are pushed to an [`EventSink`] as soon as they are known,
//! so memory use grows with nesting depth, not with document size.
//!
//! The mapping:
//!
//! - every object field becomes an element named after the field;
//! - an array-valued field becomes one element per item, all named after the
//!   field (optionally wrapped in one more such element, see
//!   [`TranscodeOptions::wrap_arrays`]);
//! - scalars become character data, `null` becomes an empty element;
//! - scalars in an array without a field name become `<item>` elements.
//!
//! XML allows a single document element, so JSON whose top level holds
//! several fields or values needs [`TranscodeOptions::artificial_root`].
//!
//! # Examples
//!
//! ```
//! use jsonxml::{LexerOptions, TranscodeOptions, to_xml_string};
//!
//! let options = TranscodeOptions {
//!     artificial_root: Some("person".into()),
//!     add_type_attributes: true,
//!     ..Default::default()
//! };
//! let xml = to_xml_string(
//!     r#"{"name": "Ada", "born": 1815, "email": null}"#,
//!     LexerOptions::default(),
//!     &options,
//! )
//! .unwrap();
//! assert_eq!(
//!     xml,
//!     "<?xml version='1.0' encoding='utf-8'?>\n<person><name type='string'>Ada</name>\
//!      <born type='int'>1815</born><email type='null'></email></person>"
//! );
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod error;
mod event;
mod lexer;
mod options;
mod reader;
mod token;
mod transcoder;
mod writer;

#[cfg(test)]
mod tests;

pub use error::{ConversionError, ErrorKind, FeatureError, Location};
pub use event::{Attribute, EventSink, XmlEvent, replay};
#[cfg(feature = "std")]
pub use lexer::ReadSource;
pub use lexer::{
    CharSource, ErrorSource, JsonLexer, LexerOptions, SourceError, StrSource, SyntaxError,
};
pub use options::TranscodeOptions;
pub use reader::{
    FEATURE_ALLOW_COMMENTS, FEATURE_ALLOW_MULTIPLE_VALUES, FEATURE_ALLOW_UNQUOTED_FIELD_NAMES,
    FEATURE_TYPE_ATTRIBUTES, FEATURE_WRAP_ARRAYS, JsonXmlReader, PROPERTY_ARTIFICIAL_ROOT,
    PROPERTY_NAMESPACE_URI,
};
pub use token::{Position, Scalar, ScalarKind, Token, TokenKind, TokenReplay, TokenSource};
pub use transcoder::{Transcoder, transcode};
pub use writer::{WriteError, WriterOptions, XmlWriter, to_xml_string};
