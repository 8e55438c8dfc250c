//! Serialization of XML events to text.
//!
//! [`XmlWriter`] is an [`EventSink`] writing into any [`core::fmt::Write`],
//! usually a `String`. It escapes character data and attribute values with
//! character references and declares the default namespace wherever it
//! changes. Output is not pretty-printed.
use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::fmt::{self, Write};

use thiserror::Error;

use crate::{
    error::ConversionError,
    event::{Attribute, EventSink},
    lexer::{JsonLexer, LexerOptions},
    options::TranscodeOptions,
    transcoder::transcode,
};

static XML_DECL: &str = "<?xml version='1.0' encoding='utf-8'?>\n";

const CDATA_SPECIALS: &[char] = &['<', '>', '&', '\r'];

const ATTR_SPECIALS: &[char] = &['"', '\'', '\r', '\n', '\t', '<', '>', '&'];

fn escape<W: Write>(out: &mut W, data: &str, specials: &[char]) -> fmt::Result {
    let mut last_index = 0;
    for (i, ch) in data.match_indices(specials) {
        if i > last_index {
            out.write_str(&data[last_index..i])?;
        }
        out.write_str(match ch {
            "\"" => "&#34;",
            "'" => "&#39;",
            "<" => "&lt;",
            ">" => "&gt;",
            "&" => "&amp;",
            "\r" => "&#xd;",
            "\n" => "&#xa;",
            // Only `\t` is left in either set.
            _ => "&#x9;",
        })?;
        last_index = i + ch.len();
    }
    out.write_str(&data[last_index..])
}

/// Options for [`XmlWriter`].
///
/// # Default
///
/// The XML declaration is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[cfg_attr(any(test, feature = "serde"), serde(default))]
pub struct WriterOptions {
    /// Whether to start the document with
    /// `<?xml version='1.0' encoding='utf-8'?>` and a newline.
    ///
    /// # Default
    ///
    /// `true`
    pub xml_declaration: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            xml_declaration: true,
        }
    }
}

/// Failure of an [`XmlWriter`].
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("formatter error")]
    Fmt(#[from] fmt::Error),
    #[error("end of element {0:?} does not match the open element")]
    Unbalanced(String),
}

/// Writes XML text for the events it receives.
///
/// # Examples
///
/// ```
/// use jsonxml::{EventSink, WriterOptions, XmlWriter};
///
/// let mut writer = XmlWriter::new(String::new(), WriterOptions { xml_declaration: false });
/// writer.document_start().unwrap();
/// writer.element_start(Some("urn:x"), "a", &[]).unwrap();
/// writer.characters("1 < 2").unwrap();
/// writer.element_end(Some("urn:x"), "a").unwrap();
/// writer.document_end().unwrap();
/// assert_eq!(writer.into_inner(), "<a xmlns='urn:x'>1 &lt; 2</a>");
/// ```
#[derive(Debug)]
pub struct XmlWriter<W> {
    out: W,
    options: WriterOptions,
    /// Open elements with the default namespace in scope inside each.
    open: Vec<(String, Option<String>)>,
}

impl<W: Write> XmlWriter<W> {
    /// Creates a writer appending to `out`.
    pub fn new(out: W, options: WriterOptions) -> Self {
        Self {
            out,
            options,
            open: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn default_namespace(&self) -> Option<&str> {
        self.open.last().and_then(|(_, ns)| ns.as_deref())
    }
}

impl<W: Write> EventSink for XmlWriter<W> {
    type Error = WriteError;

    fn document_start(&mut self) -> Result<(), Self::Error> {
        if self.options.xml_declaration {
            self.out.write_str(XML_DECL)?;
        }
        Ok(())
    }

    fn element_start(
        &mut self,
        namespace: Option<&str>,
        local_name: &str,
        attributes: &[Attribute],
    ) -> Result<(), Self::Error> {
        self.out.write_char('<')?;
        self.out.write_str(local_name)?;
        if namespace != self.default_namespace() {
            self.out.write_str(" xmlns='")?;
            escape(&mut self.out, namespace.unwrap_or_default(), ATTR_SPECIALS)?;
            self.out.write_char('\'')?;
        }
        for attribute in attributes {
            self.out.write_char(' ')?;
            self.out.write_str(&attribute.name)?;
            self.out.write_str("='")?;
            escape(&mut self.out, &attribute.value, ATTR_SPECIALS)?;
            self.out.write_char('\'')?;
        }
        self.out.write_char('>')?;
        self.open
            .push((local_name.to_string(), namespace.map(ToString::to_string)));
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<(), Self::Error> {
        escape(&mut self.out, text, CDATA_SPECIALS)?;
        Ok(())
    }

    fn element_end(
        &mut self,
        _namespace: Option<&str>,
        local_name: &str,
    ) -> Result<(), Self::Error> {
        match self.open.pop() {
            Some((name, _)) if name == local_name => {
                self.out.write_str("</")?;
                self.out.write_str(local_name)?;
                self.out.write_char('>')?;
                Ok(())
            }
            _ => Err(WriteError::Unbalanced(local_name.to_string())),
        }
    }

    fn document_end(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Transcodes a JSON string straight to XML text.
///
/// # Errors
///
/// Fails like [`transcode`].
///
/// # Examples
///
/// ```
/// use jsonxml::{LexerOptions, TranscodeOptions, to_xml_string};
///
/// let xml = to_xml_string(
///     r#"{"tags": ["a", "b"]}"#,
///     LexerOptions::default(),
///     &TranscodeOptions {
///         artificial_root: Some("doc".into()),
///         ..Default::default()
///     },
/// )
/// .unwrap();
/// assert_eq!(
///     xml,
///     "<?xml version='1.0' encoding='utf-8'?>\n<doc><tags>a</tags><tags>b</tags></doc>"
/// );
/// ```
pub fn to_xml_string(
    json: &str,
    lexer_options: LexerOptions,
    options: &TranscodeOptions,
) -> Result<String, ConversionError<WriteError>> {
    let mut lexer = JsonLexer::for_str(json, lexer_options);
    let mut writer = XmlWriter::new(String::with_capacity(json.len()), WriterOptions::default());
    transcode(&mut lexer, &mut writer, options)?;
    Ok(writer.into_inner())
}
