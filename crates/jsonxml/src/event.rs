//! XML structural events and the [`EventSink`] they are pushed to.
//!
//! The transcoder never builds a tree: it calls the sink once per element
//! boundary or run of character data, in document order. A `Vec<XmlEvent>`
//! is the simplest sink and records everything it is given.
//!
//! # Examples
//!
//! ```
//! use jsonxml::{JsonLexer, LexerOptions, TranscodeOptions, XmlEvent, transcode};
//!
//! let mut lexer = JsonLexer::for_str(r#"{"a": "x"}"#, LexerOptions::default());
//! let mut events: Vec<XmlEvent> = Vec::new();
//! transcode(&mut lexer, &mut events, &TranscodeOptions::default()).unwrap();
//! assert_eq!(
//!     events,
//!     vec![
//!         XmlEvent::DocumentStart,
//!         XmlEvent::start("a"),
//!         XmlEvent::Characters("x".to_string()),
//!         XmlEvent::end("a"),
//!         XmlEvent::DocumentEnd,
//!     ]
//! );
//! ```
use alloc::{
    string::{String, ToString},
    vec::Vec,
};

use crate::token::Position;

/// An unqualified XML attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An owned XML structural event.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum XmlEvent {
    DocumentStart,
    ElementStart {
        #[cfg_attr(
            any(test, feature = "serde"),
            serde(default, skip_serializing_if = "Option::is_none")
        )]
        namespace: Option<String>,
        name: String,
        #[cfg_attr(
            any(test, feature = "serde"),
            serde(default, skip_serializing_if = "Vec::is_empty")
        )]
        attributes: Vec<Attribute>,
    },
    Characters(String),
    ElementEnd {
        #[cfg_attr(
            any(test, feature = "serde"),
            serde(default, skip_serializing_if = "Option::is_none")
        )]
        namespace: Option<String>,
        name: String,
    },
    DocumentEnd,
}

impl XmlEvent {
    /// An element start without namespace or attributes.
    #[must_use]
    pub fn start(name: impl Into<String>) -> Self {
        XmlEvent::ElementStart {
            namespace: None,
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// An element end without namespace.
    #[must_use]
    pub fn end(name: impl Into<String>) -> Self {
        XmlEvent::ElementEnd {
            namespace: None,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn is_element_start(&self) -> bool {
        matches!(self, XmlEvent::ElementStart { .. })
    }

    #[must_use]
    pub fn is_element_end(&self) -> bool {
        matches!(self, XmlEvent::ElementEnd { .. })
    }
}

/// Consumer of XML structural events.
///
/// Calls arrive in document order and element starts and ends are strictly
/// nested. Character data is passed unescaped; escaping is up to the sink.
pub trait EventSink {
    /// Error the sink may fail with. The transcoder aborts on the first one.
    type Error: core::error::Error;

    /// Called once, before any other event.
    ///
    /// # Errors
    ///
    /// Sink-specific.
    fn document_start(&mut self) -> Result<(), Self::Error>;

    /// Opens an element.
    ///
    /// # Errors
    ///
    /// Sink-specific.
    fn element_start(
        &mut self,
        namespace: Option<&str>,
        local_name: &str,
        attributes: &[Attribute],
    ) -> Result<(), Self::Error>;

    /// Character data inside the innermost open element.
    ///
    /// # Errors
    ///
    /// Sink-specific.
    fn characters(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Closes the innermost open element.
    ///
    /// # Errors
    ///
    /// Sink-specific.
    fn element_end(&mut self, namespace: Option<&str>, local_name: &str)
    -> Result<(), Self::Error>;

    /// Called once, after the last element has been closed.
    ///
    /// # Errors
    ///
    /// Sink-specific.
    fn document_end(&mut self) -> Result<(), Self::Error>;

    /// The JSON position the next event originates from. Sinks that report
    /// their own errors can keep it; the default ignores it.
    fn position_changed(&mut self, _position: &Position) {}
}

impl<K: EventSink + ?Sized> EventSink for &mut K {
    type Error = K::Error;

    fn document_start(&mut self) -> Result<(), Self::Error> {
        (**self).document_start()
    }

    fn element_start(
        &mut self,
        namespace: Option<&str>,
        local_name: &str,
        attributes: &[Attribute],
    ) -> Result<(), Self::Error> {
        (**self).element_start(namespace, local_name, attributes)
    }

    fn characters(&mut self, text: &str) -> Result<(), Self::Error> {
        (**self).characters(text)
    }

    fn element_end(
        &mut self,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Result<(), Self::Error> {
        (**self).element_end(namespace, local_name)
    }

    fn document_end(&mut self) -> Result<(), Self::Error> {
        (**self).document_end()
    }

    fn position_changed(&mut self, position: &Position) {
        (**self).position_changed(position);
    }
}

/// Records every event.
impl EventSink for Vec<XmlEvent> {
    type Error = core::convert::Infallible;

    fn document_start(&mut self) -> Result<(), Self::Error> {
        self.push(XmlEvent::DocumentStart);
        Ok(())
    }

    fn element_start(
        &mut self,
        namespace: Option<&str>,
        local_name: &str,
        attributes: &[Attribute],
    ) -> Result<(), Self::Error> {
        self.push(XmlEvent::ElementStart {
            namespace: namespace.map(ToString::to_string),
            name: local_name.to_string(),
            attributes: attributes.to_vec(),
        });
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<(), Self::Error> {
        self.push(XmlEvent::Characters(text.to_string()));
        Ok(())
    }

    fn element_end(
        &mut self,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Result<(), Self::Error> {
        self.push(XmlEvent::ElementEnd {
            namespace: namespace.map(ToString::to_string),
            name: local_name.to_string(),
        });
        Ok(())
    }

    fn document_end(&mut self) -> Result<(), Self::Error> {
        self.push(XmlEvent::DocumentEnd);
        Ok(())
    }
}

/// Replays recorded events into another sink.
///
/// # Errors
///
/// Returns the first error of `sink`.
pub fn replay<K: EventSink>(events: &[XmlEvent], sink: &mut K) -> Result<(), K::Error> {
    for event in events {
        match event {
            XmlEvent::DocumentStart => sink.document_start()?,
            XmlEvent::ElementStart {
                namespace,
                name,
                attributes,
            } => sink.element_start(namespace.as_deref(), name, attributes)?,
            XmlEvent::Characters(text) => sink.characters(text)?,
            XmlEvent::ElementEnd { namespace, name } => {
                sink.element_end(namespace.as_deref(), name)?;
            }
            XmlEvent::DocumentEnd => sink.document_end()?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn sample() -> Vec<XmlEvent> {
        vec![
            XmlEvent::DocumentStart,
            XmlEvent::ElementStart {
                namespace: Some("urn:x".into()),
                name: "a".into(),
                attributes: vec![Attribute::new("type", "int")],
            },
            XmlEvent::Characters("1".into()),
            XmlEvent::ElementEnd {
                namespace: Some("urn:x".into()),
                name: "a".into(),
            },
            XmlEvent::DocumentEnd,
        ]
    }

    #[test]
    fn replay_into_recorder_is_identity() {
        let events = sample();
        let mut copy: Vec<XmlEvent> = Vec::new();
        replay(&events, &mut copy).unwrap();
        assert_eq!(copy, events);
    }

    #[test]
    fn element_helpers() {
        assert!(XmlEvent::start("a").is_element_start());
        assert!(XmlEvent::end("a").is_element_end());
        assert!(!XmlEvent::DocumentStart.is_element_start());
        assert!(!XmlEvent::Characters("a".into()).is_element_end());
    }

    #[test]
    fn serializes_without_empty_fields() {
        let json = serde_json::to_string(&[XmlEvent::start("a"), XmlEvent::Characters("x".into())])
            .unwrap();
        assert_eq!(json, r#"[{"ElementStart":{"name":"a"}},{"Characters":"x"}]"#);
        let back: Vec<XmlEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![XmlEvent::start("a"), XmlEvent::Characters("x".into())]);
    }
}
