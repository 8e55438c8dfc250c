use alloc::{string::String, vec::Vec};

use crate::{
    ConversionError, JsonLexer, LexerOptions, TranscodeOptions, WriteError, WriterOptions,
    XmlEvent, XmlWriter, transcode,
};

/// Options with an artificial root named `r`.
pub fn rooted() -> TranscodeOptions {
    TranscodeOptions {
        artificial_root: Some("r".into()),
        ..Default::default()
    }
}

pub fn events(json: &str, options: &TranscodeOptions) -> Vec<XmlEvent> {
    try_events(json, options).unwrap()
}

pub fn try_events(
    json: &str,
    options: &TranscodeOptions,
) -> Result<Vec<XmlEvent>, ConversionError<core::convert::Infallible>> {
    let mut events = Vec::new();
    let lexer = JsonLexer::for_str(
        json,
        LexerOptions {
            allow_multiple_values: true,
            ..Default::default()
        },
    );
    transcode(lexer, &mut events, options)?;
    Ok(events)
}

/// XML text without declaration.
pub fn xml(json: &str, options: &TranscodeOptions) -> String {
    try_xml(json, options).unwrap()
}

pub fn try_xml(json: &str, options: &TranscodeOptions) -> Result<String, ConversionError<WriteError>> {
    let mut writer = XmlWriter::new(
        String::new(),
        WriterOptions {
            xml_declaration: false,
        },
    );
    let lexer = JsonLexer::for_str(
        json,
        LexerOptions {
            allow_multiple_values: true,
            ..Default::default()
        },
    );
    transcode(lexer, &mut writer, options)?;
    Ok(writer.into_inner())
}

/// Checks that element starts and ends nest, and returns the number of
/// top-level elements.
pub fn check_balanced(events: &[XmlEvent]) -> Result<usize, String> {
    let mut open: Vec<&str> = Vec::new();
    let mut roots = 0;
    if events.first() != Some(&XmlEvent::DocumentStart) {
        return Err("missing document start".into());
    }
    if events.last() != Some(&XmlEvent::DocumentEnd) {
        return Err("missing document end".into());
    }
    for event in &events[1..events.len() - 1] {
        match event {
            XmlEvent::ElementStart { name, .. } => {
                if open.is_empty() {
                    roots += 1;
                }
                open.push(name);
            }
            XmlEvent::ElementEnd { name, .. } => match open.pop() {
                Some(top) if top == name => {}
                other => return Err(alloc::format!("</{name}> closes {other:?}")),
            },
            XmlEvent::Characters(_) if open.is_empty() => {
                return Err("character data outside an element".into());
            }
            XmlEvent::Characters(_) => {}
            XmlEvent::DocumentStart | XmlEvent::DocumentEnd => {
                return Err("nested document boundary".into());
            }
        }
    }
    if open.is_empty() {
        Ok(roots)
    } else {
        Err(alloc::format!("unclosed {open:?}"))
    }
}
