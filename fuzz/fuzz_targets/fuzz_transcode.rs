#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonxml::{
    JsonLexer, LexerOptions, TranscodeOptions, WriterOptions, XmlEvent, XmlWriter, transcode,
};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 2; // flags + max depth

const NAMES: &[&str] = &["a", "b", "item", "x-y", "_id", "ns:n", "é"];

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Mostly well-formed documents, so the fuzzer spends its time past the
/// lexer.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x3F);
        data[1] = with_rng(|rng| rng.random_range(1..=32));

        let mut prefix = HEADER;
        while prefix < size.max(HEADER + 1) && prefix < max_size {
            let limit = max_size - prefix;
            prefix += append_value(&mut data[prefix..], size, limit);
            if prefix < max_size {
                data[prefix] = b' ';
                prefix += 1;
            }
        }
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fn append_value(data: &mut [u8], size: usize, limit: usize) -> usize {
    let value = loop {
        let s = with_rng(|rng| rng.random_range(size / 2..=size * 2).min(limit));
        let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
        if let Ok(value) = ArbitraryDocument::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
            break value;
        }
    };

    let serialized = serde_json::to_vec(&value.0).expect("Failed to serialize arbitrary value");
    let len = serialized.len().min(limit);
    data[..len].copy_from_slice(&serialized[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(21)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(
                    serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?,
                )
            }
            3 => Value::Number(u.arbitrary::<i64>()?.into()),
            4..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => Value::Object(arbitrary_object(u)?),
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

fn arbitrary_object(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Map<String, Value>> {
    let fields: Vec<(u8, ArbitraryValue)> = u.arbitrary()?;
    Ok(fields
        .into_iter()
        .map(|(k, v)| (NAMES[usize::from(k) % NAMES.len()].to_string(), v.0))
        .collect())
}

/// A document with an object at the top, the shape that maps cleanly.
#[derive(Debug)]
struct ArbitraryDocument(Value);

impl<'a> Arbitrary<'a> for ArbitraryDocument {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        Ok(ArbitraryDocument(Value::Object(arbitrary_object(u)?)))
    }
}

/// Every end matches the innermost open start.
fn check_balanced(events: &[XmlEvent]) {
    let mut open: Vec<&str> = Vec::new();
    for event in events {
        match event {
            XmlEvent::ElementStart { name, .. } => open.push(name),
            XmlEvent::ElementEnd { name, .. } => {
                assert_eq!(open.pop(), Some(name.as_str()), "mismatched element end");
            }
            XmlEvent::DocumentEnd => assert!(open.is_empty(), "document ended inside an element"),
            _ => {}
        }
    }
}

fn transcoder(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let max_depth = usize::from(data[1]).max(1);
    let text = String::from_utf8_lossy(&data[HEADER..]).into_owned();

    let lexer_options = LexerOptions {
        allow_comments: flags & 1 != 0,
        allow_unquoted_field_names: flags & 2 != 0,
        allow_multiple_values: flags & 4 != 0,
        ..Default::default()
    };
    let options = TranscodeOptions {
        wrap_arrays: flags & 8 != 0,
        add_type_attributes: flags & 16 != 0,
        artificial_root: (flags & 32 != 0).then(|| "root".into()),
        namespace_uri: (flags & 8 != 0).then(|| "urn:fuzz".into()),
        max_depth,
    };

    let mut events: Vec<XmlEvent> = Vec::new();
    let result = transcode(JsonLexer::for_str(&text, lexer_options), &mut events, &options);
    check_balanced(&events);
    if result.is_ok() && !events.is_empty() {
        assert_eq!(events.last(), Some(&XmlEvent::DocumentEnd));
    }

    // The writer must accept everything the transcoder emits.
    let mut writer = XmlWriter::new(String::new(), WriterOptions::default());
    let written = transcode(JsonLexer::for_str(&text, lexer_options), &mut writer, &options);
    assert_eq!(result.is_ok(), written.is_ok());
}

fuzz_target!(|data: &[u8]| transcoder(data));
