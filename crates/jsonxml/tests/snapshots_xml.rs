#![expect(missing_docs)]

use insta::assert_snapshot;
use jsonxml::{
    ErrorKind, JsonLexer, LexerOptions, TranscodeOptions, WriterOptions, XmlWriter,
    to_xml_string, transcode,
};

mod common;

fn options() -> TranscodeOptions {
    TranscodeOptions {
        artificial_root: Some("config".into()),
        ..Default::default()
    }
}

fn render(json: &str, lexer_options: LexerOptions, options: &TranscodeOptions) -> String {
    let mut writer = XmlWriter::new(
        String::new(),
        WriterOptions {
            xml_declaration: false,
        },
    );
    transcode(
        JsonLexer::for_str(json, lexer_options),
        &mut writer,
        options,
    )
    .expect("document should transcode");
    writer.into_inner()
}

#[test]
fn snapshot_flattened() {
    let xml = render(common::CONFIG, LexerOptions::default(), &options());
    assert_snapshot!(xml, @"<config><service><name>ingest</name><replicas>3</replicas><ratio>0.75</ratio><enabled>true</enabled><owner></owner></service><ports>8080</ports><ports>8443</ports><routes><path>/a</path><methods>GET</methods><methods>POST</methods></routes><routes><path>/b&amp;c</path></routes><matrix>1</matrix><matrix>2</matrix><matrix>3</matrix><notes>&lt;none&gt;</notes></config>");
}

#[test]
fn snapshot_wrapped_and_typed() {
    let xml = render(
        common::CONFIG,
        LexerOptions::default(),
        &TranscodeOptions {
            wrap_arrays: true,
            add_type_attributes: true,
            ..options()
        },
    );
    assert_snapshot!(xml, @"<config><service><name type='string'>ingest</name><replicas type='int'>3</replicas><ratio type='float'>0.75</ratio><enabled type='boolean'>true</enabled><owner type='null'></owner></service><ports type='array'><ports type='int'>8080</ports><ports type='int'>8443</ports></ports><routes type='array'><routes><path type='string'>/a</path><methods type='array'><methods type='string'>GET</methods><methods type='string'>POST</methods></methods></routes><routes><path type='string'>/b&amp;c</path><methods type='array'></methods></routes></routes><matrix type='array'><matrix type='array'><matrix type='int'>1</matrix><matrix type='int'>2</matrix></matrix><matrix type='array'><matrix type='int'>3</matrix></matrix></matrix><notes type='string'>&lt;none&gt;</notes></config>");
}

#[test]
fn relaxed_syntax_gives_same_xml() {
    let relaxed = LexerOptions {
        allow_comments: true,
        allow_unquoted_field_names: true,
        ..Default::default()
    };
    assert_eq!(
        render(common::CONFIG_RELAXED, relaxed, &options()),
        render(common::CONFIG, LexerOptions::default(), &options())
    );
}

#[test]
fn snapshot_namespaced_records() {
    let xml = render(
        common::RECORDS,
        LexerOptions {
            allow_multiple_values: true,
            ..Default::default()
        },
        &TranscodeOptions {
            artificial_root: Some("records".into()),
            namespace_uri: Some("urn:example:records".into()),
            ..Default::default()
        },
    );
    assert_snapshot!(xml, @"<records xmlns='urn:example:records'><id>1</id><tag>x</tag><id>2</id><item>loose</item></records>");
}

#[test]
fn to_xml_string_writes_declaration() {
    let xml = to_xml_string(r#"{"a": "b"}"#, LexerOptions::default(), &TranscodeOptions::default())
        .unwrap();
    assert_snapshot!(xml, @r"
    <?xml version='1.0' encoding='utf-8'?>
    <a>b</a>
    ");
}

#[test]
fn without_root_the_config_has_many_roots() {
    let err = to_xml_string(common::CONFIG, LexerOptions::default(), &TranscodeOptions::default())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MultipleRoots { count } if count > 1));
}
