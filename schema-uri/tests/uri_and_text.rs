//! Cross-module scenarios: URI base/fragment composition alongside the text
//! codec's codepoint counting, the two facilities a schema builder and the
//! `string` keyword lean on respectively.

use schema_uri::{text, SchemaUri};

#[test]
fn a_schema_builder_style_walk_rebases_then_appends_pointer_steps() {
    let root = SchemaUri::parse("https://example.com/root.json").unwrap();
    let rebased = root.resolve("widget.json#/definitions/pos").unwrap();
    let stepped = rebased.append("properties").append("x");
    assert_eq!(stepped.uri().as_str(), "https://example.com/widget.json");
    // `rebased` already carried a pointer fragment, so `append` — which
    // only extends pointer fragments, never plain-name ones — grows it.
    assert_eq!(stepped.identifier(), "/definitions/pos/properties/x");
}

#[test]
fn anchor_fragments_stop_appending_even_after_a_rebase() {
    let root = SchemaUri::parse("https://example.com/root.json").unwrap();
    let anchored = root.resolve("widget.json#named-anchor").unwrap();
    let stepped = anchored.append("properties");
    assert_eq!(stepped.identifier(), "named-anchor");
}

#[test]
fn max_length_keyword_relies_on_codepoint_count_not_byte_len() {
    let instance = "caf\u{00e9}"; // "café": 4 code points, 5 UTF-8 bytes
    assert_eq!(instance.len(), 5);
    assert_eq!(text::codepoint_count(instance), 4);
}

#[test]
fn bom_detection_feeds_the_input_source_that_the_json_parser_consumes() {
    let utf8_bom = [0xEF, 0xBB, 0xBF, b'{', b'}'];
    assert_eq!(text::detect_bom(&utf8_bom), 1);
    assert_eq!(text::detect_bom(&utf8_bom[3..]), 0);
}
