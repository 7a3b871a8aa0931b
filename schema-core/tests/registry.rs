//! Cross-module registry/patch scenarios: construction, `$ref`-style cyclic
//! indirection via `Key`, and the patch's append-order guarantee, without
//! pulling in the draft-07 keyword set from `schema-json`.

use schema_core::{CollectingReporter, Patch, Registry};
use schema_uri::SchemaUri;

#[derive(Debug, Clone)]
enum Node {
    Leaf(&'static str),
    Ref(schema_core::Key),
}

fn walk(registry: &Registry<Node>, key: schema_core::Key, reporter: &mut CollectingReporter) {
    match registry.get(key) {
        Some(Node::Leaf(message)) => reporter.error(schema_core::ValidationOutput::new("", *message, "leaf", "#")),
        Some(Node::Ref(target)) => walk(registry, *target, reporter),
        None => {}
    }
}

#[test]
fn forward_reference_resolves_once_the_target_slot_is_filled() {
    let mut registry: Registry<Node> = Registry::new();
    // `a` is reserved and wired to `leaf`'s key before `leaf` has content,
    // the same forward-reference shape a `$ref` to a later sibling produces.
    let leaf = registry.reserve(Node::Leaf("placeholder"));
    let a = registry.reserve(Node::Ref(leaf));
    registry.fill(leaf, Node::Leaf("resolved"));

    let mut reporter = CollectingReporter::new();
    walk(&registry, a, &mut reporter);
    assert_eq!(reporter.len(), 1);
    assert_eq!(reporter.outputs()[0].message, "resolved");
}

#[test]
fn a_node_can_reference_itself_without_the_arena_caring() {
    // The registry only stores indices; a self-referential `Key` (the shape
    // a cyclic `$ref` produces) is representable even though evaluating it
    // is the keyword layer's problem, not the arena's.
    let mut registry: Registry<Node> = Registry::new();
    let key = registry.reserve(Node::Leaf("placeholder"));
    registry.fill(key, Node::Ref(key));
    assert!(matches!(registry.get(key), Some(Node::Ref(k)) if *k == key));
}

#[test]
fn uri_binding_and_ref_resolution_round_trip() {
    let mut registry: Registry<Node> = Registry::new();
    let root_uri = SchemaUri::parse("https://example.com/schema.json").unwrap();
    let def_uri = SchemaUri::parse("https://example.com/schema.json#/definitions/pos").unwrap();

    let def_key = registry.insert(def_uri.clone(), Node::Leaf("definitions/pos")).unwrap();
    registry.insert(root_uri.clone(), Node::Ref(def_key)).unwrap();

    let resolved_root = registry.resolve(&root_uri).unwrap();
    let mut reporter = CollectingReporter::new();
    walk(&registry, resolved_root, &mut reporter);
    assert_eq!(reporter.len(), 1);
    assert_eq!(reporter.outputs()[0].message, "definitions/pos");
}

#[test]
fn patch_ops_render_in_append_order_as_json_patch() {
    let mut patch = Patch::new();
    patch.add("/a", serde_json::json!(1));
    patch.add("/b", serde_json::json!("two"));
    assert_eq!(
        patch.to_json(),
        serde_json::json!([
            { "op": "add", "path": "/a", "value": 1 },
            { "op": "add", "path": "/b", "value": "two" },
        ])
    );
}
