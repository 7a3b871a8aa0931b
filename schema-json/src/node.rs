//! The validator node graph: a tagged sum rather than dynamic dispatch, per
//! the single-threaded, no-suspension-point evaluation model this crate
//! targets. One [`Node`] per registry slot; `TypeNode` is the dispatcher
//! every non-trivial schema compiles into, fanning out to a kind-specific
//! sub-validator exactly as JSON Schema's own "applicable if instance kind
//! matches" semantics require.

use schema_core::{Key, Patch, Registry, Reporter, ValidationOutput};
use serde_json::Value;

use crate::keyword::array::ArrayNode;
use crate::keyword::number::NumberNode;
use crate::keyword::object::ObjectNode;
use crate::keyword::string::StringNode;

/// One of the six JSON value kinds the `type` keyword names. `integer` and
/// `number` both dispatch to `Kind::Number`; which numeric flavor a
/// `NumberNode` enforces is a property of the node, not the kind table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    String,
    Number,
    Array,
    Object,
}

impl Kind {
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Number => "number",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(Self::Null),
            "boolean" => Some(Self::Boolean),
            "string" => Some(Self::String),
            "integer" | "number" => Some(Self::Number),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }
}

/// A bitset over [`Kind`], the concrete realization of the "array indexed by
/// the JSON kind tag" dispatch table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindSet(u8);

impl KindSet {
    #[must_use]
    pub fn from_type_names(names: &[String]) -> Self {
        let mut set = Self::default();
        for name in names {
            if let Some(kind) = Kind::from_type_name(name) {
                set.insert(kind);
            }
        }
        set
    }

    pub fn insert(&mut self, kind: Kind) {
        self.0 |= 1 << (kind as u8);
    }

    #[must_use]
    pub fn contains(self, kind: Kind) -> bool {
        self.0 & (1 << (kind as u8)) != 0
    }
}

/// A compiled `const` assertion.
#[derive(Debug, Clone)]
pub struct ConstNode {
    pub value: Value,
}

/// A compiled `enum` assertion.
#[derive(Debug, Clone)]
pub struct EnumNode {
    pub values: Vec<Value>,
}

/// A compiled `if`/`then`/`else` triple.
#[derive(Debug, Clone)]
pub struct Conditional {
    pub if_: Key,
    pub then: Option<Key>,
    pub else_: Option<Key>,
}

/// The dispatcher every non-boolean, non-`$ref` schema compiles into.
#[derive(Debug, Clone, Default)]
pub struct TypeNode {
    pub absolute_keyword_location: String,
    pub allowed_kinds: Option<KindSet>,
    pub type_names: Vec<String>,

    pub string: Option<StringNode>,
    pub number: Option<NumberNode>,
    pub object: Option<ObjectNode>,
    pub array: Option<ArrayNode>,

    pub enum_: Option<EnumNode>,
    pub const_: Option<ConstNode>,

    pub not: Option<Key>,
    pub all_of: Vec<Key>,
    pub any_of: Vec<Key>,
    pub one_of: Vec<Key>,
    pub conditional: Option<Conditional>,

    pub default: Option<Value>,
    pub read_only: bool,
    pub write_only: bool,
}

/// A registry slot: either a trivial boolean schema, a `$ref` indirection to
/// another slot, or a fully dispatched [`TypeNode`].
#[derive(Debug, Clone)]
pub enum Node {
    True,
    False,
    Ref(Key),
    Type(Box<TypeNode>),
}

impl Default for Node {
    fn default() -> Self {
        Node::True
    }
}

/// Reads the `default` value reachable through `$ref` and `not` indirection,
/// the only two node shapes the default-value contract forwards through.
#[must_use]
pub fn default_value(registry: &Registry<Node>, key: Key) -> Option<Value> {
    match registry.get(key)? {
        Node::Type(node) => node.default.clone().or_else(|| {
            node.not.and_then(|inner| default_value(registry, inner))
        }),
        Node::Ref(target) => default_value(registry, *target),
        Node::True | Node::False => None,
    }
}

/// Validates `instance` at `location` against the schema registered under
/// `key`, reporting failures to `reporter` and accumulating default-value
/// insertions into `patch`.
pub fn validate_node(
    registry: &Registry<Node>,
    key: Key,
    instance: &Value,
    location: &str,
    reporter: &mut dyn Reporter,
    patch: &mut Patch,
) {
    let Some(node) = registry.get(key) else {
        return;
    };
    match node {
        Node::True => {}
        Node::False => {
            reporter.error(ValidationOutput::new(
                location,
                "false schema never validates",
                "false",
                "",
            ));
        }
        Node::Ref(target) => validate_node(registry, *target, instance, location, reporter, patch),
        Node::Type(type_node) => validate_type_node(registry, type_node, instance, location, reporter, patch),
    }
}

fn validate_type_node(
    registry: &Registry<Node>,
    node: &TypeNode,
    instance: &Value,
    location: &str,
    reporter: &mut dyn Reporter,
    patch: &mut Patch,
) {
    let kind = Kind::of(instance);

    if let Some(allowed) = node.allowed_kinds {
        if !allowed.contains(kind) {
            reporter.error(ValidationOutput::new(
                location,
                format!(
                    "expected {}, found {}",
                    node.type_names.join(" or "),
                    kind.name()
                ),
                "type",
                &node.absolute_keyword_location,
            ));
        }
    }

    match (kind, &node.string) {
        (Kind::String, Some(string_node)) => {
            string_node.validate(instance, location, &node.absolute_keyword_location, reporter);
        }
        _ => {}
    }
    match (kind, &node.number) {
        (Kind::Number, Some(number_node)) => {
            number_node.validate(instance, location, &node.absolute_keyword_location, reporter);
        }
        _ => {}
    }
    match (kind, &node.object) {
        (Kind::Object, Some(object_node)) => {
            object_node.validate(registry, instance, location, &node.absolute_keyword_location, reporter, patch);
        }
        _ => {}
    }
    match (kind, &node.array) {
        (Kind::Array, Some(array_node)) => {
            array_node.validate(registry, instance, location, &node.absolute_keyword_location, reporter, patch);
        }
        _ => {}
    }

    if let Some(enum_) = &node.enum_ {
        if !enum_.values.iter().any(|v| v == instance) {
            reporter.error(ValidationOutput::new(
                location,
                "instance is not one of the enumerated values",
                "enum",
                &node.absolute_keyword_location,
            ));
        }
    }
    if let Some(const_) = &node.const_ {
        if &const_.value != instance {
            reporter.error(ValidationOutput::new(
                location,
                "instance does not equal the const value",
                "const",
                &node.absolute_keyword_location,
            ));
        }
    }

    if let Some(not_key) = node.not {
        let mut scratch = schema_core::CollectingReporter::new();
        let mut scratch_patch = Patch::new();
        validate_node(registry, not_key, instance, location, &mut scratch, &mut scratch_patch);
        if scratch.is_empty() {
            reporter.error(ValidationOutput::new(
                location,
                "instance must not validate against the \"not\" schema",
                "not",
                &node.absolute_keyword_location,
            ));
        }
    }

    for (index, all_of_key) in node.all_of.iter().enumerate() {
        let mut scratch = schema_core::CollectingReporter::new();
        validate_node(registry, *all_of_key, instance, location, &mut scratch, patch);
        if !scratch.is_empty() {
            reporter.error(
                ValidationOutput::new(
                    location,
                    format!("instance failed allOf branch {index}"),
                    "allOf",
                    &node.absolute_keyword_location,
                )
                .with_nested(scratch.into_outputs()),
            );
        }
    }

    if !node.any_of.is_empty() {
        let mut any_passed = false;
        let mut all_failures = Vec::new();
        for any_of_key in &node.any_of {
            let mut scratch = schema_core::CollectingReporter::new();
            let mut scratch_patch = Patch::new();
            validate_node(registry, *any_of_key, instance, location, &mut scratch, &mut scratch_patch);
            if scratch.is_empty() {
                any_passed = true;
                break;
            }
            all_failures.extend(scratch.into_outputs());
        }
        if !any_passed {
            reporter.error(
                ValidationOutput::new(
                    location,
                    "instance matched none of the anyOf branches",
                    "anyOf",
                    &node.absolute_keyword_location,
                )
                .with_nested(all_failures),
            );
        }
    }

    if !node.one_of.is_empty() {
        let mut matches = 0usize;
        for one_of_key in &node.one_of {
            let mut scratch = schema_core::CollectingReporter::new();
            let mut scratch_patch = Patch::new();
            validate_node(registry, *one_of_key, instance, location, &mut scratch, &mut scratch_patch);
            if scratch.is_empty() {
                matches += 1;
            }
        }
        if matches != 1 {
            reporter.error(ValidationOutput::new(
                location,
                format!("{matches} subschemas matched, but exactly one is required to match"),
                "oneOf",
                &node.absolute_keyword_location,
            ));
        }
    }

    if let Some(conditional) = &node.conditional {
        let mut scratch = schema_core::CollectingReporter::new();
        let mut scratch_patch = Patch::new();
        validate_node(registry, conditional.if_, instance, location, &mut scratch, &mut scratch_patch);
        let branch = if scratch.is_empty() { conditional.then } else { conditional.else_ };
        if let Some(branch_key) = branch {
            validate_node(registry, branch_key, instance, location, reporter, patch);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use schema_core::CollectingReporter;
    use serde_json::json;

    fn registry_with(node: Node) -> (Registry<Node>, Key) {
        let mut registry = Registry::new();
        let key = registry.reserve(node);
        (registry, key)
    }

    #[test]
    fn false_schema_always_fails() {
        let (registry, key) = registry_with(Node::False);
        let mut reporter = CollectingReporter::new();
        let mut patch = Patch::new();
        validate_node(&registry, key, &json!(1), "", &mut reporter, &mut patch);
        assert_eq!(reporter.len(), 1);
    }

    #[test]
    fn true_schema_always_passes() {
        let (registry, key) = registry_with(Node::True);
        let mut reporter = CollectingReporter::new();
        let mut patch = Patch::new();
        validate_node(&registry, key, &json!("anything"), "", &mut reporter, &mut patch);
        assert!(reporter.is_empty());
    }

    #[test]
    fn type_mismatch_reports_a_single_error() {
        let mut set = KindSet::default();
        set.insert(Kind::String);
        let node = TypeNode {
            allowed_kinds: Some(set),
            type_names: vec!["string".to_string()],
            ..Default::default()
        };
        let (registry, key) = registry_with(Node::Type(Box::new(node)));
        let mut reporter = CollectingReporter::new();
        let mut patch = Patch::new();
        validate_node(&registry, key, &json!(42), "", &mut reporter, &mut patch);
        assert_eq!(reporter.len(), 1);
        assert_eq!(reporter.outputs()[0].keyword, "type");
    }

    #[test]
    fn type_mismatch_does_not_suppress_sibling_enum_errors() {
        let mut set = KindSet::default();
        set.insert(Kind::String);
        let node = TypeNode {
            allowed_kinds: Some(set),
            type_names: vec!["string".to_string()],
            enum_: Some(EnumNode { values: vec![json!("a"), json!("b")] }),
            ..Default::default()
        };
        let (registry, key) = registry_with(Node::Type(Box::new(node)));
        let mut reporter = CollectingReporter::new();
        let mut patch = Patch::new();
        validate_node(&registry, key, &json!(42), "", &mut reporter, &mut patch);
        // Both the "type" mismatch and the "enum" mismatch surface; the
        // dispatch failure does not short-circuit the sibling assertions.
        assert_eq!(reporter.len(), 2);
        assert!(reporter.outputs().iter().any(|o| o.keyword == "type"));
        assert!(reporter.outputs().iter().any(|o| o.keyword == "enum"));
    }

    #[test]
    fn ref_indirection_delegates_to_target() {
        let mut registry: Registry<Node> = Registry::new();
        let target = registry.reserve(Node::False);
        let ref_key = registry.reserve(Node::Ref(target));
        let mut reporter = CollectingReporter::new();
        let mut patch = Patch::new();
        validate_node(&registry, ref_key, &json!(1), "", &mut reporter, &mut patch);
        assert_eq!(reporter.len(), 1);
    }

    #[test]
    fn not_rejects_instances_the_child_schema_accepts() {
        let mut registry: Registry<Node> = Registry::new();
        let child = registry.reserve(Node::True);
        let node = TypeNode { not: Some(child), ..Default::default() };
        let key = registry.reserve(Node::Type(Box::new(node)));
        let mut reporter = CollectingReporter::new();
        let mut patch = Patch::new();
        validate_node(&registry, key, &json!(1), "", &mut reporter, &mut patch);
        assert_eq!(reporter.len(), 1);
        assert_eq!(reporter.outputs()[0].keyword, "not");
    }

    #[test]
    fn one_of_requires_exactly_one_match() {
        let mut registry: Registry<Node> = Registry::new();
        let pass = registry.reserve(Node::True);
        let fail = registry.reserve(Node::False);
        let node_ambiguous =
            TypeNode { one_of: vec![pass, pass], ..Default::default() };
        let key = registry.reserve(Node::Type(Box::new(node_ambiguous)));
        let mut reporter = CollectingReporter::new();
        let mut patch = Patch::new();
        validate_node(&registry, key, &json!(1), "", &mut reporter, &mut patch);
        assert_eq!(reporter.len(), 1);
        assert_eq!(reporter.outputs()[0].keyword, "oneOf");

        let node_exact = TypeNode { one_of: vec![pass, fail], ..Default::default() };
        let key2 = registry.reserve(Node::Type(Box::new(node_exact)));
        let mut reporter2 = CollectingReporter::new();
        let mut patch2 = Patch::new();
        validate_node(&registry, key2, &json!(1), "", &mut reporter2, &mut patch2);
        assert!(reporter2.is_empty());
    }

    #[test]
    fn conditional_picks_then_or_else_branch() {
        let mut registry: Registry<Node> = Registry::new();
        let if_key = registry.reserve(Node::True);
        let then_key = registry.reserve(Node::False);
        let node = TypeNode {
            conditional: Some(Conditional { if_: if_key, then: Some(then_key), else_: None }),
            ..Default::default()
        };
        let key = registry.reserve(Node::Type(Box::new(node)));
        let mut reporter = CollectingReporter::new();
        let mut patch = Patch::new();
        validate_node(&registry, key, &json!(1), "", &mut reporter, &mut patch);
        assert_eq!(reporter.len(), 1);
    }

    #[test]
    fn default_value_forwards_through_not_and_ref() {
        let mut registry: Registry<Node> = Registry::new();
        let inner = registry.reserve(Node::Type(Box::new(TypeNode {
            default: Some(json!("x")),
            ..Default::default()
        })));
        let ref_key = registry.reserve(Node::Ref(inner));
        assert_eq!(default_value(&registry, ref_key), Some(json!("x")));
    }
}
