//! The schema builder (§4.5): turns a JSON Schema document into a populated
//! [`Registry`]. Runs in two passes over the same tree — a scan pass that
//! reserves a registry slot (and binds every absolute URI) for each
//! reachable schema location, then a compile pass that fills each slot's
//! content and resolves `$ref` against the now-complete URI table. This
//! mirrors a compile/scan/resolve split without carrying the teacher's
//! generic multi-dialect `Keyword` plugin machinery.

use std::collections::HashMap;

use schema_core::{Key, Registry};
use schema_uri::{SchemaUri, Step};
use serde_json::{Map, Value};

use schema_core::error::UnresolvedReferenceCtx;

use crate::error::{BuildError, InvalidPatternCtx, InvalidSchemaShapeCtx};
use crate::keyword::array::{ArrayNode, Items};
use crate::keyword::number::NumberNode;
use crate::keyword::object::{Dependency, ObjectNode};
use crate::keyword::string::{CompiledPattern, StringNode};
use crate::node::{Conditional, ConstNode, EnumNode, Kind, KindSet, Node, TypeNode};
use crate::options::{RefResolution, ValidateOptions};

/// Identifies a freshly compiled document when the caller supplies no
/// `$id` for the root schema.
pub const DEFAULT_ROOT_URI: &str = "mem://schema";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Scan,
    Compile,
}

struct Builder {
    root_uri: SchemaUri,
    registry: Registry<Node>,
    location_keys: HashMap<String, Key>,
    options: ValidateOptions,
}

/// Compiles `schema` into a registry, returning the handle for the root
/// schema. Uses [`DEFAULT_ROOT_URI`] as the root's base when the document
/// declares no top-level `$id`.
pub fn compile(schema: &Value) -> Result<(Registry<Node>, Key), BuildError> {
    compile_with_base(schema, DEFAULT_ROOT_URI)
}

/// Compiles `schema` against an explicit root base URI, so callers can
/// register it under a meaningful identifier before compiling schemas that
/// `$ref` it.
pub fn compile_with_base(schema: &Value, base: &str) -> Result<(Registry<Node>, Key), BuildError> {
    compile_with_options(schema, base, &ValidateOptions::default())
}

/// Compiles `schema` honoring `options` — which `format` checkers are
/// registered, and how eagerly a dangling `$ref` is reported (§2 ambient
/// stack, "Configuration").
pub fn compile_with_options(schema: &Value, base: &str, options: &ValidateOptions) -> Result<(Registry<Node>, Key), BuildError> {
    let root_uri = SchemaUri::parse(base)?;
    let mut builder = Builder {
        root_uri: root_uri.clone(),
        registry: Registry::new(),
        location_keys: HashMap::new(),
        options: options.clone(),
    };
    let ambient = vec![root_uri];
    builder.visit(schema, "", &ambient, Mode::Scan)?;
    let root_key = builder.visit(schema, "", &ambient, Mode::Compile)?;
    let registry = builder.registry.freeze()?;
    Ok((registry, root_key))
}

impl Builder {
    fn rebase(&self, value: &Value, ambient: &[SchemaUri]) -> Result<Vec<SchemaUri>, BuildError> {
        if let Value::Object(map) = value {
            if let Some(Value::String(id)) = map.get("$id") {
                let primary = ambient.first().cloned().unwrap_or_else(|| self.root_uri.clone());
                // A fresh `$id` starts a new base; the ambient JSON Pointer
                // location must not leak into it the way `resolve` otherwise
                // preserves it for a plain (non-`$id`) pointer step.
                let rebased = primary.without_identifier().resolve(id)?;
                let mut result = vec![rebased];
                result.extend(ambient.iter().cloned());
                return Ok(result);
            }
        }
        Ok(ambient.to_vec())
    }

    fn visit(
        &mut self,
        value: &Value,
        pointer: &str,
        ambient: &[SchemaUri],
        mode: Mode,
    ) -> Result<Key, BuildError> {
        let base_uris = self.rebase(value, ambient)?;

        let key = match mode {
            Mode::Scan => {
                let key = self.registry.reserve(Node::True);
                self.location_keys.insert(pointer.to_string(), key);
                for uri in &base_uris {
                    self.registry.bind_uri(uri.clone(), key)?;
                }
                key
            }
            Mode::Compile => *self
                .location_keys
                .get(pointer)
                .expect("scan pass must have visited every location the compile pass visits"),
        };

        let map = match value {
            Value::Object(map) => map,
            Value::Bool(b) => {
                if mode == Mode::Compile {
                    self.registry.fill(key, if *b { Node::True } else { Node::False });
                }
                return Ok(key);
            }
            other => {
                return InvalidSchemaShapeCtx { location: pointer.to_string(), found: value_kind_name(other) }.fail();
            }
        };

        // `definitions` entries are registered unconditionally: they carry
        // no validation semantics of their own but are legal `$ref` targets.
        let _definitions = self.visit_map_field(map, "definitions", pointer, &base_uris, mode)?;

        if let Some(Value::String(reference)) = map.get("$ref") {
            if mode == Mode::Compile {
                let nearest = base_uris.first().cloned().unwrap_or_else(|| self.root_uri.clone());
                let target_uri = nearest.resolve(reference)?;
                let target_key = match self.registry.resolve(&target_uri) {
                    Some(existing) => existing,
                    None if self.options.ref_resolution() == RefResolution::Eager => {
                        return UnresolvedReferenceCtx { uri: target_uri.to_string() }.fail().map_err(Into::into);
                    }
                    None => {
                        let placeholder = self.registry.reserve(Node::True);
                        self.registry.bind_uri(target_uri.clone(), placeholder)?;
                        self.registry.record_pending(target_uri);
                        placeholder
                    }
                };
                self.registry.fill(key, Node::Ref(target_key));
            }
            // draft-07: sibling keywords next to `$ref` are ignored.
            return Ok(key);
        }

        let properties = self.visit_map_field(map, "properties", pointer, &base_uris, mode)?;
        let pattern_properties = self.visit_map_field(map, "patternProperties", pointer, &base_uris, mode)?;

        let all_of = self.visit_array_field(map, "allOf", pointer, &base_uris, mode)?;
        let any_of = self.visit_array_field(map, "anyOf", pointer, &base_uris, mode)?;
        let one_of = self.visit_array_field(map, "oneOf", pointer, &base_uris, mode)?;

        let additional_properties = self.visit_single_field(map, "additionalProperties", pointer, &base_uris, mode)?;
        let additional_items = self.visit_single_field(map, "additionalItems", pointer, &base_uris, mode)?;
        let contains = self.visit_single_field(map, "contains", pointer, &base_uris, mode)?;
        let property_names = self.visit_single_field(map, "propertyNames", pointer, &base_uris, mode)?;
        let not = self.visit_single_field(map, "not", pointer, &base_uris, mode)?;
        let if_ = self.visit_single_field(map, "if", pointer, &base_uris, mode)?;
        let then = self.visit_single_field(map, "then", pointer, &base_uris, mode)?;
        let else_ = self.visit_single_field(map, "else", pointer, &base_uris, mode)?;

        let items = match map.get("items") {
            None => ItemsVisit::None,
            Some(Value::Array(list)) => {
                let items_base = step_all(&base_uris, Step::Field("items"));
                let mut keys = Vec::with_capacity(list.len());
                for (index, sub) in list.iter().enumerate() {
                    let child_ptr = format!("{pointer}/items/{index}");
                    let child_base = step_all(&items_base, Step::Index(index));
                    keys.push(self.visit(sub, &child_ptr, &child_base, mode)?);
                }
                ItemsVisit::Tuple(keys)
            }
            Some(sub) => {
                let child_ptr = format!("{pointer}/items");
                let child_base = step_all(&base_uris, Step::Field("items"));
                ItemsVisit::Single(self.visit(sub, &child_ptr, &child_base, mode)?)
            }
        };

        let mut dependencies = Vec::new();
        if let Some(Value::Object(deps)) = map.get("dependencies") {
            let deps_base = step_all(&base_uris, Step::Field("dependencies"));
            for (name, dep_value) in deps {
                match dep_value {
                    Value::Array(names) => {
                        let names: Vec<String> =
                            names.iter().filter_map(|v| v.as_str().map(String::from)).collect();
                        dependencies.push((name.clone(), DependencyVisit::Required(names)));
                    }
                    _ => {
                        let child_ptr = format!("{pointer}/dependencies/{}", escape_token(name));
                        let child_base = step_all(&deps_base, Step::Field(name.as_str()));
                        let dep_key = self.visit(dep_value, &child_ptr, &child_base, mode)?;
                        dependencies.push((name.clone(), DependencyVisit::Schema(dep_key)));
                    }
                }
            }
        }

        if mode == Mode::Compile {
            let type_node = build_type_node(
                map,
                pointer,
                &base_uris,
                properties,
                pattern_properties,
                all_of,
                any_of,
                one_of,
                additional_properties,
                additional_items,
                contains,
                property_names,
                not,
                if_,
                then,
                else_,
                items,
                dependencies,
                &self.options,
            )?;
            self.registry.fill(key, Node::Type(Box::new(type_node)));
        }

        Ok(key)
    }

    fn visit_map_field(
        &mut self,
        map: &Map<String, Value>,
        field: &str,
        pointer: &str,
        base_uris: &[SchemaUri],
        mode: Mode,
    ) -> Result<Vec<(String, Key)>, BuildError> {
        let Some(Value::Object(entries)) = map.get(field) else {
            return Ok(Vec::new());
        };
        let field_base = step_all(base_uris, Step::Field(field));
        let mut out = Vec::with_capacity(entries.len());
        for (name, sub) in entries {
            let child_ptr = format!("{pointer}/{field}/{}", escape_token(name));
            let child_base = step_all(&field_base, Step::Field(name.as_str()));
            let key = self.visit(sub, &child_ptr, &child_base, mode)?;
            out.push((name.clone(), key));
        }
        Ok(out)
    }

    fn visit_array_field(
        &mut self,
        map: &Map<String, Value>,
        field: &str,
        pointer: &str,
        base_uris: &[SchemaUri],
        mode: Mode,
    ) -> Result<Vec<Key>, BuildError> {
        let Some(Value::Array(list)) = map.get(field) else {
            return Ok(Vec::new());
        };
        let field_base = step_all(base_uris, Step::Field(field));
        let mut out = Vec::with_capacity(list.len());
        for (index, sub) in list.iter().enumerate() {
            let child_ptr = format!("{pointer}/{field}/{index}");
            let child_base = step_all(&field_base, Step::Index(index));
            out.push(self.visit(sub, &child_ptr, &child_base, mode)?);
        }
        Ok(out)
    }

    fn visit_single_field(
        &mut self,
        map: &Map<String, Value>,
        field: &str,
        pointer: &str,
        base_uris: &[SchemaUri],
        mode: Mode,
    ) -> Result<Option<Key>, BuildError> {
        let Some(sub) = map.get(field) else {
            return Ok(None);
        };
        let child_ptr = format!("{pointer}/{field}");
        let child_base = step_all(base_uris, Step::Field(field));
        Ok(Some(self.visit(sub, &child_ptr, &child_base, mode)?))
    }
}

enum ItemsVisit {
    None,
    Single(Key),
    Tuple(Vec<Key>),
}

enum DependencyVisit {
    Required(Vec<String>),
    Schema(Key),
}

fn step_all<'a>(base_uris: &[SchemaUri], step: Step<'a>) -> Vec<SchemaUri> {
    base_uris.iter().map(|u| u.append(step)).collect()
}

fn escape_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn value_kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[allow(clippy::too_many_arguments)]
fn build_type_node(
    map: &Map<String, Value>,
    pointer: &str,
    base_uris: &[SchemaUri],
    properties: Vec<(String, Key)>,
    pattern_properties: Vec<(String, Key)>,
    all_of: Vec<Key>,
    any_of: Vec<Key>,
    one_of: Vec<Key>,
    additional_properties: Option<Key>,
    additional_items: Option<Key>,
    contains: Option<Key>,
    property_names: Option<Key>,
    not: Option<Key>,
    if_: Option<Key>,
    then: Option<Key>,
    else_: Option<Key>,
    items: ItemsVisit,
    dependencies: Vec<(String, DependencyVisit)>,
    options: &ValidateOptions,
) -> Result<TypeNode, BuildError> {
    let absolute_keyword_location =
        base_uris.first().map(ToString::to_string).unwrap_or_default();

    let type_names: Vec<String> = match map.get("type") {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(list)) => list.iter().filter_map(|v| v.as_str().map(String::from)).collect(),
        _ => Vec::new(),
    };
    let allowed_kinds = if type_names.is_empty() { None } else { Some(KindSet::from_type_names(&type_names)) };
    let type_includes = |kind: Kind| allowed_kinds.map_or(true, |set| set.contains(kind));

    let string = if type_includes(Kind::String)
        && (allowed_kinds.is_some()
            || map.contains_key("minLength")
            || map.contains_key("maxLength")
            || map.contains_key("pattern")
            || map.contains_key("format")
            || map.contains_key("contentEncoding")
            || map.contains_key("contentMediaType"))
    {
        Some(build_string_node(map, pointer, options)?)
    } else {
        None
    };

    let number = if type_includes(Kind::Number)
        && (allowed_kinds.is_some()
            || map.contains_key("minimum")
            || map.contains_key("maximum")
            || map.contains_key("exclusiveMinimum")
            || map.contains_key("exclusiveMaximum")
            || map.contains_key("multipleOf"))
    {
        Some(build_number_node(map, &type_names))
    } else {
        None
    };

    let object = if type_includes(Kind::Object)
        && (allowed_kinds.is_some()
            || !properties.is_empty()
            || !pattern_properties.is_empty()
            || map.contains_key("required")
            || map.contains_key("maxProperties")
            || map.contains_key("minProperties")
            || map.contains_key("dependencies")
            || property_names.is_some()
            || additional_properties.is_some())
    {
        Some(build_object_node(
            map,
            pointer,
            properties,
            pattern_properties,
            additional_properties,
            property_names,
            dependencies,
        )?)
    } else {
        None
    };

    let array = if type_includes(Kind::Array)
        && (allowed_kinds.is_some()
            || !matches!(items, ItemsVisit::None)
            || additional_items.is_some()
            || contains.is_some()
            || map.contains_key("maxItems")
            || map.contains_key("minItems")
            || map.contains_key("uniqueItems"))
    {
        Some(build_array_node(map, items, additional_items, contains))
    } else {
        None
    };

    let enum_ = map.get("enum").and_then(Value::as_array).map(|values| EnumNode { values: values.clone() });
    let const_ = map.get("const").cloned().map(|value| ConstNode { value });
    let conditional = if_.map(|if_key| Conditional { if_: if_key, then, else_ });

    Ok(TypeNode {
        absolute_keyword_location,
        allowed_kinds,
        type_names,
        string,
        number,
        object,
        array,
        enum_,
        const_,
        not,
        all_of,
        any_of,
        one_of,
        conditional,
        default: map.get("default").cloned(),
        read_only: map.get("readOnly").and_then(Value::as_bool).unwrap_or(false),
        write_only: map.get("writeOnly").and_then(Value::as_bool).unwrap_or(false),
    })
}

fn build_string_node(map: &Map<String, Value>, pointer: &str, options: &ValidateOptions) -> Result<StringNode, BuildError> {
    let pattern = match map.get("pattern").and_then(Value::as_str) {
        Some(source) => {
            let regex = fancy_regex::Regex::new(source).map_err(|e| {
                InvalidPatternCtx { location: pointer.to_string(), pattern: source.to_string(), message: e.to_string() }
                    .build()
            })?;
            Some(CompiledPattern { source: source.to_string(), regex })
        }
        None => None,
    };
    // A `format` name outside the caller's enabled set is treated exactly
    // like an unrecognized name: parsed as an annotation, never asserted.
    let format = map
        .get("format")
        .and_then(Value::as_str)
        .and_then(crate::format::Format::from_name)
        .filter(|f| options.is_format_enabled(*f));
    Ok(StringNode {
        min_length: map.get("minLength").and_then(Value::as_u64).map(|n| n as usize),
        max_length: map.get("maxLength").and_then(Value::as_u64).map(|n| n as usize),
        pattern,
        format,
        content_encoding: map.get("contentEncoding").and_then(Value::as_str).map(String::from),
        content_media_type: map.get("contentMediaType").and_then(Value::as_str).map(String::from),
    })
}

fn build_number_node(map: &Map<String, Value>, type_names: &[String]) -> NumberNode {
    let has_integer = type_names.iter().any(|t| t == "integer");
    let has_number = type_names.iter().any(|t| t == "number");
    NumberNode {
        require_integer: has_integer && !has_number,
        minimum: map.get("minimum").and_then(Value::as_f64),
        maximum: map.get("maximum").and_then(Value::as_f64),
        exclusive_minimum: map.get("exclusiveMinimum").and_then(Value::as_f64),
        exclusive_maximum: map.get("exclusiveMaximum").and_then(Value::as_f64),
        multiple_of: map.get("multipleOf").and_then(Value::as_f64),
    }
}

fn build_object_node(
    map: &Map<String, Value>,
    pointer: &str,
    properties: Vec<(String, Key)>,
    pattern_properties: Vec<(String, Key)>,
    additional_properties: Option<Key>,
    property_names: Option<Key>,
    dependencies: Vec<(String, DependencyVisit)>,
) -> Result<ObjectNode, BuildError> {
    let mut compiled_pattern_properties = Vec::with_capacity(pattern_properties.len());
    for (source, key) in pattern_properties {
        let regex = fancy_regex::Regex::new(&source).map_err(|e| {
            InvalidPatternCtx { location: pointer.to_string(), pattern: source.clone(), message: e.to_string() }.build()
        })?;
        compiled_pattern_properties.push((CompiledPattern { source, regex }, key));
    }

    let required: Vec<String> = map
        .get("required")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(|v| v.as_str().map(String::from)).collect())
        .unwrap_or_default();

    let deps = dependencies
        .into_iter()
        .map(|(name, dep)| {
            let dep = match dep {
                DependencyVisit::Required(names) => Dependency::Required(names),
                DependencyVisit::Schema(key) => Dependency::Schema(key),
            };
            (name, dep)
        })
        .collect();

    Ok(ObjectNode {
        max_properties: map.get("maxProperties").and_then(Value::as_u64).map(|n| n as usize),
        min_properties: map.get("minProperties").and_then(Value::as_u64).map(|n| n as usize),
        required,
        properties: properties.into_iter().collect(),
        pattern_properties: compiled_pattern_properties,
        additional_properties,
        dependencies: deps,
        property_names,
    })
}

fn build_array_node(
    map: &Map<String, Value>,
    items: ItemsVisit,
    additional_items: Option<Key>,
    contains: Option<Key>,
) -> ArrayNode {
    let items = match items {
        ItemsVisit::None => Items::None,
        ItemsVisit::Single(key) => Items::Single(key),
        ItemsVisit::Tuple(keys) => Items::Tuple(keys),
    };
    ArrayNode {
        max_items: map.get("maxItems").and_then(Value::as_u64).map(|n| n as usize),
        min_items: map.get("minItems").and_then(Value::as_u64).map(|n| n as usize),
        unique_items: map.get("uniqueItems").and_then(Value::as_bool).unwrap_or(false),
        items,
        additional_items,
        contains,
    }
}
