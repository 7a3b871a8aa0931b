//! `object` keyword set (§4.4.4): `properties`, `patternProperties`,
//! `additionalProperties`, `required`, `dependencies`, `propertyNames`, and
//! default-value patch generation for properties missing from the instance.

use indexmap::IndexMap;

use schema_core::{Key, Patch, Registry, Reporter, ValidationOutput};
use serde_json::Value;

use crate::keyword::string::CompiledPattern;
use crate::node::{default_value, validate_node, Node};

#[derive(Debug, Clone)]
pub enum Dependency {
    Required(Vec<String>),
    Schema(Key),
}

#[derive(Debug, Clone, Default)]
pub struct ObjectNode {
    pub max_properties: Option<usize>,
    pub min_properties: Option<usize>,
    pub required: Vec<String>,
    pub properties: IndexMap<String, Key>,
    pub pattern_properties: Vec<(CompiledPattern, Key)>,
    pub additional_properties: Option<Key>,
    pub dependencies: IndexMap<String, Dependency>,
    pub property_names: Option<Key>,
}

impl ObjectNode {
    pub fn validate(
        &self,
        registry: &Registry<Node>,
        instance: &Value,
        location: &str,
        absolute_keyword_location: &str,
        reporter: &mut dyn Reporter,
        patch: &mut Patch,
    ) {
        let Value::Object(map) = instance else { return };

        if let Some(max) = self.max_properties {
            if map.len() > max {
                reporter.error(ValidationOutput::new(
                    location,
                    format!("object has {} properties, expected at most {max}", map.len()),
                    "maxProperties",
                    absolute_keyword_location,
                ));
            }
        }
        if let Some(min) = self.min_properties {
            if map.len() < min {
                reporter.error(ValidationOutput::new(
                    location,
                    format!("object has {} properties, expected at least {min}", map.len()),
                    "minProperties",
                    absolute_keyword_location,
                ));
            }
        }

        let missing: Vec<&String> = self.required.iter().filter(|name| !map.contains_key(*name)).collect();
        if !missing.is_empty() {
            reporter.error(ValidationOutput::new(
                location,
                format!("missing required properties: {}", missing.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")),
                "required",
                absolute_keyword_location,
            ));
        }

        // Walked in the instance's own key order, matching each property
        // against `properties` and every `patternProperties` entry before
        // falling back to `additionalProperties`, per the traversal order
        // the combinator keywords rely on for deterministic error output.
        for (name, value) in map {
            if let Some(names_key) = self.property_names {
                let name_value = Value::String(name.clone());
                validate_node(registry, names_key, &name_value, location, reporter, patch);
            }

            let mut matched = false;
            let child_location = format!("{location}/{}", escape_pointer_token(name));

            if let Some(key) = self.properties.get(name) {
                matched = true;
                validate_node(registry, *key, value, &child_location, reporter, patch);
            }
            for (pattern, key) in &self.pattern_properties {
                if pattern.regex.is_match(name).unwrap_or(false) {
                    matched = true;
                    validate_node(registry, *key, value, &child_location, reporter, patch);
                }
            }
            if !matched {
                if let Some(additional_key) = self.additional_properties {
                    let mut scratch = schema_core::CollectingReporter::new();
                    validate_node(registry, additional_key, value, &child_location, &mut scratch, patch);
                    if !scratch.is_empty() {
                        reporter.error(ValidationOutput::new(
                            child_location.clone(),
                            format!("additional property \"{name}\" found but was invalid"),
                            "additionalProperties",
                            absolute_keyword_location,
                        ));
                    }
                }
            }
        }

        for (name, key) in &self.properties {
            if !map.contains_key(name) && !self.required.contains(name) {
                if let Some(default) = default_value(registry, *key) {
                    patch.add(format!("{location}/{}", escape_pointer_token(name)), default);
                }
            }
        }

        for (name, dependency) in &self.dependencies {
            if !map.contains_key(name) {
                continue;
            }
            match dependency {
                Dependency::Required(names) => {
                    let missing: Vec<&String> = names.iter().filter(|n| !map.contains_key(*n)).collect();
                    if !missing.is_empty() {
                        reporter.error(ValidationOutput::new(
                            location,
                            format!(
                                "\"{name}\" requires properties: {}",
                                missing.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
                            ),
                            "dependencies",
                            absolute_keyword_location,
                        ));
                    }
                }
                Dependency::Schema(key) => {
                    validate_node(registry, *key, instance, location, reporter, patch);
                }
            }
        }
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}
