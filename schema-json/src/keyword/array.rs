//! `array` keyword set (§4.4.5): `items` (single schema or tuple list),
//! `additionalItems`, `contains`, and `uniqueItems` structural comparison.

use schema_core::{CollectingReporter, Key, Patch, Registry, Reporter, ValidationOutput};
use serde_json::Value;

use crate::node::{validate_node, Node};

#[derive(Debug, Clone)]
pub enum Items {
    None,
    Single(Key),
    Tuple(Vec<Key>),
}

impl Default for Items {
    fn default() -> Self {
        Items::None
    }
}

#[derive(Debug, Clone, Default)]
pub struct ArrayNode {
    pub max_items: Option<usize>,
    pub min_items: Option<usize>,
    pub unique_items: bool,
    pub items: Items,
    pub additional_items: Option<Key>,
    pub contains: Option<Key>,
}

impl ArrayNode {
    pub fn validate(
        &self,
        registry: &Registry<Node>,
        instance: &Value,
        location: &str,
        absolute_keyword_location: &str,
        reporter: &mut dyn Reporter,
        patch: &mut Patch,
    ) {
        let Value::Array(items) = instance else { return };

        if let Some(max) = self.max_items {
            if items.len() > max {
                reporter.error(ValidationOutput::new(
                    location,
                    format!("array has {} items, expected at most {max}", items.len()),
                    "maxItems",
                    absolute_keyword_location,
                ));
            }
        }
        if let Some(min) = self.min_items {
            if items.len() < min {
                reporter.error(ValidationOutput::new(
                    location,
                    format!("array has {} items, expected at least {min}", items.len()),
                    "minItems",
                    absolute_keyword_location,
                ));
            }
        }
        if self.unique_items {
            if let Some((i, j)) = first_duplicate(items) {
                reporter.error(ValidationOutput::new(
                    location,
                    format!("items at index {i} and {j} are duplicates"),
                    "uniqueItems",
                    absolute_keyword_location,
                ));
            }
        }

        match &self.items {
            Items::None => {}
            Items::Single(key) => {
                for (index, item) in items.iter().enumerate() {
                    let child_location = format!("{location}/{index}");
                    validate_node(registry, *key, item, &child_location, reporter, patch);
                }
            }
            Items::Tuple(schemas) => {
                for (index, item) in items.iter().enumerate() {
                    let child_location = format!("{location}/{index}");
                    if let Some(key) = schemas.get(index) {
                        validate_node(registry, *key, item, &child_location, reporter, patch);
                    } else if let Some(additional_key) = self.additional_items {
                        validate_node(registry, additional_key, item, &child_location, reporter, patch);
                    }
                }
            }
        }

        if let Some(contains_key) = self.contains {
            let mut any_matches = false;
            let mut collected = Vec::new();
            for (index, item) in items.iter().enumerate() {
                let mut scratch = CollectingReporter::new();
                let mut scratch_patch = Patch::new();
                let child_location = format!("{location}/{index}");
                validate_node(registry, contains_key, item, &child_location, &mut scratch, &mut scratch_patch);
                if scratch.is_empty() {
                    any_matches = true;
                    break;
                }
                collected.extend(scratch.into_outputs());
            }
            if !any_matches {
                reporter.error(
                    ValidationOutput::new(
                        location,
                        "no item matches the \"contains\" schema",
                        "contains",
                        absolute_keyword_location,
                    )
                    .with_nested(collected),
                );
            }
        }
    }
}

fn first_duplicate(items: &[Value]) -> Option<(usize, usize)> {
    for i in 0..items.len() {
        for j in (i + 1)..items.len() {
            if items[i] == items[j] {
                return Some((i, j));
            }
        }
    }
    None
}
