//! The public entrypoint (§6): compile a draft-07 schema once, then
//! validate any number of instances against it.

use schema_core::{Patch, Registry};
use serde_json::Value;
use tracing::debug;

use crate::builder;
use crate::error::BuildError;
use crate::node::{validate_node, Node};
use crate::options::ValidateOptions;

/// A compiled draft-07 schema, ready to validate instances.
pub struct Validator {
    registry: Registry<Node>,
    root: schema_core::Key,
}

/// The result of one [`Validator::validate`] call: every collected failure
/// plus the default-value patch accumulated while walking the schema.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<schema_core::ValidationOutput>,
    pub patch: Patch,
}

impl ValidationResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Validator {
    /// Compiles `schema`, logging the root registry size once compilation
    /// succeeds. Tracing is emitted only at this build boundary, not per
    /// keyword evaluation, to keep `validate` free of logging overhead.
    pub fn compile(schema: &Value) -> Result<Self, BuildError> {
        let (registry, root) = builder::compile(schema)?;
        debug!(schemas = registry.len(), "compiled draft-07 schema");
        Ok(Self { registry, root })
    }

    /// Compiles `schema` under an explicit root URI, so its subschemas are
    /// addressable by callers that compile other schemas referencing it.
    pub fn compile_with_base(schema: &Value, base: &str) -> Result<Self, BuildError> {
        let (registry, root) = builder::compile_with_base(schema, base)?;
        debug!(schemas = registry.len(), base, "compiled draft-07 schema");
        Ok(Self { registry, root })
    }

    /// Compiles `schema` under an explicit root URI and [`ValidateOptions`],
    /// the entrypoint for restricting `format` assertion or rejecting
    /// dangling `$ref`s eagerly instead of at freeze time.
    pub fn compile_with_options(schema: &Value, base: &str, options: &ValidateOptions) -> Result<Self, BuildError> {
        let (registry, root) = builder::compile_with_options(schema, base, options)?;
        debug!(schemas = registry.len(), base, "compiled draft-07 schema");
        Ok(Self { registry, root })
    }

    /// Validates `instance` against the compiled schema, collecting every
    /// failure rather than stopping at the first (the "collecting" reporter
    /// posture; see [`schema_core::CollectingReporter`] for the building
    /// block combinators use internally).
    #[must_use]
    pub fn validate(&self, instance: &Value) -> ValidationResult {
        let mut errors = Vec::new();
        let mut patch = Patch::new();
        validate_node(&self.registry, self.root, instance, "", &mut errors, &mut patch);
        ValidationResult { errors, patch }
    }

    #[must_use]
    pub fn registry(&self) -> &Registry<Node> {
        &self.registry
    }
}
