//! The default-value patch: a sibling output describing defaults inserted
//! during validation. Never a repair of the source instance.

use serde_json::Value;

/// One `{"op": "add", ...}` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOp {
    pub path: String,
    pub value: Value,
}

/// An ordered sequence of default-value insertions, appended in traversal
/// order as the schema tree is walked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch(Vec<PatchOp>);

impl Patch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: impl Into<String>, value: Value) {
        self.0.push(PatchOp { path: path.into(), value });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn ops(&self) -> &[PatchOp] {
        &self.0
    }

    #[must_use]
    pub fn into_ops(self) -> Vec<PatchOp> {
        self.0
    }

    /// Renders the patch as the JSON-Patch wire form:
    /// `[{"op": "add", "path": ..., "value": ...}, ...]`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|op| {
                    serde_json::json!({
                        "op": "add",
                        "path": op.path,
                        "value": op.value,
                    })
                })
                .collect(),
        )
    }
}
