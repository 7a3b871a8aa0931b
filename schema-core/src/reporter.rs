//! The error-reporter sink, and the collecting variant combinators use
//! internally to decide whether a sub-branch passed.

use crate::output::ValidationOutput;

/// A sink that accepts [`ValidationOutput`]s as they are produced during a
/// `validate` traversal. Never panics; `error` always succeeds.
pub trait Reporter {
    fn error(&mut self, output: ValidationOutput);
}

/// Buffers outputs in memory. Used internally by `not`, `anyOf`, `oneOf`,
/// `contains`, and `additionalProperties` to decide, after the fact,
/// whether to surface a summary error instead of (or in addition to) the
/// collected detail.
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    outputs: Vec<ValidationOutput>,
}

impl CollectingReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    #[must_use]
    pub fn into_outputs(self) -> Vec<ValidationOutput> {
        self.outputs
    }

    #[must_use]
    pub fn outputs(&self) -> &[ValidationOutput] {
        &self.outputs
    }
}

impl Reporter for CollectingReporter {
    fn error(&mut self, output: ValidationOutput) {
        self.outputs.push(output);
    }
}

/// Forwards every output to a `Vec`, growing it without bound. This is the
/// "accumulating" variant a caller supplies at the root `validate` call —
/// the validator itself is agnostic to which root reporter is used.
impl Reporter for Vec<ValidationOutput> {
    fn error(&mut self, output: ValidationOutput) {
        self.push(output);
    }
}
