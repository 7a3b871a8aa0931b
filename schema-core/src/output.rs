//! The structured validation failure record produced by every keyword.

use std::fmt;

/// One validation failure, with enough context to locate both the
/// offending instance value and the schema keyword that rejected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutput {
    /// JSON Pointer to the value within the instance being validated.
    pub instance_location: String,
    /// Human-readable description of the failure.
    pub message: String,
    /// The keyword that produced this output, e.g. `"minLength"`.
    pub keyword: &'static str,
    /// The absolute URI (with JSON Pointer fragment) of the schema keyword
    /// that produced this output.
    pub absolute_keyword_location: String,
    /// Sub-errors collected from combinators (`allOf`, `anyOf`, `oneOf`,
    /// `not`, `contains`) that aggregate the errors of their children.
    pub nested: Vec<ValidationOutput>,
}

impl ValidationOutput {
    #[must_use]
    pub fn new(
        instance_location: impl Into<String>,
        message: impl Into<String>,
        keyword: &'static str,
        absolute_keyword_location: impl Into<String>,
    ) -> Self {
        Self {
            instance_location: instance_location.into(),
            message: message.into(),
            keyword,
            absolute_keyword_location: absolute_keyword_location.into(),
            nested: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_nested(mut self, nested: Vec<ValidationOutput>) -> Self {
        self.nested = nested;
        self
    }
}

impl fmt::Display for ValidationOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.instance_location, self.message)
    }
}
