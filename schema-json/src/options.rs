//! Compile-time configuration (§2 ambient stack, "Configuration"). The
//! validator has no persisted configuration — `ValidateOptions` only
//! governs in-process build behavior: which `format` checkers are asserted,
//! and how eagerly a dangling `$ref` is reported.

use std::collections::HashSet;

use crate::format::Format;

/// How a `$ref` that never resolves to a registered schema is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefResolution {
    /// Unresolved references become back-edges checked once, when the
    /// registry is frozen at the end of `compile` — the draft-07 default
    /// this crate implements elsewhere in the workspace.
    Lazy,
    /// Fail the build the moment a `$ref` is read and does not already
    /// resolve against the URI table built so far. Cross-document forward
    /// references (common in multi-file schema bundles) will not resolve
    /// under this mode even though they would under `Lazy`.
    Eager,
}

impl Default for RefResolution {
    fn default() -> Self {
        Self::Lazy
    }
}

/// Builder for the handful of knobs the schema builder honors. Everything
/// else about compilation is fixed by the draft-07 semantics in §4.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    enabled_formats: Option<HashSet<Format>>,
    ref_resolution: RefResolution,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self { enabled_formats: None, ref_resolution: RefResolution::default() }
    }
}

impl ValidateOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts `format` assertion to exactly this set; names outside it
    /// are treated as unrecognized (accepted silently), mirroring how an
    /// unknown format name is already handled per draft-07.
    #[must_use]
    pub fn with_formats(mut self, formats: impl IntoIterator<Item = Format>) -> Self {
        self.enabled_formats = Some(formats.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_ref_resolution(mut self, mode: RefResolution) -> Self {
        self.ref_resolution = mode;
        self
    }

    #[must_use]
    pub fn is_format_enabled(&self, format: Format) -> bool {
        self.enabled_formats.as_ref().map_or(true, |set| set.contains(&format))
    }

    #[must_use]
    pub fn ref_resolution(&self) -> RefResolution {
        self.ref_resolution
    }
}
