//! The error taxonomy shared by the input-source and registry layers.
//!
//! Validation failures themselves are never represented here — they are
//! delivered to a [`crate::reporter::Reporter`] and never propagated as a
//! Rust `Err`, per the error-handling design: only build-time and I/O
//! failures are fatal.

use snafu::Snafu;

/// A transport-level failure surfaced by a streaming [`crate::source::Source`].
///
/// Sticky: once set, `Source::is_error()` continues to report it and the
/// source is permanently at EOF.
#[derive(Debug, Clone, Snafu)]
#[snafu(display("input source failed: {message}"), context(suffix(Ctx)))]
pub struct SourceError {
    pub message: String,
}

impl SourceError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Raised when a `$ref` (or `$id`-relative reference) never resolved to a
/// registered [`crate::registry::Registry`] entry after the deferred
/// resolution pass that runs when the registry is frozen.
#[derive(Debug, Snafu)]
#[snafu(display("unresolved reference to \"{uri}\""), context(suffix(Ctx)))]
pub struct UnresolvedReferenceError {
    pub uri: String,
}

/// Raised when two schemas claim the same absolute URI (an `$id` collision).
#[derive(Debug, Snafu)]
#[snafu(display("\"{uri}\" is already registered"), context(suffix(Ctx)))]
pub struct DuplicateUriError {
    pub uri: String,
}
