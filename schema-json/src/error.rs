//! Build-time failures: anything discovered while turning a schema document
//! into a registered validator graph. Validation-time failures never reach
//! here — they go to a [`schema_core::Reporter`] instead.

use schema_core::error::{DuplicateUriError, UnresolvedReferenceError};
use schema_uri::UriError;
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(context(suffix(Ctx)))]
pub enum BuildError {
    #[snafu(display("{source}"))]
    Uri { source: UriError },

    #[snafu(display("{source}"))]
    DuplicateUri { source: DuplicateUriError },

    #[snafu(display("{source}"))]
    UnresolvedReference { source: UnresolvedReferenceError },

    #[snafu(display("at {location}: pattern \"{pattern}\" failed to compile: {message}"))]
    InvalidPattern { location: String, pattern: String, message: String },

    #[snafu(display("at {location}: a schema must be a JSON object or boolean, found {found}"))]
    InvalidSchemaShape { location: String, found: &'static str },
}

impl From<UriError> for BuildError {
    fn from(source: UriError) -> Self {
        Self::Uri { source }
    }
}
impl From<DuplicateUriError> for BuildError {
    fn from(source: DuplicateUriError) -> Self {
        Self::DuplicateUri { source }
    }
}
impl From<UnresolvedReferenceError> for BuildError {
    fn from(source: UnresolvedReferenceError) -> Self {
        Self::UnresolvedReference { source }
    }
}
