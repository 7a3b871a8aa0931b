//! Registry arena, pull-style input sources, and the error/reporter
//! primitives shared by the draft-07 keyword validators in `schema-json`.

pub mod error;
pub mod output;
pub mod patch;
pub mod registry;
pub mod reporter;
pub mod source;

pub use output::ValidationOutput;
pub use patch::Patch;
pub use registry::{Key, Registry};
pub use reporter::{CollectingReporter, Reporter};
