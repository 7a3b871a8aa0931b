//! draft-07 JSON Schema keyword validators, schema builder, and format
//! checkers, built on the arena and pull-style I/O primitives in
//! `schema-core`.

pub mod builder;
pub mod error;
pub mod format;
pub mod keyword;
pub mod node;
pub mod options;
pub mod validator;

pub use error::BuildError;
pub use node::Node;
pub use options::{RefResolution, ValidateOptions};
pub use validator::{ValidationResult, Validator};
