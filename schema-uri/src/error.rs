use snafu::Snafu;

/// Failures that can occur while parsing or resolving a [`crate::SchemaUri`].
#[derive(Debug, Snafu)]
#[snafu(context(suffix(Ctx)))]
pub enum UriError {
    #[snafu(display("failed to parse \"{input}\" as a URI: {source}"))]
    Parse { input: String, source: url::ParseError },

    #[snafu(display("failed to resolve \"{reference}\" against \"{base}\": {source}"))]
    Resolve {
        base: String,
        reference: String,
        source: url::ParseError,
    },
}
