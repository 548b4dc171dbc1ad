//! Error types for the jsonschema2rs crate.

use std::path::PathBuf;

/// Errors that can occur while collecting input, generating source code,
/// or writing it out.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading location records from standard input failed before
    /// end-of-stream was reached.
    #[error("failed to read input locations: {0}")]
    Input(#[source] std::io::Error),

    /// Failed to read a schema document from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Network error while fetching a schema document.
    #[cfg(feature = "fetch")]
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// An http(s) location was given but the binary was built without
    /// the `fetch` feature.
    #[error("cannot load '{0}': http(s) locations require the 'fetch' feature")]
    UnsupportedScheme(String),

    /// A schema document could not be parsed as JSON or YAML.
    #[error("failed to parse schema at {location}: {message}")]
    Parse { location: String, message: String },

    /// Source code generation failed.
    #[error("codegen error: {0}")]
    Codegen(String),

    /// Import cleanup or formatting of the generated source failed. The
    /// unformatted source is still written to the output file so it can
    /// be inspected.
    #[error("failed to normalize generated source: {0}")]
    Normalize(String),

    /// Failed to create or write the output file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write generated source to standard output.
    #[error("failed to write to standard output: {0}")]
    Stdout(#[source] std::io::Error),
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
