//! Error types for the command-line entry points.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop an entry point from producing its result object.
///
/// Verdict contents never appear here: an unsafe or invalid artifact is a
/// successful run. Only broken invocations surface as errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    /// An input file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    ReadInput {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The result object could not be serialised.
    #[error("cannot serialise result: {0}")]
    SerializeOutput(#[from] serde_json::Error),

    /// The result object could not be written to the output stream.
    #[error("cannot write result: {0}")]
    EmitOutput(#[from] std::io::Error),
}
