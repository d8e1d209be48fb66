//! Error types for ldcontext.
//!
//! Library crates use [`LdContextError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all ldcontext operations.
#[derive(Debug, thiserror::Error)]
pub enum LdContextError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The working environment is not what the tool expects (wrong root, missing marker).
    #[error("environment error: {message}")]
    Environment { message: String },

    /// Discovery found nothing to process.
    #[error("no Turtle files to process")]
    NoInputFiles,

    /// A prefix was declared twice with different namespace IRIs.
    #[error(
        "prefix '{prefix}' redefined in {path:?}: already bound to <{existing}>, found <{conflicting}>"
    )]
    PrefixConflict {
        prefix: String,
        existing: String,
        conflicting: String,
        path: PathBuf,
    },

    /// Malformed input line that the line scanner cannot interpret.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Turtle syntax error reported by the RDF parser.
    #[error("RDF error in {path:?}: {message}")]
    Rdf { path: PathBuf, message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON encoding of the context document failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LdContextError>;

impl LdContextError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an environment error from any displayable message.
    pub fn environment(msg: impl Into<String>) -> Self {
        Self::Environment {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create an RDF error for a specific input file.
    pub fn rdf(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Rdf {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
