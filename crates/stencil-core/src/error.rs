//! Error types shared across the crate
//!
//! Every fallible operation in the library returns [`Error`] (or one of the
//! narrower enums it wraps). The binary maps the top-level variants to exit
//! codes without interpreting them further.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub use crate::expression::ExpressionError;
pub use crate::templates::manifest::ManifestError;

/// Convenient result alias for library operations
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type
#[derive(Debug, Error)]
pub enum Error {
    /// The user cancelled an interactive prompt
    #[error("aborted")]
    Aborted,

    /// A preset or template name could not be resolved
    #[error("cannot find {what}, given = '{name}'")]
    NotFound { what: &'static str, name: String },

    /// A user preset with the requested name already exists
    #[error("preset already exists, given = '{0}'")]
    PresetExists(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Reading keys from or drawing to the terminal failed
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

impl Error {
    pub(crate) fn not_found(what: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            name: name.into(),
        }
    }
}

/// Failures of the template generation pipeline
///
/// The pre-flight variants (`ManifestNotFound`, `InputMissing`,
/// `OutputConflict`, `OutputOutside`) are always reported before anything
/// is written.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template definition does not exist, dir = '{0}'")]
    ManifestNotFound(PathBuf),

    #[error("template file not found, {0}")]
    InputMissing(PathBuf),

    #[error("output already exists, {0}")]
    OutputConflict(PathBuf),

    /// A rendered `out` climbs above the output directory or is empty
    #[error("output path leaves the output directory, given = '{0}'")]
    OutputOutside(String),

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures reading or writing the user preset store
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("cannot determine a preset file path")]
    NoPath,

    #[error("failed to read preset file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write preset file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed preset file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize presets: {0}")]
    Serialize(#[source] serde_yaml::Error),
}
