//! Fatal, structural errors.
//!
//! Anything that stops a document from being read as the expected mapping
//! shape ends the run. Per-function problems are not errors; see
//! [`crate::record::Rejection`].

use std::path::PathBuf;

/// Result alias used across the engine.
pub type Result<T, E = GenError> = std::result::Result<T, E>;

/// An input or exclusion document could not be used.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// The document could not be read from disk.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The document is not valid YAML.
    #[error("failed to parse {origin}: {source}")]
    Parse {
        /// Where the document came from (usually its path).
        origin: String,
        /// Underlying parser failure.
        source: serde_yaml::Error,
    },

    /// The document parsed but does not have the expected mapping shape.
    #[error("{origin}: {detail}")]
    Shape {
        /// Where the document came from.
        origin: String,
        /// What was expected and where it was not found.
        detail: String,
    },
}

impl GenError {
    pub(crate) fn shape(origin: &str, detail: impl Into<String>) -> Self {
        Self::Shape {
            origin: origin.to_string(),
            detail: detail.into(),
        }
    }
}
