//! Error types for configuration descriptor handling.

use thiserror::Error;

/// Errors produced while reading, writing, or dispatching configuration
/// descriptors.
///
/// Constructing a configuration record never fails; these errors only arise
/// at the descriptor I/O boundary.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A descriptor file could not be read.
    #[error("failed to read configuration descriptor '{path}'")]
    Read {
        /// Path of the descriptor that failed to load.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A descriptor file could not be written.
    #[error("failed to write configuration descriptor '{path}'")]
    Write {
        /// Path of the descriptor that failed to save.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The descriptor contents were not valid JSON for the target record.
    #[error("malformed configuration descriptor")]
    Parse(#[from] serde_json::Error),

    /// The descriptor declares an architecture tag for a different record
    /// type.
    #[error("model type mismatch: descriptor declares '{found}', expected '{expected}'")]
    ModelTypeMismatch {
        /// The tag of the record type being loaded.
        expected: &'static str,
        /// The tag found in the descriptor.
        found: String,
    },
}
