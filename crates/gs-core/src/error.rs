//! Error types for the gs-core crate.
//!
//! This module provides [`ConfigError`] for failures while locating,
//! reading, parsing, or writing the configuration file.

use camino::Utf8PathBuf;

/// Errors that can occur while loading or creating configuration.
///
/// # Examples
///
/// ```
/// use gs_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::InvalidPath {
///     path: Utf8PathBuf::from("~nobody/code"),
///     reason: "unsupported home prefix".to_owned(),
/// };
/// assert!(error.to_string().contains("~nobody/code"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The provided path is invalid or could not be expanded.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The invalid path.
        path: Utf8PathBuf,
        /// Explanation of why the path is invalid.
        reason: String,
    },

    /// The home directory could not be determined.
    #[error("could not determine the home directory")]
    NoHomeDir,

    /// An I/O error occurred while reading or writing the configuration file.
    #[error("failed to access configuration file {path}: {source}")]
    Io {
        /// The configuration file (or directory) being accessed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[source] serde_yaml::Error),

    /// Failed to serialize the configuration for writing.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::Io`] error.
    #[inline]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
