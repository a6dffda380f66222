//! Error types for the gs-scanner crate.
//!
//! Failures are split by how far they propagate:
//!
//! - [`ScanError`]: the whole scan cannot proceed (git missing, no usable
//!   roots, bad configuration). Returned from [`Scanner::scan`](crate::Scanner::scan).
//! - [`ProbeError`]: one repository could not be probed. Collected in
//!   [`ScanReport::failures`](crate::ScanReport::failures); other repositories
//!   are unaffected.
//! - [`ScanWarning`]: a root or directory was skipped. Collected in
//!   [`ScanReport::warnings`](crate::ScanReport::warnings).

use std::time::Duration;

use camino::Utf8PathBuf;
use serde::Serialize;

/// Errors that abort a scan.
///
/// # Examples
///
/// ```
/// use gs_scanner::ScanError;
///
/// fn describe(err: &ScanError) -> &'static str {
///     match err {
///         ScanError::GitNotFound { .. } => "install git",
///         ScanError::NoUsableRoots { .. } => "check configured roots",
///         _ => "scan failed",
///     }
/// }
///
/// assert_eq!(describe(&ScanError::NoUsableRoots { skipped: 2 }), "check configured roots");
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ScanError {
    /// The git executable could not be run on this host.
    #[error("git executable '{program}' not found: {source}")]
    GitNotFound {
        /// The program that was looked up.
        program: String,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// Every configured root was missing or not a directory.
    #[error("no usable scan roots ({skipped} skipped)")]
    NoUsableRoots {
        /// Number of roots that were rejected.
        skipped: usize,
    },

    /// An ignore pattern could not be compiled.
    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// The underlying glob error.
        #[source]
        source: ignore::Error,
    },

    /// The probe thread pool could not be created.
    #[error("failed to start probe workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Invalid scanner configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScanError {
    /// Creates a new [`ScanError::Config`] error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Errors from probing a single repository.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProbeError {
    /// git could not be started for this repository.
    #[error("failed to run git in {path}: {source}")]
    Spawn {
        /// Repository path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// git exited unsuccessfully.
    #[error("git {command} failed in {path} ({}): {stderr}", exit_label(*code))]
    GitFailed {
        /// Repository path.
        path: Utf8PathBuf,
        /// The git subcommand that failed.
        command: &'static str,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// git did not finish within the probe timeout.
    #[error("git {command} timed out after {}s in {path}", after.as_secs())]
    TimedOut {
        /// Repository path.
        path: Utf8PathBuf,
        /// The git subcommand that was killed.
        command: &'static str,
        /// The timeout that elapsed.
        after: Duration,
    },

    /// git output could not be understood.
    #[error("unexpected git output in {path}: {reason}")]
    Parse {
        /// Repository path.
        path: Utf8PathBuf,
        /// What was wrong with the output.
        reason: String,
    },
}

fn exit_label(code: Option<i32>) -> String {
    code.map_or_else(|| "killed by signal".to_owned(), |c| format!("exit code {c}"))
}

impl ProbeError {
    /// The repository this error belongs to.
    #[must_use]
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::Spawn { path, .. }
            | Self::GitFailed { path, .. }
            | Self::TimedOut { path, .. }
            | Self::Parse { path, .. } => path,
        }
    }

    /// Returns `true` if the probe was cut short by the timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// A non-fatal problem recorded while validating roots or walking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ScanWarning {
    /// A configured root does not exist.
    #[error("root does not exist: {path}")]
    RootMissing {
        /// The configured root.
        path: Utf8PathBuf,
    },

    /// A configured root exists but is not a directory.
    #[error("root is not a directory: {path}")]
    RootNotDirectory {
        /// The configured root.
        path: Utf8PathBuf,
    },

    /// A directory could not be read and was skipped.
    #[error("skipped unreadable directory {path}: {reason}")]
    Unreadable {
        /// The directory.
        path: Utf8PathBuf,
        /// The I/O error message.
        reason: String,
    },

    /// A directory entry name was not valid UTF-8 and was skipped.
    #[error("skipped non-UTF-8 path {path}")]
    NonUtf8Path {
        /// Lossy rendering of the path.
        path: String,
    },

    /// A symlink pointed at nothing and was skipped.
    #[error("skipped broken symlink {path}")]
    BrokenSymlink {
        /// The link itself.
        path: Utf8PathBuf,
    },
}

impl ScanWarning {
    /// Returns `true` for warnings about configured roots.
    #[must_use]
    pub const fn is_root_level(&self) -> bool {
        matches!(self, Self::RootMissing { .. } | Self::RootNotDirectory { .. })
    }
}
