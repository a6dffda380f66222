//! TUI-specific error types.

use thiserror::Error;

/// Errors that can occur in the dashboard.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TuiError {
    /// Terminal initialization or operation failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Event channel was closed unexpectedly.
    #[error("event channel closed unexpectedly")]
    ChannelClosed,

    /// Scanner could not be built or run.
    #[error("scanner error: {0}")]
    Scanner(#[from] gs_scanner::ScanError),

    /// The configured editor could not be run.
    #[error("editor error: {0}")]
    Editor(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl TuiError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a new editor error.
    #[must_use]
    pub fn editor(message: impl Into<String>) -> Self {
        Self::Editor(message.into())
    }

    /// Returns `true` if the dashboard can keep running after this error.
    ///
    /// Scan and editor failures are shown in the status bar; terminal
    /// failures end the session.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Scanner(_) | Self::Editor(_))
    }
}
