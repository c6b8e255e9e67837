//! Result and error types for Comprar.

use thiserror::Error;

/// Result type for Comprar operations
pub type ComprarResult<T> = Result<T, ComprarError>;

/// Errors that can occur in Comprar
#[derive(Debug, Error)]
pub enum ComprarError {
    /// A locator matched no element at the moment of the call
    #[error("no element matched {selector}")]
    NotFound {
        /// Selector description
        selector: String,
    },

    /// A wait condition was never satisfied in time
    #[error("condition not satisfied within {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// A state-changing action errored after its wait succeeded
    /// (e.g. the element went stale between wait and act)
    #[error("{action} failed: {message}")]
    InteractionFailed {
        /// Action that failed (click, type, ...)
        action: String,
        /// Underlying error message
        message: String,
    },

    /// A window handle was not among the open window handles
    #[error("window not found: {handle}")]
    WindowNotFound {
        /// Handle or description of the missing window
        handle: String,
    },

    /// No native dialog is active; always a recoverable branch at call
    /// sites where a dialog may or may not appear
    #[error("no native dialog is active")]
    NoDialog,

    /// An observation yielded nothing after all retry attempts
    #[error("observation yielded nothing after {attempts} attempts")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
    },

    /// Navigation error
    #[error("navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Transport-level driver error
    #[error("driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },
}

impl ComprarError {
    /// Create a driver transport error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create an interaction failure for a named action
    #[must_use]
    pub fn interaction(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InteractionFailed {
            action: action.into(),
            message: message.into(),
        }
    }
}
