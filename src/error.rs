//! Error types for Jira API operations.

use thiserror::Error;

/// Errors that can occur during Jira API operations.
#[derive(Debug, Error)]
pub enum JiraError {
    /// Required configuration is missing or invalid.
    #[error("Jira configuration error: {0}")]
    Configuration(String),

    /// The request never produced an HTTP response (connect failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server sent a status line but the body could not be read.
    ///
    /// Never replayed: the server may already have acted on the request.
    #[error("Failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{context}: {status} - {body}")]
    Upstream {
        /// Which request failed, e.g. "Failed to fetch issue PROJ-1".
        context: String,
        status: u16,
        body: String,
    },

    /// A success response carried a body that is not the expected JSON.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl JiraError {
    /// Whether this error is a network-level failure worth replaying.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, JiraError::Transport(_))
    }

    /// HTTP status of an upstream failure, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            JiraError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for Jira operations.
pub type Result<T> = core::result::Result<T, JiraError>;
