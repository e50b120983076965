//! Collection provisioning error types.

use thiserror::Error;

use super::SearchIndexError;

/// Errors that can occur while ensuring a collection exists.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The collection name was rejected before any request was made.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The status endpoint could not be queried.
    #[error("Error checking collection status: {0}")]
    StatusError(#[from] SearchIndexError),

    /// The create command could not be started.
    #[error("Failed to run collection create command: {0}")]
    SpawnError(String),

    /// The create command ran but reported failure.
    #[error("Error creating collection ({status}): {stderr}")]
    CommandFailed { status: String, stderr: String },
}

impl ProvisionError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a spawn error.
    pub fn spawn(msg: impl Into<String>) -> Self {
        Self::SpawnError(msg.into())
    }

    /// Create a command failure error.
    pub fn command_failed(status: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandFailed {
            status: status.into(),
            stderr: stderr.into(),
        }
    }
}
