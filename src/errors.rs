//! Error types for the gt-sync CLI
//!
//! One variant per pipeline failure boundary, each with a corresponding
//! error code for programmatic handling.

use thiserror::Error;

use crate::github::PublishError;
use crate::process::ExecError;

/// Result type alias for gt-sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Main error type for a pipeline run.
///
/// Every stage failure is fatal to the run; the variant records which stage
/// produced it and the message carries the underlying cause.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Bad or missing inputs, caught before any external side effect
    #[error("Configuration error: {0}")]
    Config(String),

    /// Installing the translation CLI failed
    #[error("Failed to install gtx-cli: {0}")]
    ToolInstall(#[source] ExecError),

    /// The translation CLI itself failed
    #[error("Failed to run translations: {0}")]
    Translation(#[source] ExecError),

    /// Setting the commit-author identity failed
    #[error("Failed to configure git: {0}")]
    GitConfig(#[source] ExecError),

    /// Branch, status, commit, or push failure
    #[error("Git operation failed: {0}")]
    Git(#[source] ExecError),

    /// Pull request creation failed (missing token or API failure)
    #[error("Failed to create pull request: {0}")]
    Publish(#[source] PublishError),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            SyncError::Config(_) => "CONFIG_ERROR",
            SyncError::ToolInstall(_) => "TOOL_INSTALL_ERROR",
            SyncError::Translation(_) => "TRANSLATION_ERROR",
            SyncError::GitConfig(_) => "GIT_CONFIG_ERROR",
            SyncError::Git(_) => "GIT_ERROR",
            SyncError::Publish(_) => "PUBLISH_ERROR",
            SyncError::Io(_) => "IO_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exec_error() -> ExecError {
        ExecError::NonZeroExit {
            command: "npm install -D gtx-cli".to_string(),
            code: 1,
            stderr: "ETIMEDOUT".to_string(),
        }
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(SyncError::Config("test".into()).code(), "CONFIG_ERROR");
        assert_eq!(SyncError::ToolInstall(exec_error()).code(), "TOOL_INSTALL_ERROR");
        assert_eq!(SyncError::Translation(exec_error()).code(), "TRANSLATION_ERROR");
        assert_eq!(SyncError::GitConfig(exec_error()).code(), "GIT_CONFIG_ERROR");
        assert_eq!(SyncError::Git(exec_error()).code(), "GIT_ERROR");
        assert_eq!(SyncError::Publish(PublishError::MissingToken).code(), "PUBLISH_ERROR");
    }

    #[test]
    fn test_message_includes_underlying_cause() {
        let error = SyncError::ToolInstall(exec_error());
        let message = error.to_string();
        assert!(message.contains("Failed to install gtx-cli"));
        assert!(message.contains("npm install -D gtx-cli"));
        assert!(message.contains("ETIMEDOUT"));
    }

    #[test]
    fn test_missing_token_message() {
        let error = SyncError::Publish(PublishError::MissingToken);
        assert!(error.to_string().contains("GITHUB_TOKEN is required"));
    }
}
