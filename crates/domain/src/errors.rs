//! Error types used throughout the backend

use qstor_common::{ErrorClassification, ErrorSeverity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for QuantaStor backend operations
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum QuantaStorError {
    /// The appliance answered with a non-200 HTTP status.
    #[error("Failed to make a request {endpoint} : {payload} : {status}")]
    Transport { endpoint: String, payload: String, status: u16 },

    /// The appliance answered 200 but embedded a `RestError` in the body.
    #[error("Failed to execute api {endpoint} : {payload} : {error}")]
    RemoteApi { endpoint: String, payload: String, error: String },

    #[error("Network error: {0}")]
    Network(String),

    /// A response did not have the shape the protocol requires.
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Task {task_id} failed with error : {description}")]
    TaskFailed { task_id: String, description: String },

    #[error("Task {task_id} cancelled at state : {description}")]
    TaskCancelled { task_id: String, description: String },

    #[error("Task {task_id} did not complete")]
    TaskTimeout { task_id: String },

    #[error("san_ip address is invalid: {0}")]
    InvalidAddress(String),

    #[error("{0} is not set")]
    MissingConfiguration(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic driver failure surfaced to the orchestration framework.
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuantaStorError {
    /// Build a [`QuantaStorError::Backend`] from any displayable message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// True when the error means "the server does not know this object".
    ///
    /// Lookups translate these into an absent result instead of failing.
    pub fn is_absence(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::RemoteApi { .. })
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::RemoteApi { .. } => "remote_api",
            Self::Network(_) => "network",
            Self::Protocol(_) => "protocol",
            Self::TaskFailed { .. } => "task_failed",
            Self::TaskCancelled { .. } => "task_cancelled",
            Self::TaskTimeout { .. } => "task_timeout",
            Self::InvalidAddress(_) => "invalid_address",
            Self::MissingConfiguration(_) => "missing_configuration",
            Self::Config(_) => "config",
            Self::Backend(_) => "backend",
            Self::Internal(_) => "internal",
        }
    }
}

impl ErrorClassification for QuantaStorError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::TaskTimeout { .. } | Self::Network(_))
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::TaskTimeout { .. } | Self::Network(_) => ErrorSeverity::Warning,
            Self::Internal(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Result type alias for QuantaStor operations
pub type Result<T> = std::result::Result<T, QuantaStorError>;
