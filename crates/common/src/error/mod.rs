//! Error classification shared by every crate in the workspace
//!
//! Module-specific error enums stay where they are defined; this module only
//! provides the [`ErrorClassification`] trait and the [`ErrorSeverity`] scale
//! so that retry policies and log statements can reason about any error the
//! same way.
//!
//! ```rust,ignore
//! impl ErrorClassification for ClientError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, Self::Timeout(_))
//!     }
//!
//!     fn severity(&self) -> ErrorSeverity {
//!         match self {
//!             Self::Timeout(_) => ErrorSeverity::Warning,
//!             Self::Rejected(_) => ErrorSeverity::Error,
//!         }
//!     }
//! }
//! ```

use std::fmt;

/// Error classification trait for consistent error handling across modules
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient conditions that may clear if the same
    /// operation is attempted again (connection resets, tasks still running
    /// when the poll bound ran out).
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
