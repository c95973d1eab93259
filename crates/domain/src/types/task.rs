//! Server-side asynchronous task model

use serde::{Deserialize, Serialize};

use crate::constants::{TASK_STATE_CANCELLED, TASK_STATE_COMPLETED, TASK_STATE_FAILED};
use crate::impl_domain_status_conversions;

/// Lifecycle state of a QuantaStor task.
///
/// `Completed` is the only successful terminal state; `Failed` and
/// `Cancelled` are terminal failures. Every other numeric code the appliance
/// reports (queued, initializing, running, ...) is treated as in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Pending,
    Running,
    Failed,
    Cancelled,
    Completed,
}

impl_domain_status_conversions!(TaskState {
    Pending => "pending",
    Running => "running",
    Failed => "failed",
    Cancelled => "cancelled",
    Completed => "completed",
});

impl TaskState {
    /// Map a numeric `taskState` code; `None` (missing field) is pending.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(TASK_STATE_FAILED) => Self::Failed,
            Some(TASK_STATE_CANCELLED) => Self::Cancelled,
            Some(TASK_STATE_COMPLETED) => Self::Completed,
            Some(_) => Self::Running,
            None => Self::Pending,
        }
    }
}

/// Snapshot of a task as returned by `taskGet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub state: TaskState,
    pub description: String,
    /// Identifier of the entity the task produced or modified
    pub custom_id: Option<String>,
}
