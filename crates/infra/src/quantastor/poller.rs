//! Server-side task polling
//!
//! Mutating calls answer with `{"task": {"id": ...}}`. The poller calls
//! `taskGet` until the task reaches a terminal state or the per-sequence
//! bound runs out. A whole sequence that runs out is retried by the common
//! retry executor; any other failure surfaces at once.

use std::time::Duration;

use qstor_common::resilience::policies::PredicateRetry;
use qstor_common::resilience::{RetryConfig, RetryExecutor};
use qstor_domain::{QuantaStorConfig, QuantaStorError, Result, TaskState};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::parsing::{decode_task, task_id};
use super::payload::Payload;
use super::transport::RestTransport;

type RetryPredicate = fn(&QuantaStorError, u32) -> bool;

fn is_task_timeout(error: &QuantaStorError, _attempt: u32) -> bool {
    matches!(error, QuantaStorError::TaskTimeout { .. })
}

/// Waits for QuantaStor tasks to finish.
#[derive(Clone)]
pub struct TaskPoller {
    transport: RestTransport,
    poll_attempts: u32,
    poll_interval: Duration,
    retry: RetryExecutor<PredicateRetry<RetryPredicate>>,
}

impl TaskPoller {
    /// # Errors
    /// [`QuantaStorError::Config`] when the retry bound is zero.
    pub fn new(transport: RestTransport, config: &QuantaStorConfig) -> Result<Self> {
        let retry_config = RetryConfig::builder()
            .max_attempts(config.task_retry_attempts)
            .fixed_backoff(config.task_retry_interval())
            .build()
            .map_err(|err| QuantaStorError::Config(err.to_string()))?;

        Ok(Self {
            transport,
            poll_attempts: config.task_poll_attempts.max(1),
            poll_interval: config.task_poll_interval(),
            retry: RetryExecutor::new(retry_config, PredicateRetry::new(is_task_timeout as RetryPredicate)),
        })
    }

    /// Wait for the task referenced by `response` and return its `customId`.
    ///
    /// # Errors
    /// - [`QuantaStorError::Protocol`] when `response` has no task reference
    ///   or the completed task has no `customId`
    /// - [`QuantaStorError::TaskFailed`] / [`QuantaStorError::TaskCancelled`]
    /// - [`QuantaStorError::TaskTimeout`] once every poll sequence ran out
    /// - transport errors from `taskGet`, unchanged
    #[instrument(skip(self, response))]
    pub async fn wait(&self, response: &Value) -> Result<String> {
        let task_id = task_id(response)
            .ok_or_else(|| QuantaStorError::Protocol("Task object not found in response".into()))?;
        debug!(%task_id, "waiting for task");

        self.retry.execute(|| self.poll_once(&task_id)).await.map_err(|err| {
            let message = err.to_string();
            err.into_source().unwrap_or(QuantaStorError::Internal(message))
        })
    }

    /// One bounded `taskGet` sequence.
    async fn poll_once(&self, task_id: &str) -> Result<String> {
        let payload = Payload::new().str("id", task_id);

        for attempt in 1..=self.poll_attempts {
            let body = self.transport.call("taskGet", &payload).await?;
            let task = decode_task(task_id, &body);

            match task.state {
                TaskState::Completed => {
                    debug!(%task_id, custom_id = ?task.custom_id, "task completed");
                    return task.custom_id.ok_or_else(|| {
                        QuantaStorError::Protocol(format!("Task {task_id} completed without customId"))
                    });
                }
                TaskState::Failed => {
                    return Err(QuantaStorError::TaskFailed {
                        task_id: task.id,
                        description: task.description,
                    });
                }
                TaskState::Cancelled => {
                    return Err(QuantaStorError::TaskCancelled {
                        task_id: task.id,
                        description: task.description,
                    });
                }
                TaskState::Pending | TaskState::Running => {
                    debug!(%task_id, attempt, state = %task.state, "task still in progress");
                }
            }

            if attempt < self.poll_attempts && !self.poll_interval.is_zero() {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        warn!(%task_id, attempts = self.poll_attempts, "task did not complete");
        Err(QuantaStorError::TaskTimeout { task_id: task_id.to_string() })
    }
}
