//! Bounded retry executor
//!
//! Runs an async operation up to a fixed number of attempts, sleeping between
//! attempts according to a [`BackoffStrategy`]. A [`RetryPolicy`] decides,
//! per error, whether another attempt is allowed. When attempts run out the
//! last error is handed back inside [`RetryError::AttemptsExhausted`] so
//! callers can surface the original failure.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors that can occur during retry operations
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// All retry attempts have been exhausted
    #[error("All retry attempts exhausted after {attempts} tries: {source:?}")]
    AttemptsExhausted { attempts: u32, source: E },

    /// The operation failed with a non-retryable error
    #[error("Operation failed with non-retryable error: {source:?}")]
    NonRetryable { source: E },

    /// The retry strategy configuration is invalid
    #[error("Invalid retry configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl<E> RetryError<E> {
    /// The operation's own error, if this failure carries one.
    pub fn into_source(self) -> Option<E> {
        match self {
            Self::AttemptsExhausted { source, .. } | Self::NonRetryable { source } => Some(source),
            Self::InvalidConfiguration { .. } => None,
        }
    }
}

/// Result type for retry operations
pub type RetryResult<T, E> = Result<T, RetryError<E>>;

/// Trait for determining whether an error should be retried
pub trait RetryPolicy<E> {
    /// Determine if the error should be retried
    fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision;
}

/// Decision for whether to retry an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry the operation after the configured backoff
    Retry,
    /// Don't retry the operation
    Stop,
}

/// Backoff strategy for calculating retry delays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// Fixed delay between retries
    Fixed(Duration),
}

impl BackoffStrategy {
    /// Calculate the delay that follows the given (0-based) attempt
    pub fn calculate_delay(&self, _attempt: u32) -> Duration {
        match self {
            Self::Fixed(delay) => *delay,
        }
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of attempts, the first one included
    pub max_attempts: u32,
    /// Backoff strategy for calculating delays
    pub backoff: BackoffStrategy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 3, backoff: BackoffStrategy::Fixed(Duration::from_secs(2)) }
    }
}

impl RetryConfig {
    /// Create a configuration builder
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::new()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), RetryError<()>> {
        if self.max_attempts == 0 {
            return Err(RetryError::InvalidConfiguration {
                message: "max_attempts must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for RetryConfig with fluent API
#[derive(Debug, Default)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl RetryConfigBuilder {
    /// Start from [`RetryConfig::default`]
    pub fn new() -> Self {
        Self { config: RetryConfig::default() }
    }

    /// Total attempts, the first one included
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    /// Sleep `delay` between attempts
    pub fn fixed_backoff(mut self, delay: Duration) -> Self {
        self.config.backoff = BackoffStrategy::Fixed(delay);
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<RetryConfig, RetryError<()>> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// The main retry executor
#[derive(Debug, Clone)]
pub struct RetryExecutor<P> {
    config: RetryConfig,
    policy: P,
}

impl<P> RetryExecutor<P> {
    /// Create a new retry executor with the given configuration and policy
    pub fn new(config: RetryConfig, policy: P) -> Self {
        Self { config, policy }
    }

    /// Execute an operation with retry logic
    #[instrument(skip(self, operation), fields(max_attempts = self.config.max_attempts))]
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> RetryResult<T, E>
    where
        P: RetryPolicy<E>,
        E: fmt::Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt: u32 = 0;

        loop {
            let attempt_number = attempt + 1;
            debug!(attempt = attempt_number, max_attempts = self.config.max_attempts, "executing");

            let error = match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(retries = attempt, "operation succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if self.policy.should_retry(&error, attempt) == RetryDecision::Stop {
                debug!(?error, "retry policy declined to retry");
                return Err(RetryError::NonRetryable { source: error });
            }
            if attempt_number >= self.config.max_attempts {
                warn!(attempts = attempt_number, ?error, "all retry attempts exhausted");
                return Err(RetryError::AttemptsExhausted { attempts: attempt_number, source: error });
            }

            let delay = self.config.backoff.calculate_delay(attempt);
            warn!(attempt = attempt_number, ?delay, ?error, "operation failed, retrying");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Pre-defined retry policies
pub mod policies {
    use super::{RetryDecision, RetryPolicy};

    /// Predicate-based retry policy
    #[derive(Debug, Clone)]
    pub struct PredicateRetry<F> {
        predicate: F,
    }

    impl<F> PredicateRetry<F> {
        /// Retry whenever `predicate(error, attempt)` holds
        pub fn new(predicate: F) -> Self {
            Self { predicate }
        }
    }

    impl<F, E> RetryPolicy<E> for PredicateRetry<F>
    where
        F: Fn(&E, u32) -> bool,
    {
        fn should_retry(&self, error: &E, attempt: u32) -> RetryDecision {
            if (self.predicate)(error, attempt) {
                RetryDecision::Retry
            } else {
                RetryDecision::Stop
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::policies::*;
    use super::*;

    fn fast(attempts: u32) -> RetryConfig {
        RetryConfig::builder()
            .max_attempts(attempts)
            .fixed_backoff(Duration::from_millis(1))
            .build()
            .expect("valid config")
    }

    fn always() -> PredicateRetry<fn(&u32, u32) -> bool> {
        PredicateRetry::new(|_: &u32, _| true)
    }

    #[test]
    fn test_backoff_strategy_fixed() {
        let strategy = BackoffStrategy::Fixed(Duration::from_millis(100));

        assert_eq!(strategy.calculate_delay(0), Duration::from_millis(100));
        assert_eq!(strategy.calculate_delay(5), Duration::from_millis(100));
    }

    #[test]
    fn test_retry_config_validation() {
        assert!(RetryConfig::default().validate().is_ok());
        assert!(RetryConfig::builder().max_attempts(0).build().is_err());
    }

    #[tokio::test]
    async fn test_retry_executor_succeeds_after_transient_failures() {
        let executor = RetryExecutor::new(fast(3), always());
        let counter = Arc::new(AtomicU32::new(0));

        let result = executor
            .execute(|| {
                let c = Arc::clone(&counter);
                async move {
                    let n = c.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err(n)
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.expect("eventually succeeds"), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error() {
        let executor = RetryExecutor::new(fast(3), always());
        let counter = Arc::new(AtomicU32::new(0));

        let result = executor
            .execute(|| {
                let c = Arc::clone(&counter);
                async move { Err::<(), _>(c.fetch_add(1, Ordering::SeqCst)) }
            })
            .await;

        match result {
            Err(RetryError::AttemptsExhausted { attempts, source }) => {
                assert_eq!(attempts, 3);
                assert_eq!(source, 2, "last error is surfaced");
            }
            other => panic!("Expected AttemptsExhausted, got {other:?}"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_predicate_retry_only_matching_errors() {
        let policy = PredicateRetry::new(|error: &String, _attempt| error.contains("retryable"));
        let executor = RetryExecutor::new(fast(5), policy);
        let counter = Arc::new(AtomicU32::new(0));

        let result = executor
            .execute(|| {
                let c = Arc::clone(&counter);
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err::<(), _>("retryable error".to_string())
                    } else {
                        Err("fatal error".to_string())
                    }
                }
            })
            .await;

        assert!(matches!(result, Err(RetryError::NonRetryable { ref source }) if source == "fatal error"));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_retry_error_display() {
        let err = RetryError::AttemptsExhausted { attempts: 5, source: "boom" };
        assert!(err.to_string().contains("5 tries"));
        assert!(err.to_string().contains("boom"));

        let err = RetryError::<String>::InvalidConfiguration { message: "bad config".to_string() };
        assert!(err.to_string().contains("bad config"));
        assert_eq!(err.into_source(), None);
    }
}
