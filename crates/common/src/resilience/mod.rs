//! Resilience patterns for fault tolerance
//!
//! Generic over the error type: nothing in here knows about QuantaStor.
//! Callers supply a [`RetryPolicy`] that inspects their own errors.

pub mod retry;

pub use retry::{
    policies, BackoffStrategy, RetryConfig, RetryConfigBuilder, RetryDecision, RetryError,
    RetryExecutor, RetryPolicy, RetryResult,
};
