//! QuantaStor REST API client
//!
//! [`QuantaStorClient`] implements the `QuantaStorApi` port from
//! `qstor-core` over HTTP. [`TaskPoller`] waits for the asynchronous tasks
//! that mutating calls start.

pub mod client;
pub(crate) mod parsing;
pub mod payload;
pub mod poller;
pub mod transport;

pub use client::QuantaStorClient;
pub use payload::Payload;
pub use poller::TaskPoller;
pub use transport::RestTransport;

/// Configuration pointing at a mock server, with every wait set to zero.
#[cfg(test)]
pub(crate) fn test_config(uri: &str) -> qstor_domain::QuantaStorConfig {
    let mut config = qstor_domain::QuantaStorConfig::new("10.0.0.5", "admin", "secret");
    config.base_url = Some(format!("{uri}/qstorapi"));
    config.task_delay_unit_ms = 0;
    config.task_poll_interval_ms = 0;
    config
}
