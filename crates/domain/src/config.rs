//! Backend configuration
//!
//! One immutable [`QuantaStorConfig`] is built at setup time (from the
//! environment or a file, see `qstor-infra::config`) and handed to the API
//! client and the driver. Nothing mutates it afterwards.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TASK_DELAY_UNIT_MS, DEFAULT_TASK_POLL_ATTEMPTS,
    DEFAULT_TASK_RETRY_ATTEMPTS, DEFAULT_TASK_RETRY_INTERVAL_UNITS,
};
use crate::errors::{QuantaStorError, Result};
use crate::utils::normalize_host;

/// Connection and polling settings for one QuantaStor backend.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QuantaStorConfig {
    /// Management IP of the appliance (IPv4 or IPv6 literal)
    pub san_ip: String,
    /// Basic-auth user
    pub san_login: String,
    /// Basic-auth password; never printed by `Debug`
    pub san_password: String,
    /// Pool (provisionable) volumes are created in
    pub pool_id: Option<String>,
    /// Backend name reported in capacity stats
    pub volume_backend_name: String,
    /// Verify the appliance's TLS certificate
    pub verify_ssl: bool,
    /// Whole-request HTTP timeout
    pub request_timeout_secs: u64,
    /// Length of one "delay unit" used for task registration waits and the
    /// outer poll retry interval
    pub task_delay_unit_ms: u64,
    /// `taskGet` calls per poll sequence
    pub task_poll_attempts: u32,
    /// Pause between two `taskGet` calls
    pub task_poll_interval_ms: u64,
    /// Total poll sequences run before a timeout surfaces
    pub task_retry_attempts: u32,
    /// Pause between poll sequences, in delay units
    pub task_retry_interval_units: u32,
    /// Full API base URL; replaces `https://<san_ip>:8153/qstorapi/`
    pub base_url: Option<String>,
}

impl Default for QuantaStorConfig {
    fn default() -> Self {
        Self {
            san_ip: String::new(),
            san_login: String::new(),
            san_password: String::new(),
            pool_id: None,
            volume_backend_name: "quantastor".to_string(),
            verify_ssl: true,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            task_delay_unit_ms: DEFAULT_TASK_DELAY_UNIT_MS,
            task_poll_attempts: DEFAULT_TASK_POLL_ATTEMPTS,
            task_poll_interval_ms: 0,
            task_retry_attempts: DEFAULT_TASK_RETRY_ATTEMPTS,
            task_retry_interval_units: DEFAULT_TASK_RETRY_INTERVAL_UNITS,
            base_url: None,
        }
    }
}

impl fmt::Debug for QuantaStorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuantaStorConfig")
            .field("san_ip", &self.san_ip)
            .field("san_login", &self.san_login)
            .field("san_password", &"<redacted>")
            .field("pool_id", &self.pool_id)
            .field("volume_backend_name", &self.volume_backend_name)
            .field("verify_ssl", &self.verify_ssl)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("task_delay_unit_ms", &self.task_delay_unit_ms)
            .field("task_poll_attempts", &self.task_poll_attempts)
            .field("task_poll_interval_ms", &self.task_poll_interval_ms)
            .field("task_retry_attempts", &self.task_retry_attempts)
            .field("task_retry_interval_units", &self.task_retry_interval_units)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl QuantaStorConfig {
    /// Configuration with the three required fields set and defaults elsewhere.
    pub fn new(
        san_ip: impl Into<String>,
        san_login: impl Into<String>,
        san_password: impl Into<String>,
    ) -> Self {
        Self {
            san_ip: san_ip.into(),
            san_login: san_login.into(),
            san_password: san_password.into(),
            ..Self::default()
        }
    }

    /// Set the pool volumes are provisioned from.
    pub fn with_pool(mut self, pool_id: impl Into<String>) -> Self {
        self.pool_id = Some(pool_id.into());
        self
    }

    /// Check required fields, the address, and the polling bounds.
    ///
    /// # Errors
    /// - [`QuantaStorError::MissingConfiguration`] naming the first empty
    ///   required field (`san_ip`, `san_login`, `san_password`)
    /// - [`QuantaStorError::InvalidAddress`] if `san_ip` is not an IP literal
    /// - [`QuantaStorError::Config`] for zero poll or retry attempts
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("san_ip", &self.san_ip),
            ("san_login", &self.san_login),
            ("san_password", &self.san_password),
        ] {
            if value.trim().is_empty() {
                return Err(QuantaStorError::MissingConfiguration(field.to_string()));
            }
        }

        normalize_host(&self.san_ip)?;

        if self.task_poll_attempts == 0 {
            return Err(QuantaStorError::Config("task_poll_attempts must be greater than 0".into()));
        }
        if self.task_retry_attempts == 0 {
            return Err(QuantaStorError::Config(
                "task_retry_attempts must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// HTTP timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Wall-clock length of `units` delay units.
    pub fn task_delay(&self, units: u32) -> Duration {
        Duration::from_millis(self.task_delay_unit_ms.saturating_mul(u64::from(units)))
    }

    /// Pause between two `taskGet` calls.
    pub fn task_poll_interval(&self) -> Duration {
        Duration::from_millis(self.task_poll_interval_ms)
    }

    /// Pause between two poll sequences.
    pub fn task_retry_interval(&self) -> Duration {
        self.task_delay(self.task_retry_interval_units)
    }
}
