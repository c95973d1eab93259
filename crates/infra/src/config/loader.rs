//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Environment variables, when all required ones are set
//! 2. Otherwise the first config file found by [`probe_config_paths`]
//!
//! Every loader validates the result before returning it.
//!
//! ## Environment Variables
//! - `QSTOR_SAN_IP`, `QSTOR_SAN_LOGIN`, `QSTOR_SAN_PASSWORD` (required)
//! - `QSTOR_POOL_ID`
//! - `QSTOR_VOLUME_BACKEND_NAME`
//! - `QSTOR_VERIFY_SSL` (true/false)
//! - `QSTOR_REQUEST_TIMEOUT_SECS`
//! - `QSTOR_TASK_DELAY_UNIT_MS`
//! - `QSTOR_TASK_POLL_ATTEMPTS`, `QSTOR_TASK_POLL_INTERVAL_MS`
//! - `QSTOR_TASK_RETRY_ATTEMPTS`, `QSTOR_TASK_RETRY_INTERVAL_UNITS`
//! - `QSTOR_BASE_URL`
//!
//! ## File Locations
//! 1. `./quantastor.{toml,json}`, then `./config.{toml,json}`
//! 2. The same names in the parent and grandparent directories
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use qstor_domain::{QuantaStorConfig, QuantaStorError, Result};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["quantastor.toml", "quantastor.json", "config.toml", "config.json"];

/// Load configuration from the environment, falling back to a file.
///
/// # Errors
/// Returns the file loader's error when the environment is incomplete and no
/// usable config file exists. An environment that is complete but invalid is
/// reported as is.
pub fn load() -> Result<QuantaStorConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(QuantaStorError::MissingConfiguration(var)) => {
            tracing::debug!(missing = %var, "Environment incomplete, trying config file");
            load_from_file(None)
        }
        Err(e) => Err(e),
    }
}

/// Load configuration from `QSTOR_*` environment variables.
///
/// # Errors
/// - [`QuantaStorError::MissingConfiguration`] naming the first unset
///   required variable
/// - [`QuantaStorError::Config`] for unparsable numbers or booleans
/// - any validation error
pub fn load_from_env() -> Result<QuantaStorConfig> {
    let mut config = QuantaStorConfig::new(
        env_var("QSTOR_SAN_IP")?,
        env_var("QSTOR_SAN_LOGIN")?,
        env_var("QSTOR_SAN_PASSWORD")?,
    );

    config.pool_id = env_opt("QSTOR_POOL_ID");
    if let Some(name) = env_opt("QSTOR_VOLUME_BACKEND_NAME") {
        config.volume_backend_name = name;
    }
    config.verify_ssl = env_bool("QSTOR_VERIFY_SSL", config.verify_ssl)?;
    config.request_timeout_secs =
        env_parse("QSTOR_REQUEST_TIMEOUT_SECS", config.request_timeout_secs)?;
    config.task_delay_unit_ms = env_parse("QSTOR_TASK_DELAY_UNIT_MS", config.task_delay_unit_ms)?;
    config.task_poll_attempts = env_parse("QSTOR_TASK_POLL_ATTEMPTS", config.task_poll_attempts)?;
    config.task_poll_interval_ms =
        env_parse("QSTOR_TASK_POLL_INTERVAL_MS", config.task_poll_interval_ms)?;
    config.task_retry_attempts =
        env_parse("QSTOR_TASK_RETRY_ATTEMPTS", config.task_retry_attempts)?;
    config.task_retry_interval_units =
        env_parse("QSTOR_TASK_RETRY_INTERVAL_UNITS", config.task_retry_interval_units)?;
    config.base_url = env_opt("QSTOR_BASE_URL");

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file.
///
/// If `path` is `None`, probes the standard locations. The format is picked
/// by extension (`.toml` or `.json`).
///
/// # Errors
/// Returns [`QuantaStorError::Config`] if the file is missing, unreadable or
/// malformed, plus any validation error.
pub fn load_from_file(path: Option<PathBuf>) -> Result<QuantaStorConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(QuantaStorError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            QuantaStorError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| QuantaStorError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<QuantaStorConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| QuantaStorError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| QuantaStorError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(QuantaStorError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Required variable; unset or blank is a missing configuration.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| QuantaStorError::MissingConfiguration(key.to_string()))
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| QuantaStorError::Config(format!("Invalid value for {key}: {e}"))),
        None => Ok(default),
    }
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
/// Anything else is an error rather than `false`.
fn env_bool(key: &str, default: bool) -> Result<bool> {
    let Some(raw) = env_opt(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(QuantaStorError::Config(format!(
            "Invalid value for {key}: expected true or false, got {raw:?}"
        ))),
    }
}
