//! # QuantaStor Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The HTTP client (reqwest) and its error conversions
//! - The QuantaStor REST client, task poller and response decoding
//! - Configuration loading from the environment or TOML/JSON files
//!
//! ## Architecture
//! - Implements `qstor_core::QuantaStorApi`
//! - Depends on `qstor-common`, `qstor-domain` and `qstor-core`
//! - Contains all "impure" code (network and filesystem I/O)

pub mod config;
pub mod errors;
pub mod http;
pub mod quantastor;

pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use quantastor::{QuantaStorClient, TaskPoller};
