//! # QuantaStor Core
//!
//! Driver logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (the QuantaStor API client contract)
//! - The volume driver contract and its QuantaStor implementation
//!
//! ## Architecture Principles
//! - Only depends on `qstor-common` and `qstor-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits

pub mod driver;
pub mod quantastor;

pub use driver::{DriverConfig, QuantaStorDriver, VolumeDriver};
pub use quantastor::ports::QuantaStorApi;
