//! # QuantaStor Domain
//!
//! Domain types and models for the QuantaStor block-storage backend.
//!
//! This crate contains:
//! - Entity snapshots (system, pool, volume, host, ACL, tier, task)
//! - Driver contract shapes (volume/snapshot refs, connection info, stats)
//! - Domain error type and Result definition
//! - Configuration structure
//! - Wire constants, unit conversion and address normalization
//!
//! ## Architecture
//! - Depends only on `qstor-common` (error classification)
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::{bytes_to_gb, gb_to_bytes, iscsi_portal, normalize_host};
