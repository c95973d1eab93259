//! Pure helpers shared by the client and the driver

pub mod address;
pub mod units;

pub use address::{iscsi_portal, normalize_host};
pub use units::{bytes_to_gb, gb_to_bytes};
