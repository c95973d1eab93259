//! Volume driver contract and the QuantaStor-backed implementation

pub mod ports;
pub mod service;

pub use ports::VolumeDriver;
pub use service::{host_name_for_initiator, DriverConfig, QuantaStorDriver};
