//! QuantaStor appliance ports

pub mod ports;

pub use ports::QuantaStorApi;
