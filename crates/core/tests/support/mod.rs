//! Shared test helpers for `qstor-core` integration tests.

pub mod fake_api;

pub use fake_api::{Call, FakeQuantaStor};
