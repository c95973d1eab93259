//! HTTP transport

pub mod client;

pub use client::{BasicCredentials, HttpClient, HttpClientBuilder};
