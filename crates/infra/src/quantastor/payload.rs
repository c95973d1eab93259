//! Ordered query payload for QuantaStor RPCs
//!
//! The appliance reads every parameter from the query string. Booleans are
//! spelled `True`/`False` and list values repeat their key once per element.

use std::fmt;

/// Flat, insertion-ordered list of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    params: Vec<(String, String)>,
}

impl Payload {
    /// Empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string parameter.
    pub fn str(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    /// Add an integer parameter in decimal.
    pub fn int(self, key: &str, value: impl Into<i128>) -> Self {
        let value: i128 = value.into();
        self.str(key, value.to_string())
    }

    /// Add a boolean as `True` or `False`.
    pub fn flag(self, key: &str, value: bool) -> Self {
        self.str(key, if value { "True" } else { "False" })
    }

    /// Add `key` once per element of `values`.
    pub fn list<S: AsRef<str>>(mut self, key: &str, values: &[S]) -> Self {
        for value in values {
            self.params.push((key.to_string(), value.as_ref().to_string()));
        }
        self
    }

    /// Add `key` only when `value` is present.
    pub fn opt_str(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.str(key, value),
            None => self,
        }
    }

    /// Parameters in insertion order, ready for `RequestBuilder::query`.
    pub fn as_query(&self) -> &[(String, String)] {
        &self.params
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.params.iter().enumerate() {
            if index > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}
