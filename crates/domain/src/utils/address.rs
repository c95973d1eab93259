//! Appliance address normalization
//!
//! IPv6 literals must be bracketed wherever they are combined with a port,
//! both in the REST base URL and in the iSCSI portal.

use std::net::IpAddr;

use crate::constants::ISCSI_PORT;
use crate::errors::{QuantaStorError, Result};

/// Return `addr` unchanged for IPv4, `[addr]` for IPv6.
///
/// # Errors
/// Returns [`QuantaStorError::InvalidAddress`] if `addr` is not an IP literal.
pub fn normalize_host(addr: &str) -> Result<String> {
    let trimmed = addr.trim();
    match trimmed.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => Ok(trimmed.to_string()),
        Ok(IpAddr::V6(_)) => Ok(format!("[{trimmed}]")),
        Err(_) => Err(QuantaStorError::InvalidAddress(addr.to_string())),
    }
}

/// iSCSI portal (`host:3260`) for the configured appliance address.
///
/// # Errors
/// Returns [`QuantaStorError::InvalidAddress`] if `addr` is not an IP literal.
pub fn iscsi_portal(addr: &str) -> Result<String> {
    Ok(format!("{}:{ISCSI_PORT}", normalize_host(addr)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_is_left_alone() {
        assert_eq!(normalize_host("10.0.0.5").unwrap(), "10.0.0.5");
        assert_eq!(iscsi_portal("10.0.0.5").unwrap(), "10.0.0.5:3260");
    }

    #[test]
    fn ipv6_is_bracketed() {
        assert_eq!(normalize_host("fe80::1").unwrap(), "[fe80::1]");
        assert_eq!(iscsi_portal("fe80::1").unwrap(), "[fe80::1]:3260");
    }

    #[test]
    fn hostnames_and_garbage_are_rejected() {
        for bad in ["qstor.example.com", "", "10.0.0.256", "[fe80::1]"] {
            let err = normalize_host(bad).unwrap_err();
            assert!(matches!(err, QuantaStorError::InvalidAddress(_)), "{bad}");
        }
    }
}
