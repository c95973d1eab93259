//! GB ↔ bytes conversion (binary units, 1024³)

use crate::constants::BYTES_PER_GB;
use crate::errors::{QuantaStorError, Result};

/// Convert whole GB to bytes.
///
/// # Errors
/// [`QuantaStorError::Backend`] when the byte count does not fit in a `u64`.
pub fn gb_to_bytes(size_gb: u64) -> Result<u64> {
    size_gb.checked_mul(BYTES_PER_GB).ok_or_else(|| {
        QuantaStorError::backend(format!("Requested size of {size_gb} GB is out of range"))
    })
}

/// Convert bytes to (fractional) GB.
#[allow(clippy::cast_precision_loss)]
pub fn bytes_to_gb(size_bytes: u64) -> f64 {
    size_bytes as f64 / BYTES_PER_GB as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_gb_round_trips_exactly() {
        let bytes = gb_to_bytes(10).unwrap();
        assert_eq!(bytes, 10_737_418_240);
        assert!((bytes_to_gb(bytes) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_gb_is_fractional() {
        assert!((bytes_to_gb(BYTES_PER_GB / 2) - 0.5).abs() < f64::EPSILON);
        assert!(bytes_to_gb(0).abs() < f64::EPSILON);
    }

    #[test]
    fn integer_inputs_round_trip() {
        for gb in [1_u64, 2, 50, 1024, 16_384] {
            let bytes = gb_to_bytes(gb).unwrap();
            assert!((bytes_to_gb(bytes) - gb as f64).abs() < f64::EPSILON, "{gb} GB");
        }
    }

    #[test]
    fn oversized_request_is_rejected() {
        let largest = u64::MAX / BYTES_PER_GB;
        assert_eq!(gb_to_bytes(largest).unwrap(), largest * BYTES_PER_GB);
        assert!(matches!(gb_to_bytes(largest + 1), Err(QuantaStorError::Backend(_))));
        assert!(matches!(gb_to_bytes(u64::MAX / 1024), Err(QuantaStorError::Backend(_))));
    }
}
