//! Wire and driver constants
//!
//! Values the QuantaStor REST dialect and the volume driver contract fix;
//! changing any of them breaks compatibility with the appliance.

// REST endpoint layout
pub const API_PORT: u16 = 8153;
pub const API_PATH: &str = "qstorapi/";
pub const ISCSI_PORT: u16 = 3260;

// Numeric task states reported by `taskGet`
pub const TASK_STATE_FAILED: i64 = 3;
pub const TASK_STATE_CANCELLED: i64 = 4;
pub const TASK_STATE_COMPLETED: i64 = 5;

// Task polling defaults
pub const DEFAULT_TASK_POLL_ATTEMPTS: u32 = 10;
pub const DEFAULT_TASK_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_TASK_RETRY_INTERVAL_UNITS: u32 = 2;
pub const DEFAULT_TASK_DELAY_UNIT_MS: u64 = 1000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Registration delays (in delay units) before the first `taskGet`
pub const SHORT_TASK_DELAY_UNITS: u32 = 2;
pub const LONG_TASK_DELAY_UNITS: u32 = 3;

// ACL modification operations for `storageVolumeAclAddRemove`
pub const ACL_MOD_ADD: u8 = 0;
pub const ACL_MOD_REMOVE: u8 = 1;

// Host registration
pub const HOST_TYPE_LINUX: u8 = 3;
pub const HOST_NAME_PREFIX: &str = "ostack-";

// Driver identity reported in capacity stats
pub const DRIVER_VERSION: &str = "1.0.0";
pub const VENDOR_NAME: &str = "OSNEXUS";
pub const STORAGE_PROTOCOL: &str = "iSCSI";
pub const DRIVER_VOLUME_TYPE: &str = "iscsi";
pub const ACCESS_MODE_RW: &str = "rw";
pub const VOLUME_CREATE_DESCRIPTION: &str = "volume creation";

/// Bytes per GiB (1024³); the only unit conversion the driver performs.
pub const BYTES_PER_GB: u64 = 1024 * 1024 * 1024;
