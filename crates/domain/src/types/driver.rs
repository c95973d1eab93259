//! Shapes exchanged with the orchestration framework's driver contract

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::{ACCESS_MODE_RW, DRIVER_VOLUME_TYPE};

/// Volume as handed to the driver by the orchestration framework.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeRef {
    pub id: String,
    pub name: String,
    /// Size in GB
    pub size: u64,
}

/// Snapshot as handed to the driver by the orchestration framework.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotRef {
    pub id: String,
    pub name: String,
    /// Name of the volume the snapshot was taken from
    pub volume_name: String,
    /// Size in GB of the source volume
    pub volume_size: u64,
}

/// Compute-node connection properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Connector {
    pub initiator: String,
}

/// Result of attaching a volume: what the node needs to log in to the target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub driver_volume_type: String,
    pub data: IscsiTarget,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IscsiTarget {
    pub target_discovered: bool,
    pub target_iqn: String,
    pub target_portal: String,
    pub volume_id: String,
    pub access_mode: String,
}

impl ConnectionInfo {
    /// Read-write iSCSI connection to an already discovered target.
    pub fn iscsi(
        target_iqn: impl Into<String>,
        target_portal: impl Into<String>,
        volume_id: impl Into<String>,
    ) -> Self {
        Self {
            driver_volume_type: DRIVER_VOLUME_TYPE.to_string(),
            data: IscsiTarget {
                target_discovered: true,
                target_iqn: target_iqn.into(),
                target_portal: target_portal.into(),
                volume_id: volume_id.into(),
                access_mode: ACCESS_MODE_RW.to_string(),
            },
        }
    }
}

/// Capacity figure in GB, or `"unknown"` when the pool does not report it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Capacity {
    Gb(f64),
    Unknown,
}

impl Serialize for Capacity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Gb(value) => serializer.serialize_f64(*value),
            Self::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

impl<'de> Deserialize<'de> for Capacity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Self::Gb)
                .ok_or_else(|| de::Error::custom("capacity is not representable as f64")),
            serde_json::Value::String(s) if s == "unknown" => Ok(Self::Unknown),
            other => Err(de::Error::custom(format!("invalid capacity: {other}"))),
        }
    }
}

/// Capability report returned by `get_volume_stats`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VolumeStats {
    pub volume_backend_name: String,
    pub vendor_name: String,
    pub driver_version: String,
    pub storage_protocol: String,
    pub total_capacity_gb: Capacity,
    pub free_capacity_gb: Capacity,
    pub reserved_percentage: u32,
    #[serde(rename = "QoS_support")]
    pub qos_support: bool,
}
