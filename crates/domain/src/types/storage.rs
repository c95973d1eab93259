//! QuantaStor entity snapshots
//!
//! Every value here is a read-only copy of remote state fetched by a single
//! API call. Nothing is cached and no relationship between entities is
//! enforced locally; the appliance owns referential integrity.

use serde::{Deserialize, Serialize};

/// The appliance itself, as reported by `storageSystemGet`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageSystem {
    pub name: String,
    pub id: String,
}

/// Capacity container volumes are provisioned from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pool {
    pub name: String,
    pub id: String,
    /// Free space in bytes, when the appliance reports it
    pub free_space: Option<u64>,
    /// Total size in bytes, when the appliance reports it
    pub size: Option<u64>,
}

/// Provisioned block volume (snapshots are volumes too).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Volume {
    pub name: String,
    pub id: String,
    /// Size in bytes
    pub size: u64,
    /// iSCSI target name
    pub iqn: String,
}

/// Compute-node endpoint registered on the appliance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Host {
    pub name: String,
    pub id: String,
    /// Initiator identifiers (IQN or WWPN), in server order
    pub initiators: Vec<String>,
}

/// Named collection of hosts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HostGroup {
    pub name: String,
    pub id: String,
    pub hosts: Vec<Host>,
}

/// Access grant binding a volume to a host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VolumeAcl {
    pub volume_id: String,
    pub host_id: String,
}

/// Storage tier reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tier {
    pub name: String,
    pub id: String,
}
