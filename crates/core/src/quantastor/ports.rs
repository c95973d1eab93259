//! QuantaStor REST API port
//!
//! One method per remote capability. Lookups return `Ok(None)` when the
//! appliance does not know the object; connection-level failures are still
//! errors. Mutating calls that start a server-side task wait for it and
//! return the entity the task produced, re-fetched by its correlation id.

use async_trait::async_trait;
use qstor_domain::{Host, HostGroup, Pool, Result, StorageSystem, Tier, Volume, VolumeAcl};

/// Trait for QuantaStor appliance operations
#[async_trait]
pub trait QuantaStorApi: Send + Sync {
    // Storage system, pools and tiers

    /// `storageSystemGet`
    async fn storage_system_get(&self) -> Result<Option<StorageSystem>>;

    /// `storagePoolGet` by pool name or id
    async fn storage_pool_get(&self, pool: Option<&str>) -> Result<Option<Pool>>;

    /// `storageTierGet` by tier name or id
    async fn storage_tier_get(&self, tier: &str) -> Result<Option<Tier>>;

    // Hosts

    /// `hostGet` by host name, id or initiator
    async fn host_get(&self, host: &str) -> Result<Option<Host>>;

    /// Register a host with one initiator, then re-fetch it by name.
    async fn host_add(&self, hostname: &str, iqn: &str) -> Result<Option<Host>>;

    /// Remove a host; returns the removed host when the appliance echoes it.
    async fn host_remove(&self, host: &str) -> Result<Option<Host>>;

    /// `hostInitiatorGet`: the host owning an initiator
    async fn host_initiator_get(&self, initiator: &str) -> Result<Option<Host>>;

    async fn host_initiator_add(&self, host: &str, iqn: &str) -> Result<Option<Host>>;

    async fn host_initiator_remove(&self, host: &str, iqn: &str) -> Result<Option<Host>>;

    // Host groups

    async fn host_group_get(&self, group: &str) -> Result<Option<HostGroup>>;

    /// Create a group from existing hosts, then re-fetch it by name.
    async fn host_group_create(&self, name: &str, hosts: &[String]) -> Result<Option<HostGroup>>;

    async fn host_group_delete(&self, name: &str) -> Result<Option<HostGroup>>;

    // Storage volumes

    /// `storageVolumeEnum`
    async fn storage_volume_list(&self) -> Result<Vec<Volume>>;

    async fn storage_volume_get(&self, volume: &str) -> Result<Option<Volume>>;

    /// Thin-provision a volume of `size` bytes in `pool`.
    async fn storage_volume_create(
        &self,
        name: &str,
        size: u64,
        description: &str,
        pool: Option<&str>,
    ) -> Result<Option<Volume>>;

    /// Clone `source` (a volume or snapshot) as `clone_name`.
    async fn storage_volume_clone(
        &self,
        source: &str,
        clone_name: &str,
        pool: Option<&str>,
    ) -> Result<Option<Volume>>;

    async fn storage_volume_snapshot(
        &self,
        volume: &str,
        snapshot_name: &str,
        pool: Option<&str>,
    ) -> Result<Option<Volume>>;

    /// Grow `volume` to `new_size` bytes.
    async fn storage_volume_resize(
        &self,
        volume: &str,
        pool: Option<&str>,
        new_size: u64,
    ) -> Result<Option<Volume>>;

    /// Delete a volume or snapshot and wait for the task to finish.
    async fn storage_volume_delete(&self, volume: &str) -> Result<()>;

    // Volume access control

    async fn storage_volume_acl_get(&self, volume: &str, host: &str) -> Result<Option<VolumeAcl>>;

    /// `storageVolumeAclEnum`; an appliance answer of `0` is an empty list.
    async fn storage_volume_acl_list(&self, volume: &str) -> Result<Vec<VolumeAcl>>;

    /// Grant `host` access to `volume`, then re-fetch the ACL.
    async fn storage_volume_attach(&self, volume: &str, host: &str) -> Result<Option<VolumeAcl>>;

    /// Revoke `host`'s access to `volume`.
    async fn storage_volume_detach(&self, volume: &str, host: &str) -> Result<()>;
}
