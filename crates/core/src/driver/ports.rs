//! Volume driver contract expected by the orchestration framework

use async_trait::async_trait;
use qstor_domain::{
    ConnectionInfo, Connector, Result, SnapshotRef, Volume, VolumeRef, VolumeStats,
};

/// Operations a block-storage backend exposes to the orchestration framework.
///
/// Sizes on [`VolumeRef`] and [`SnapshotRef`] are in GB; implementations
/// convert to whatever unit their backend speaks.
#[async_trait]
pub trait VolumeDriver: Send + Sync {
    /// Verify the backend is reachable and configured.
    async fn check_for_setup_error(&self) -> Result<()>;

    async fn create_volume(&self, volume: &VolumeRef) -> Result<Volume>;

    async fn create_cloned_volume(&self, volume: &VolumeRef, source: &VolumeRef)
        -> Result<Volume>;

    async fn create_volume_from_snapshot(
        &self,
        volume: &VolumeRef,
        snapshot: &SnapshotRef,
    ) -> Result<Volume>;

    async fn delete_volume(&self, volume: &VolumeRef) -> Result<()>;

    async fn create_snapshot(&self, snapshot: &SnapshotRef) -> Result<Volume>;

    async fn delete_snapshot(&self, snapshot: &SnapshotRef) -> Result<()>;

    async fn extend_volume(&self, volume: &VolumeRef, new_size_gb: u64) -> Result<Volume>;

    /// Export `volume` to the node described by `connector`.
    async fn initialize_connection(
        &self,
        volume: &VolumeRef,
        connector: &Connector,
    ) -> Result<ConnectionInfo>;

    /// Revoke access; `None` revokes every host's access.
    async fn terminate_connection(
        &self,
        volume: &VolumeRef,
        connector: Option<&Connector>,
    ) -> Result<()>;

    /// Capacity report, recomputed when `refresh` is set.
    async fn get_volume_stats(&self, refresh: bool) -> Result<VolumeStats>;

    fn ensure_export(&self, _volume: &VolumeRef) -> Result<()> {
        Ok(())
    }

    fn remove_export(&self, _volume: &VolumeRef) -> Result<()> {
        Ok(())
    }
}
