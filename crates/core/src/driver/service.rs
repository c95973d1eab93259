//! QuantaStor volume driver - translates the driver contract into API calls

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use qstor_common::ErrorClassification;
use qstor_domain::constants::{
    DRIVER_VERSION, HOST_NAME_PREFIX, STORAGE_PROTOCOL, VENDOR_NAME, VOLUME_CREATE_DESCRIPTION,
};
use qstor_domain::{
    bytes_to_gb, gb_to_bytes, iscsi_portal, Capacity, ConnectionInfo, Connector, Host,
    QuantaStorConfig, QuantaStorError, Result, SnapshotRef, Volume, VolumeRef, VolumeStats,
};
use tracing::{debug, error, info, instrument, warn};

use super::ports::VolumeDriver;
use crate::quantastor::QuantaStorApi;

/// The subset of backend configuration the driver itself needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Appliance address; the iSCSI portal is derived from it
    pub san_ip: String,
    /// Pool volumes are provisioned from; `None` lets the appliance choose
    pub pool_id: Option<String>,
    /// Backend name reported in capacity stats
    pub volume_backend_name: String,
}

impl From<&QuantaStorConfig> for DriverConfig {
    fn from(config: &QuantaStorConfig) -> Self {
        Self {
            san_ip: config.san_ip.clone(),
            pool_id: config.pool_id.clone(),
            volume_backend_name: config.volume_backend_name.clone(),
        }
    }
}

/// Host name registered for an initiator: `ostack-` plus everything after
/// the initiator's last `:`.
pub fn host_name_for_initiator(initiator: &str) -> String {
    let suffix = initiator.rsplit_once(':').map_or(initiator, |(_, tail)| tail);
    format!("{HOST_NAME_PREFIX}{suffix}")
}

/// Volume driver backed by a QuantaStor appliance
pub struct QuantaStorDriver {
    api: Arc<dyn QuantaStorApi>,
    config: DriverConfig,
    stats: RwLock<Option<VolumeStats>>,
}

impl QuantaStorDriver {
    /// Create a new driver over an API client
    pub fn new(api: Arc<dyn QuantaStorApi>, config: DriverConfig) -> Self {
        Self { api, config, stats: RwLock::new(None) }
    }

    fn pool(&self) -> Option<&str> {
        self.config.pool_id.as_deref()
    }

    /// Fetch a volume that must exist.
    async fn existing_volume(&self, name: &str) -> Result<Volume> {
        self.api
            .storage_volume_get(name)
            .await?
            .ok_or_else(|| QuantaStorError::backend("Failed to load volume information"))
    }

    async fn clone_and_grow(
        &self,
        source: &str,
        volume: &VolumeRef,
        source_size_gb: u64,
    ) -> Result<Volume> {
        let clone = self
            .api
            .storage_volume_clone(source, &volume.name, self.pool())
            .await?
            .ok_or_else(|| QuantaStorError::backend("Failed to load clone information"))?;
        debug!(clone_id = %clone.id, source, "cloned volume created");

        if volume.size > source_size_gb {
            return self.extend_volume(volume, volume.size).await;
        }
        Ok(clone)
    }

    /// Delete a volume or snapshot and make sure it no longer resolves.
    async fn delete_and_verify(&self, name: &str, what: &str) -> Result<()> {
        self.api.storage_volume_delete(name).await?;

        debug!(name, "verifying that {what} no longer exists");
        if self.api.storage_volume_get(name).await?.is_some() {
            return Err(QuantaStorError::backend(format!("Failed to delete {what}")));
        }
        debug!(name, "{what} was successfully deleted");
        Ok(())
    }

    /// Host registered for `initiator`, registering one if needed.
    async fn host_for_initiator(&self, initiator: &str) -> Result<Host> {
        if let Some(host) = self.api.host_get(initiator).await? {
            return Ok(host);
        }

        let host_name = host_name_for_initiator(initiator);
        debug!(%host_name, "host with specified initiator not found, creating new host");
        self.api
            .host_add(&host_name, initiator)
            .await?
            .ok_or_else(|| QuantaStorError::backend("Failed to create host entry in QuantaStor"))
    }

    async fn verify_setup(&self) -> Result<()> {
        let system = self.api.storage_system_get().await?.ok_or_else(|| {
            QuantaStorError::backend("Failed to load QuantaStor system information")
        })?;
        let pool = self.api.storage_pool_get(self.pool()).await?.ok_or_else(|| {
            QuantaStorError::backend("Failed to load QuantaStor pool information")
        })?;

        info!(
            system = %system.name,
            pool_id = %pool.id,
            pool_name = %pool.name,
            "connected to QuantaStor system"
        );
        Ok(())
    }

    /// The portal is resolved before anything changes on the appliance.
    async fn attach(&self, volume: &VolumeRef, connector: &Connector) -> Result<ConnectionInfo> {
        let portal = iscsi_portal(&self.config.san_ip)?;
        let qs_volume = self.existing_volume(&volume.name).await?;
        let host = self.host_for_initiator(&connector.initiator).await?;

        debug!(host_id = %host.id, "attaching volume to host");
        self.api
            .storage_volume_attach(&volume.name, &host.id)
            .await?
            .ok_or_else(|| QuantaStorError::backend("Failed to assign volume to host"))?;

        debug!(%portal, "successfully attached volume to host");
        Ok(ConnectionInfo::iscsi(qs_volume.iqn, portal, volume.id.clone()))
    }

    async fn detach(&self, volume: &VolumeRef, connector: Option<&Connector>) -> Result<()> {
        let Some(qs_volume) = self.api.storage_volume_get(&volume.name).await? else {
            warn!("unable to find volume");
            return Ok(());
        };

        match connector {
            Some(connector) => {
                self.api.storage_volume_detach(&qs_volume.id, &connector.initiator).await?;
            }
            None => {
                warn!(volume_id = %qs_volume.id, "removing all host connections for volume");
                for acl in self.api.storage_volume_acl_list(&qs_volume.id).await? {
                    self.api.storage_volume_detach(&qs_volume.id, &acl.host_id).await?;
                }
            }
        }
        Ok(())
    }

    async fn refresh_stats(&self) -> Result<VolumeStats> {
        let pool = self
            .api
            .storage_pool_get(self.pool())
            .await?
            .ok_or_else(|| QuantaStorError::backend("Failed to load QuantaStor pool information"))?;

        let capacity =
            |bytes: Option<u64>| bytes.map_or(Capacity::Unknown, |b| Capacity::Gb(bytes_to_gb(b)));
        let stats = VolumeStats {
            volume_backend_name: self.config.volume_backend_name.clone(),
            vendor_name: VENDOR_NAME.to_string(),
            driver_version: DRIVER_VERSION.to_string(),
            storage_protocol: STORAGE_PROTOCOL.to_string(),
            total_capacity_gb: capacity(pool.size),
            free_capacity_gb: capacity(pool.free_space),
            reserved_percentage: 0,
            qos_support: false,
        };

        *self.stats.write() = Some(stats.clone());
        Ok(stats)
    }
}

fn log_failure(operation: &'static str, err: &QuantaStorError) {
    if err.is_critical() {
        error!(operation, error = %err, kind = err.label(), "driver operation failed");
        return;
    }
    warn!(
        operation,
        error = %err,
        kind = err.label(),
        severity = %err.severity(),
        retryable = err.is_retryable(),
        "driver operation failed"
    );
}

#[async_trait]
impl VolumeDriver for QuantaStorDriver {
    #[instrument(skip(self))]
    async fn check_for_setup_error(&self) -> Result<()> {
        info!("checking for setup errors");
        self.verify_setup().await.inspect_err(|e| log_failure("check_for_setup_error", e))
    }

    #[instrument(skip(self, volume), fields(volume = %volume.name, size_gb = volume.size))]
    async fn create_volume(&self, volume: &VolumeRef) -> Result<Volume> {
        let size = gb_to_bytes(volume.size).inspect_err(|e| log_failure("create_volume", e))?;
        let created = self
            .api
            .storage_volume_create(&volume.name, size, VOLUME_CREATE_DESCRIPTION, self.pool())
            .await
            .inspect_err(|e| log_failure("create_volume", e))?
            .ok_or_else(|| QuantaStorError::backend("Failed to load volume information"))?;

        debug!(volume_id = %created.id, "volume was successfully created");
        Ok(created)
    }

    #[instrument(skip(self, volume, source), fields(volume = %volume.name, source = %source.name))]
    async fn create_cloned_volume(
        &self,
        volume: &VolumeRef,
        source: &VolumeRef,
    ) -> Result<Volume> {
        self.clone_and_grow(&source.name, volume, source.size)
            .await
            .inspect_err(|e| log_failure("create_cloned_volume", e))
    }

    #[instrument(skip(self, volume, snapshot), fields(volume = %volume.name, snapshot = %snapshot.name))]
    async fn create_volume_from_snapshot(
        &self,
        volume: &VolumeRef,
        snapshot: &SnapshotRef,
    ) -> Result<Volume> {
        self.clone_and_grow(&snapshot.name, volume, snapshot.volume_size)
            .await
            .inspect_err(|e| log_failure("create_volume_from_snapshot", e))
    }

    #[instrument(skip(self, volume), fields(volume = %volume.name))]
    async fn delete_volume(&self, volume: &VolumeRef) -> Result<()> {
        self.delete_and_verify(&volume.name, "volume")
            .await
            .inspect_err(|e| log_failure("delete_volume", e))
    }

    #[instrument(skip(self, snapshot), fields(snapshot = %snapshot.name, volume = %snapshot.volume_name))]
    async fn create_snapshot(&self, snapshot: &SnapshotRef) -> Result<Volume> {
        let created = self
            .api
            .storage_volume_snapshot(&snapshot.volume_name, &snapshot.name, self.pool())
            .await
            .inspect_err(|e| log_failure("create_snapshot", e))?
            .ok_or_else(|| QuantaStorError::backend("Failed to load snapshot information"))?;

        debug!(snapshot_id = %created.id, "snapshot was successfully created");
        Ok(created)
    }

    #[instrument(skip(self, snapshot), fields(snapshot = %snapshot.name))]
    async fn delete_snapshot(&self, snapshot: &SnapshotRef) -> Result<()> {
        self.delete_and_verify(&snapshot.name, "snapshot")
            .await
            .inspect_err(|e| log_failure("delete_snapshot", e))
    }

    #[instrument(skip(self, volume), fields(volume = %volume.name))]
    async fn extend_volume(&self, volume: &VolumeRef, new_size_gb: u64) -> Result<Volume> {
        let requested =
            gb_to_bytes(new_size_gb).inspect_err(|e| log_failure("extend_volume", e))?;
        let resized = self
            .api
            .storage_volume_resize(&volume.name, self.pool(), requested)
            .await
            .inspect_err(|e| log_failure("extend_volume", e))?
            .ok_or_else(|| QuantaStorError::backend("Failed to get volume information"))?;

        if resized.size != requested {
            warn!(requested, reported = resized.size, "volume size mismatch after resize");
            return Err(QuantaStorError::backend("Failed to extend volume"));
        }

        debug!(size = resized.size, "volume was successfully extended");
        Ok(resized)
    }

    #[instrument(skip(self, volume, connector), fields(volume = %volume.name, initiator = %connector.initiator))]
    async fn initialize_connection(
        &self,
        volume: &VolumeRef,
        connector: &Connector,
    ) -> Result<ConnectionInfo> {
        self.attach(volume, connector)
            .await
            .inspect_err(|e| log_failure("initialize_connection", e))
    }

    #[instrument(skip(self, volume, connector), fields(volume = %volume.name))]
    async fn terminate_connection(
        &self,
        volume: &VolumeRef,
        connector: Option<&Connector>,
    ) -> Result<()> {
        self.detach(volume, connector)
            .await
            .inspect_err(|e| log_failure("terminate_connection", e))
    }

    async fn get_volume_stats(&self, refresh: bool) -> Result<VolumeStats> {
        if !refresh {
            let cached = self.stats.read().clone();
            if let Some(stats) = cached {
                return Ok(stats);
            }
        }
        self.refresh_stats().await.inspect_err(|e| log_failure("get_volume_stats", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_name_uses_initiator_suffix() {
        assert_eq!(host_name_for_initiator("iqn.1993-08.org.debian:01:abc123"), "ostack-abc123");
        assert_eq!(host_name_for_initiator("21000024ff3dd3c2"), "ostack-21000024ff3dd3c2");
        assert_eq!(host_name_for_initiator("iqn.trailing:"), "ostack-");
    }

    #[test]
    fn driver_config_drops_credentials() {
        let config = QuantaStorConfig::new("10.0.0.5", "admin", "secret").with_pool("p-1");
        let driver_config = DriverConfig::from(&config);
        assert_eq!(driver_config.pool_id.as_deref(), Some("p-1"));
        assert_eq!(driver_config.volume_backend_name, "quantastor");
        assert_eq!(driver_config.san_ip, "10.0.0.5");
    }
}
