//! HTTP implementation of the `QuantaStorApi` port

use async_trait::async_trait;
use qstor_core::QuantaStorApi;
use qstor_domain::constants::{
    ACL_MOD_ADD, ACL_MOD_REMOVE, HOST_TYPE_LINUX, LONG_TASK_DELAY_UNITS, SHORT_TASK_DELAY_UNITS,
};
use qstor_domain::{
    Host, HostGroup, Pool, QuantaStorConfig, Result, StorageSystem, Tier, Volume, VolumeAcl,
};
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::parsing::{
    decode_acl, decode_acl_list, decode_host, decode_host_group, decode_host_initiator,
    decode_pool, decode_system, decode_tier, decode_volume, decode_volume_list, task_id,
};
use super::payload::Payload;
use super::poller::TaskPoller;
use super::transport::RestTransport;

/// QuantaStor appliance client.
///
/// Cheap to share: the underlying HTTP connection pool is reference counted
/// and nothing here is mutated after construction.
#[derive(Clone)]
pub struct QuantaStorClient {
    transport: RestTransport,
    poller: TaskPoller,
    config: QuantaStorConfig,
}

impl QuantaStorClient {
    /// Validate `config` and build a client for it.
    ///
    /// # Errors
    /// Any error from [`QuantaStorConfig::validate`], or
    /// [`qstor_domain::QuantaStorError::Config`] when the HTTP client or
    /// base URL cannot be built.
    pub fn new(config: QuantaStorConfig) -> Result<Self> {
        config.validate()?;
        let transport = RestTransport::new(&config)?;
        let poller = TaskPoller::new(transport.clone(), &config)?;

        info!(
            base_url = %transport.base_url(),
            verify_ssl = config.verify_ssl,
            "QuantaStor client configured"
        );
        Ok(Self { transport, poller, config })
    }

    /// Configuration the client was built from.
    pub fn config(&self) -> &QuantaStorConfig {
        &self.config
    }

    /// Volume, host, host group and ACL lookups: server-side "not found"
    /// answers become `None`.
    async fn lookup<T>(
        &self,
        endpoint: &'static str,
        payload: Payload,
        decode: fn(&Value) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.transport.call(endpoint, &payload).await {
            Ok(body) => {
                let found = decode(&body);
                if found.is_none() {
                    debug!(endpoint, %payload, "response carried no object id");
                }
                Ok(found)
            }
            Err(err) if err.is_absence() => {
                debug!(endpoint, %payload, error = %err, "object not found");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Give the appliance time to register the task, then wait for it.
    async fn settle(&self, response: &Value, delay_units: u32) -> Result<String> {
        tokio::time::sleep(self.config.task_delay(delay_units)).await;
        self.poller.wait(response).await
    }

    /// Start a task-producing call and re-fetch the volume it produced.
    async fn volume_task(
        &self,
        endpoint: &'static str,
        payload: Payload,
        delay_units: u32,
    ) -> Result<Option<Volume>> {
        let response = self.transport.call(endpoint, &payload).await?;
        let custom_id = self.settle(&response, delay_units).await?;
        self.storage_volume_get(&custom_id).await
    }

    async fn acl_modify(&self, volume: &str, host: &str, mod_type: u8) -> Result<()> {
        let payload = Payload::new()
            .str("storageVolume", volume)
            .int("modType", mod_type)
            .str("hostList", host)
            .int("flags", 1);
        let response = self.transport.call("storageVolumeAclAddRemove", &payload).await?;
        self.settle(&response, LONG_TASK_DELAY_UNITS).await?;
        Ok(())
    }
}

#[async_trait]
impl QuantaStorApi for QuantaStorClient {
    #[instrument(skip(self))]
    async fn storage_system_get(&self) -> Result<Option<StorageSystem>> {
        let response = self.transport.call("storageSystemGet", &Payload::new().int("flags", 0)).await?;
        Ok(decode_system(&response))
    }

    #[instrument(skip(self))]
    async fn storage_pool_get(&self, pool: Option<&str>) -> Result<Option<Pool>> {
        let payload = Payload::new().opt_str("storagePool", pool);
        let response = self.transport.call("storagePoolGet", &payload).await?;
        Ok(decode_pool(&response))
    }

    #[instrument(skip(self))]
    async fn storage_tier_get(&self, tier: &str) -> Result<Option<Tier>> {
        let payload = Payload::new().str("storageTier", tier);
        let response = self.transport.call("storageTierGet", &payload).await?;
        Ok(decode_tier(&response))
    }

    #[instrument(skip(self))]
    async fn host_get(&self, host: &str) -> Result<Option<Host>> {
        self.lookup("hostGet", Payload::new().str("host", host).int("flags", 0), decode_host).await
    }

    #[instrument(skip(self))]
    async fn host_add(&self, hostname: &str, iqn: &str) -> Result<Option<Host>> {
        let payload = Payload::new()
            .str("hostname", hostname)
            .str("iqn", iqn)
            .int("hostType", HOST_TYPE_LINUX)
            .int("flags", 1);
        let response = self.transport.call("hostAdd", &payload).await?;

        tokio::time::sleep(self.config.task_delay(SHORT_TASK_DELAY_UNITS)).await;
        if task_id(&response).is_some() {
            self.poller.wait(&response).await?;
        }
        self.host_get(hostname).await
    }

    #[instrument(skip(self))]
    async fn host_remove(&self, host: &str) -> Result<Option<Host>> {
        let payload = Payload::new().str("host", host).int("flags", 1);
        let response = self.transport.call("hostRemove", &payload).await?;
        Ok(decode_host(&response))
    }

    #[instrument(skip(self))]
    async fn host_initiator_get(&self, initiator: &str) -> Result<Option<Host>> {
        let payload = Payload::new().str("initiator", initiator);
        let response = self.transport.call("hostInitiatorGet", &payload).await?;
        Ok(decode_host_initiator(&response))
    }

    #[instrument(skip(self))]
    async fn host_initiator_add(&self, host: &str, iqn: &str) -> Result<Option<Host>> {
        let payload = Payload::new().str("host", host).str("iqn", iqn);
        let response = self.transport.call("hostInitiatorAdd", &payload).await?;
        Ok(decode_host(&response))
    }

    #[instrument(skip(self))]
    async fn host_initiator_remove(&self, host: &str, iqn: &str) -> Result<Option<Host>> {
        let payload = Payload::new().str("host", host).str("iqn", iqn);
        let response = self.transport.call("hostInitiatorRemove", &payload).await?;
        Ok(decode_host(&response))
    }

    #[instrument(skip(self))]
    async fn host_group_get(&self, group: &str) -> Result<Option<HostGroup>> {
        self.lookup("hostGroupGet", Payload::new().str("hostGroup", group), decode_host_group)
            .await
    }

    #[instrument(skip(self))]
    async fn host_group_create(&self, name: &str, hosts: &[String]) -> Result<Option<HostGroup>> {
        let payload = Payload::new().str("name", name).list("hostList", hosts).int("flags", 1);
        let response = self.transport.call("hostGroupCreate", &payload).await?;

        if task_id(&response).is_some() {
            self.settle(&response, SHORT_TASK_DELAY_UNITS).await?;
        }
        self.host_group_get(name).await
    }

    #[instrument(skip(self))]
    async fn host_group_delete(&self, name: &str) -> Result<Option<HostGroup>> {
        let payload = Payload::new().str("host", name).int("flags", 1);
        let response = self.transport.call("hostGroupDelete", &payload).await?;
        Ok(decode_host_group(&response))
    }

    #[instrument(skip(self))]
    async fn storage_volume_list(&self) -> Result<Vec<Volume>> {
        let response = self.transport.call("storageVolumeEnum", &Payload::new()).await?;
        Ok(decode_volume_list(&response))
    }

    #[instrument(skip(self))]
    async fn storage_volume_get(&self, volume: &str) -> Result<Option<Volume>> {
        self.lookup("storageVolumeGet", Payload::new().str("storageVolume", volume), decode_volume)
            .await
    }

    #[instrument(skip(self, description))]
    async fn storage_volume_create(
        &self,
        name: &str,
        size: u64,
        description: &str,
        pool: Option<&str>,
    ) -> Result<Option<Volume>> {
        let payload = Payload::new()
            .int("count", 1)
            .str("name", name)
            .str("description", description)
            .int("accessMode", 0)
            .int("flags", 1)
            .flag("thinProvisioned", true)
            .int("size", size)
            .opt_str("provisionableId", pool);
        self.volume_task("storageVolumeCreate", payload, LONG_TASK_DELAY_UNITS).await
    }

    #[instrument(skip(self))]
    async fn storage_volume_clone(
        &self,
        source: &str,
        clone_name: &str,
        pool: Option<&str>,
    ) -> Result<Option<Volume>> {
        let payload = Payload::new()
            .str("storageVolume", source)
            .str("cloneName", clone_name)
            .int("accessMode", 0)
            .int("flags", 0)
            .opt_str("provisionableId", pool);
        self.volume_task("storageVolumeClone", payload, LONG_TASK_DELAY_UNITS).await
    }

    #[instrument(skip(self))]
    async fn storage_volume_snapshot(
        &self,
        volume: &str,
        snapshot_name: &str,
        pool: Option<&str>,
    ) -> Result<Option<Volume>> {
        let payload = Payload::new()
            .str("storageVolume", volume)
            .str("snapshotName", snapshot_name)
            .int("accessMode", 0)
            .int("flags", 0)
            .opt_str("provisionableId", pool);
        self.volume_task("storageVolumeSnapshot", payload, SHORT_TASK_DELAY_UNITS).await
    }

    #[instrument(skip(self))]
    async fn storage_volume_resize(
        &self,
        volume: &str,
        pool: Option<&str>,
        new_size: u64,
    ) -> Result<Option<Volume>> {
        let payload = Payload::new()
            .str("storageVolume", volume)
            .opt_str("provisionableId", pool)
            .int("newSizeInBytes", new_size);
        self.volume_task("storageVolumeResize", payload, LONG_TASK_DELAY_UNITS).await
    }

    #[instrument(skip(self))]
    async fn storage_volume_delete(&self, volume: &str) -> Result<()> {
        let payload = Payload::new().str("storageVolume", volume).int("flags", 3);
        let response = self.transport.call("storageVolumeDeleteEx", &payload).await?;
        self.settle(&response, LONG_TASK_DELAY_UNITS).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn storage_volume_acl_get(&self, volume: &str, host: &str) -> Result<Option<VolumeAcl>> {
        self.lookup(
            "storageVolumeAclGet",
            Payload::new().str("storageVolume", volume).str("host", host),
            decode_acl,
        )
        .await
    }

    #[instrument(skip(self))]
    async fn storage_volume_acl_list(&self, volume: &str) -> Result<Vec<VolumeAcl>> {
        let payload = Payload::new().str("storageVolume", volume);
        let response = self.transport.call("storageVolumeAclEnum", &payload).await?;
        Ok(decode_acl_list(&response, volume))
    }

    #[instrument(skip(self))]
    async fn storage_volume_attach(&self, volume: &str, host: &str) -> Result<Option<VolumeAcl>> {
        self.acl_modify(volume, host, ACL_MOD_ADD).await?;
        self.storage_volume_acl_get(volume, host).await
    }

    #[instrument(skip(self))]
    async fn storage_volume_detach(&self, volume: &str, host: &str) -> Result<()> {
        self.acl_modify(volume, host, ACL_MOD_REMOVE).await
    }
}
