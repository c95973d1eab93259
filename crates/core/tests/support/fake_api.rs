//! In-memory `QuantaStorApi` used by driver tests
//!
//! Keeps volumes, hosts and ACLs in maps and records every call so tests can
//! assert on the exact sequence of appliance operations a driver method
//! issued.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use qstor_core::QuantaStorApi;
use qstor_domain::{
    Host, HostGroup, Pool, QuantaStorError, Result as DomainResult, StorageSystem, Tier, Volume,
    VolumeAcl,
};

/// One recorded appliance call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SystemGet,
    PoolGet(Option<String>),
    HostGet(String),
    HostAdd { name: String, iqn: String },
    VolumeGet(String),
    VolumeCreate { name: String, size: u64, pool: Option<String> },
    VolumeClone { source: String, clone: String },
    VolumeSnapshot { volume: String, snapshot: String },
    VolumeResize { volume: String, size: u64 },
    VolumeDelete(String),
    AclList(String),
    Attach { volume: String, host: String },
    Detach { volume: String, host: String },
    Other(&'static str),
}

#[derive(Default)]
struct State {
    system: Option<StorageSystem>,
    pool: Option<Pool>,
    volumes: BTreeMap<String, Volume>,
    hosts: BTreeMap<String, Host>,
    acls: Vec<VolumeAcl>,
    calls: Vec<Call>,
    next_id: u32,
    refuse_host_add: bool,
    refuse_attach: bool,
    keep_deleted: bool,
    resize_reports: Option<u64>,
    fail_next: Option<QuantaStorError>,
}

impl State {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn insert_volume(&mut self, name: &str, size: u64) -> Volume {
        let id = self.id("vol");
        let volume = Volume {
            name: name.to_string(),
            id,
            size,
            iqn: format!("iqn.2009-10.com.osnexus:{name}"),
        };
        self.volumes.insert(name.to_string(), volume.clone());
        volume
    }

    fn volume(&self, key: &str) -> Option<Volume> {
        self.volumes.get(key).cloned().or_else(|| self.volumes.values().find(|v| v.id == key).cloned())
    }

    fn check(&mut self) -> DomainResult<()> {
        self.fail_next.take().map_or(Ok(()), Err)
    }
}

/// Fake appliance seeded through builder methods
#[derive(Default)]
pub struct FakeQuantaStor {
    state: Mutex<State>,
}

impl FakeQuantaStor {
    pub fn new() -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.lock();
            state.system = Some(StorageSystem { name: "qs-node-1".into(), id: "sys-1".into() });
            state.pool = Some(Pool {
                name: "pool-a".into(),
                id: "pool-1".into(),
                free_space: Some(5 * 1024 * 1024 * 1024),
                size: Some(20 * 1024 * 1024 * 1024),
            });
        }
        fake
    }

    pub fn with_volume(self, name: &str, size_bytes: u64) -> Self {
        self.state.lock().insert_volume(name, size_bytes);
        self
    }

    pub fn with_host(self, name: &str, initiator: &str) -> Self {
        {
            let mut state = self.state.lock();
            let id = state.id("host");
            state.hosts.insert(
                name.to_string(),
                Host { name: name.into(), id, initiators: vec![initiator.into()] },
            );
        }
        self
    }

    pub fn with_acl(self, volume: &str, host_id: &str) -> Self {
        {
            let mut state = self.state.lock();
            let volume_id = state.volume(volume).map(|v| v.id).unwrap_or_default();
            state.acls.push(VolumeAcl { volume_id, host_id: host_id.into() });
        }
        self
    }

    pub fn without_system(self) -> Self {
        self.state.lock().system = None;
        self
    }

    pub fn with_pool(self, pool: Option<Pool>) -> Self {
        self.state.lock().pool = pool;
        self
    }

    pub fn refusing_host_add(self) -> Self {
        self.state.lock().refuse_host_add = true;
        self
    }

    pub fn refusing_attach(self) -> Self {
        self.state.lock().refuse_attach = true;
        self
    }

    /// Deletion tasks complete but the volume keeps resolving.
    pub fn keeping_deleted(self) -> Self {
        self.state.lock().keep_deleted = true;
        self
    }

    /// Resize reports this size instead of the requested one.
    pub fn resize_reporting(self, size: u64) -> Self {
        self.state.lock().resize_reports = Some(size);
        self
    }

    /// The next call fails with `error`.
    pub fn fail_next(&self, error: QuantaStorError) {
        self.state.lock().fail_next = Some(error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn volume(&self, name: &str) -> Option<Volume> {
        self.state.lock().volume(name)
    }

    pub fn acls(&self) -> Vec<VolumeAcl> {
        self.state.lock().acls.clone()
    }

    fn record(&self, call: Call) -> parking_lot::MutexGuard<'_, State> {
        let mut state = self.state.lock();
        state.calls.push(call);
        state
    }
}

#[async_trait]
impl QuantaStorApi for FakeQuantaStor {
    async fn storage_system_get(&self) -> DomainResult<Option<StorageSystem>> {
        let mut state = self.record(Call::SystemGet);
        state.check()?;
        Ok(state.system.clone())
    }

    async fn storage_pool_get(&self, pool: Option<&str>) -> DomainResult<Option<Pool>> {
        let mut state = self.record(Call::PoolGet(pool.map(str::to_string)));
        state.check()?;
        Ok(state.pool.clone())
    }

    async fn storage_tier_get(&self, _tier: &str) -> DomainResult<Option<Tier>> {
        self.record(Call::Other("storage_tier_get")).check()?;
        Ok(None)
    }

    async fn host_get(&self, host: &str) -> DomainResult<Option<Host>> {
        let mut state = self.record(Call::HostGet(host.into()));
        state.check()?;
        Ok(state
            .hosts
            .values()
            .find(|h| h.name == host || h.id == host || h.initiators.iter().any(|i| i == host))
            .cloned())
    }

    async fn host_add(&self, hostname: &str, iqn: &str) -> DomainResult<Option<Host>> {
        let mut state = self.record(Call::HostAdd { name: hostname.into(), iqn: iqn.into() });
        state.check()?;
        if state.refuse_host_add {
            return Ok(None);
        }
        let id = state.id("host");
        let host = Host { name: hostname.into(), id, initiators: vec![iqn.into()] };
        state.hosts.insert(hostname.into(), host.clone());
        Ok(Some(host))
    }

    async fn host_remove(&self, host: &str) -> DomainResult<Option<Host>> {
        let mut state = self.record(Call::Other("host_remove"));
        state.check()?;
        Ok(state.hosts.remove(host))
    }

    async fn host_initiator_get(&self, initiator: &str) -> DomainResult<Option<Host>> {
        let mut state = self.record(Call::Other("host_initiator_get"));
        state.check()?;
        Ok(state.hosts.values().find(|h| h.initiators.iter().any(|i| i == initiator)).cloned())
    }

    async fn host_initiator_add(&self, _host: &str, _iqn: &str) -> DomainResult<Option<Host>> {
        self.record(Call::Other("host_initiator_add")).check()?;
        Ok(None)
    }

    async fn host_initiator_remove(&self, _host: &str, _iqn: &str) -> DomainResult<Option<Host>> {
        self.record(Call::Other("host_initiator_remove")).check()?;
        Ok(None)
    }

    async fn host_group_get(&self, _group: &str) -> DomainResult<Option<HostGroup>> {
        self.record(Call::Other("host_group_get")).check()?;
        Ok(None)
    }

    async fn host_group_create(
        &self,
        _name: &str,
        _hosts: &[String],
    ) -> DomainResult<Option<HostGroup>> {
        self.record(Call::Other("host_group_create")).check()?;
        Ok(None)
    }

    async fn host_group_delete(&self, _name: &str) -> DomainResult<Option<HostGroup>> {
        self.record(Call::Other("host_group_delete")).check()?;
        Ok(None)
    }

    async fn storage_volume_list(&self) -> DomainResult<Vec<Volume>> {
        let mut state = self.record(Call::Other("storage_volume_list"));
        state.check()?;
        Ok(state.volumes.values().cloned().collect())
    }

    async fn storage_volume_get(&self, volume: &str) -> DomainResult<Option<Volume>> {
        let mut state = self.record(Call::VolumeGet(volume.into()));
        state.check()?;
        Ok(state.volume(volume))
    }

    async fn storage_volume_create(
        &self,
        name: &str,
        size: u64,
        _description: &str,
        pool: Option<&str>,
    ) -> DomainResult<Option<Volume>> {
        let mut state = self.record(Call::VolumeCreate {
            name: name.into(),
            size,
            pool: pool.map(str::to_string),
        });
        state.check()?;
        Ok(Some(state.insert_volume(name, size)))
    }

    async fn storage_volume_clone(
        &self,
        source: &str,
        clone_name: &str,
        _pool: Option<&str>,
    ) -> DomainResult<Option<Volume>> {
        let mut state =
            self.record(Call::VolumeClone { source: source.into(), clone: clone_name.into() });
        state.check()?;
        let Some(size) = state.volume(source).map(|v| v.size) else {
            return Ok(None);
        };
        Ok(Some(state.insert_volume(clone_name, size)))
    }

    async fn storage_volume_snapshot(
        &self,
        volume: &str,
        snapshot_name: &str,
        _pool: Option<&str>,
    ) -> DomainResult<Option<Volume>> {
        let mut state = self.record(Call::VolumeSnapshot {
            volume: volume.into(),
            snapshot: snapshot_name.into(),
        });
        state.check()?;
        let Some(size) = state.volume(volume).map(|v| v.size) else {
            return Ok(None);
        };
        Ok(Some(state.insert_volume(snapshot_name, size)))
    }

    async fn storage_volume_resize(
        &self,
        volume: &str,
        _pool: Option<&str>,
        new_size: u64,
    ) -> DomainResult<Option<Volume>> {
        let mut state = self.record(Call::VolumeResize { volume: volume.into(), size: new_size });
        state.check()?;
        let reported = state.resize_reports.unwrap_or(new_size);
        Ok(state.volumes.get_mut(volume).map(|v| {
            v.size = reported;
            v.clone()
        }))
    }

    async fn storage_volume_delete(&self, volume: &str) -> DomainResult<()> {
        let mut state = self.record(Call::VolumeDelete(volume.into()));
        state.check()?;
        if !state.keep_deleted {
            state.volumes.remove(volume);
        }
        Ok(())
    }

    async fn storage_volume_acl_get(
        &self,
        volume: &str,
        host: &str,
    ) -> DomainResult<Option<VolumeAcl>> {
        let mut state = self.record(Call::Other("storage_volume_acl_get"));
        state.check()?;
        Ok(state.acls.iter().find(|a| a.volume_id == volume && a.host_id == host).cloned())
    }

    async fn storage_volume_acl_list(&self, volume: &str) -> DomainResult<Vec<VolumeAcl>> {
        let mut state = self.record(Call::AclList(volume.into()));
        state.check()?;
        Ok(state.acls.iter().filter(|a| a.volume_id == volume).cloned().collect())
    }

    async fn storage_volume_attach(
        &self,
        volume: &str,
        host: &str,
    ) -> DomainResult<Option<VolumeAcl>> {
        let mut state = self.record(Call::Attach { volume: volume.into(), host: host.into() });
        state.check()?;
        if state.refuse_attach {
            return Ok(None);
        }
        let Some(volume_id) = state.volume(volume).map(|v| v.id) else {
            return Ok(None);
        };
        let acl = VolumeAcl { volume_id, host_id: host.into() };
        state.acls.push(acl.clone());
        Ok(Some(acl))
    }

    async fn storage_volume_detach(&self, volume: &str, host: &str) -> DomainResult<()> {
        let mut state = self.record(Call::Detach { volume: volume.into(), host: host.into() });
        state.check()?;
        state.acls.retain(|a| !(a.volume_id == volume && a.host_id == host));
        Ok(())
    }
}
