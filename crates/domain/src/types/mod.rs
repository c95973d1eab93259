//! Domain types and models

pub mod driver;
pub mod storage;
pub mod task;

pub use driver::{Capacity, ConnectionInfo, Connector, IscsiTarget, SnapshotRef, VolumeRef, VolumeStats};
pub use storage::{Host, HostGroup, Pool, StorageSystem, Tier, Volume, VolumeAcl};
pub use task::{Task, TaskState};
