//! JSON envelope normalization and entity decoding
//!
//! QuantaStor answers some calls with the entity itself and others with an
//! `{"obj": {...}}` envelope. [`normalize`] picks the canonical object, and
//! each `decode_*` function turns it into a domain entity. A body without an
//! `id` decodes to `None`.

use qstor_domain::{Host, HostGroup, Pool, StorageSystem, Task, TaskState, Tier, Volume, VolumeAcl};
use serde_json::Value;

/// Unwrap an `obj` envelope when it carries an `id`.
pub fn normalize(value: &Value) -> &Value {
    match value.get("obj") {
        Some(inner) if inner.is_object() && id(inner).is_some() => inner,
        _ => value,
    }
}

/// String field; numeric values are rendered as strings.
fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_or_empty(value: &Value, key: &str) -> String {
    text(value, key).unwrap_or_default()
}

fn id(value: &Value) -> Option<String> {
    text(value, "id").filter(|id| !id.is_empty())
}

/// Byte count sent as a JSON number or a numeric string.
fn bytes(value: &Value, key: &str) -> Option<u64> {
    match value.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_string)
}

/// `storageSystemGet`.
pub fn decode_system(value: &Value) -> Option<StorageSystem> {
    let value = normalize(value);
    Some(StorageSystem { id: id(value)?, name: text_or_empty(value, "name") })
}

/// `storagePoolGet`; capacity fields stay `None` when missing.
pub fn decode_pool(value: &Value) -> Option<Pool> {
    let value = normalize(value);
    Some(Pool {
        id: id(value)?,
        name: text_or_empty(value, "name"),
        free_space: bytes(value, "freeSpace"),
        size: bytes(value, "size"),
    })
}

/// `storageTierGet` only ever answers with an envelope.
pub fn decode_tier(value: &Value) -> Option<Tier> {
    let value = value.get("obj")?;
    Some(Tier { id: id(value)?, name: text_or_empty(value, "name") })
}

/// Each port contributes its IQN, or its WWPN when the IQN is empty.
pub fn decode_host(value: &Value) -> Option<Host> {
    let value = normalize(value);
    let initiators = value
        .get("initiatorPortList")
        .and_then(Value::as_array)
        .map(|ports| {
            ports
                .iter()
                .filter_map(|port| non_empty(port, "iqn").or_else(|| non_empty(port, "wwpn")))
                .collect()
        })
        .unwrap_or_default();

    Some(Host { id: id(value)?, name: text_or_empty(value, "name"), initiators })
}

/// `hostGroupGet`, with each member decoded as a host.
pub fn decode_host_group(value: &Value) -> Option<HostGroup> {
    let value = normalize(value);
    let hosts = value
        .get("hostList")
        .and_then(Value::as_array)
        .map(|hosts| hosts.iter().filter_map(decode_host).collect())
        .unwrap_or_default();

    Some(HostGroup { id: id(value)?, name: text_or_empty(value, "name"), hosts })
}

/// `hostInitiatorGet`: `{"obj": {"hostId", "hostName", "list"}}`.
pub fn decode_host_initiator(value: &Value) -> Option<Host> {
    let value = value.get("obj").unwrap_or(value);
    let host_id = text(value, "hostId").filter(|id| !id.is_empty())?;
    let initiators = value
        .get("list")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default();

    Some(Host { id: host_id, name: text_or_empty(value, "hostName"), initiators })
}

/// `storageVolumeGet`; a missing size decodes as 0.
pub fn decode_volume(value: &Value) -> Option<Volume> {
    let value = normalize(value);
    Some(Volume {
        id: id(value)?,
        name: text_or_empty(value, "name"),
        size: bytes(value, "size").unwrap_or_default(),
        iqn: text_or_empty(value, "iqn"),
    })
}

/// `storageVolumeEnum` answers with a bare array.
pub fn decode_volume_list(value: &Value) -> Vec<Volume> {
    value.as_array().map(|items| items.iter().filter_map(decode_volume).collect()).unwrap_or_default()
}

/// `storageVolumeAclGet`: `{"storageVolumeId", "hostId"}`.
pub fn decode_acl(value: &Value) -> Option<VolumeAcl> {
    let value = normalize(value);
    Some(VolumeAcl {
        volume_id: text(value, "storageVolumeId").filter(|id| !id.is_empty())?,
        host_id: text(value, "hostId").filter(|id| !id.is_empty())?,
    })
}

/// `storageVolumeAclEnum`: an array of grants, or `0` when there are none.
/// Entries are attributed to `volume`, the id the listing was made for.
pub fn decode_acl_list(value: &Value, volume: &str) -> Vec<VolumeAcl> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|acl| text(acl, "hostId"))
        .map(|host_id| VolumeAcl { volume_id: volume.to_string(), host_id })
        .collect()
}

/// Id of the task a mutating call started, if any.
pub fn task_id(value: &Value) -> Option<String> {
    value.get("task").and_then(id)
}

/// `taskGet` response. A missing `taskState` means the task is still pending.
pub fn decode_task(task_id: &str, value: &Value) -> Task {
    Task {
        id: task_id.to_string(),
        state: TaskState::from_code(value.get("taskState").and_then(Value::as_i64)),
        description: text_or_empty(value, "description"),
        custom_id: text(value, "customId").filter(|id| !id.is_empty()),
    }
}
