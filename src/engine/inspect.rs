// Extract what we need from `<engine> inspect` JSON

use crate::errors::{NctError, Result};
use serde_json::Value;

/// Pull the IP address out of `inspect` output for `container_id`.
///
/// Both podman and docker print a JSON array with one object per
/// container. Rootless podman leaves `NetworkSettings.IPAddress` empty and
/// reports addresses per network instead, so those are the fallback.
pub fn parse_ip_address(json: &str, container_id: &str) -> Result<String> {
    let value: Value = serde_json::from_str(json).map_err(|e| {
        NctError::Lookup(format!("Unreadable inspect output for {}: {}", container_id, e))
    })?;

    let container = match &value {
        Value::Array(items) => items.first(),
        Value::Object(_) => Some(&value),
        _ => None,
    }
    .ok_or_else(|| NctError::Lookup(format!("No such container: {}", container_id)))?;

    let running = container
        .pointer("/State/Running")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !running {
        return Err(NctError::Lookup(format!(
            "Container {} is not running",
            container_id
        )));
    }

    let primary = container
        .pointer("/NetworkSettings/IPAddress")
        .and_then(Value::as_str)
        .filter(|ip| !ip.is_empty());

    let per_network = || {
        container
            .pointer("/NetworkSettings/Networks")
            .and_then(Value::as_object)
            .and_then(|networks| {
                networks
                    .values()
                    .filter_map(|net| net.get("IPAddress").and_then(Value::as_str))
                    .find(|ip| !ip.is_empty())
            })
    };

    primary
        .or_else(per_network)
        .map(str::to_string)
        .ok_or_else(|| {
            NctError::Lookup(format!("Container {} has no IP address", container_id))
        })
}
