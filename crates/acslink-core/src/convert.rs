// ── ACS-to-domain conversions ──
//
// Bridges raw `acslink_api` device records into `DeviceHandle`s. The
// parameter tree arrives nested, flattened to dotted keys, or a mix of
// both; everything is folded into one dotted-path snapshot.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use acslink_api::AcsDevice;

use crate::model::{DeviceHandle, ParameterSnapshot, ParameterValue};

pub const DEVICE_INFO_PRODUCT_CLASS: &str = "InternetGatewayDevice.DeviceInfo.ProductClass";
pub const DEVICE_INFO_MODEL_NAME: &str = "InternetGatewayDevice.DeviceInfo.ModelName";
pub const DEVICE_INFO_SERIAL: &str = "InternetGatewayDevice.DeviceInfo.SerialNumber";

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an RFC 3339 timestamp, silently dropping unparseable values.
pub(crate) fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

fn leaf(cell: &Map<String, Value>, value: &Value) -> ParameterValue {
    ParameterValue {
        value: value.clone(),
        writable: cell.get("_writable").and_then(Value::as_bool),
        value_type: cell.get("_type").and_then(Value::as_str).map(str::to_owned),
        timestamp: cell.get("_timestamp").map(|t| match t {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }),
    }
}

fn flatten_into(prefix: &str, node: &Value, out: &mut ParameterSnapshot) {
    match node {
        Value::Object(cell) => {
            if let Some(value) = cell.get("_value") {
                out.insert(prefix, leaf(cell, value));
                return;
            }
            for (key, child) in cell {
                // Bookkeeping (`_object`, `_writable` on branches, ...).
                if key.starts_with('_') {
                    continue;
                }
                flatten_into(&join(prefix, key), child, out);
            }
        }
        // Bare scalars show up in pre-flattened projections.
        scalar if !prefix.is_empty() => out.insert(prefix, ParameterValue::new(scalar.clone())),
        _ => {}
    }
}

/// Flatten a parameter tree into dotted-path cells.
pub fn flatten_parameters(tree: &Map<String, Value>) -> ParameterSnapshot {
    let mut out = ParameterSnapshot::new();
    for (key, node) in tree {
        if key.starts_with('_') {
            continue;
        }
        flatten_into(key, node, &mut out);
    }
    out
}

// ── Device ─────────────────────────────────────────────────────────

impl From<AcsDevice> for DeviceHandle {
    fn from(device: AcsDevice) -> Self {
        let parameters = flatten_parameters(&device.parameters);
        let identity = device.identity.unwrap_or_default();

        let model = identity
            .product_class
            .filter(|s| !s.is_empty())
            .or_else(|| parameters.first_text(&[DEVICE_INFO_PRODUCT_CLASS, DEVICE_INFO_MODEL_NAME]));
        let serial_number = identity
            .serial_number
            .filter(|s| !s.is_empty())
            .or_else(|| parameters.text(DEVICE_INFO_SERIAL));

        DeviceHandle {
            id: device.id,
            model,
            serial_number,
            last_inform: parse_datetime(device.last_inform.as_deref()),
            parameters,
        }
    }
}
