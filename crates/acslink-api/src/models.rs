// ACS request/response types
//
// The device record is mostly an open parameter tree, so only the
// underscore-prefixed bookkeeping fields are modelled explicitly; the
// tree itself lands in `parameters`. Fields use `#[serde(default)]`
// liberally because CPE firmwares report wildly different subsets.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Device ───────────────────────────────────────────────────────────

/// One device record from `GET /devices`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcsDevice {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, rename = "_deviceId")]
    pub identity: Option<DeviceIdentity>,
    /// RFC 3339 timestamp of the last Inform session.
    #[serde(default, rename = "_lastInform")]
    pub last_inform: Option<String>,
    #[serde(default, rename = "_tags")]
    pub tags: Vec<String>,
    /// The parameter tree, nested or already flattened to dotted keys.
    #[serde(flatten)]
    pub parameters: serde_json::Map<String, Value>,
}

/// The `_deviceId` block the CPE reports in its Inform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceIdentity {
    #[serde(default, rename = "_Manufacturer")]
    pub manufacturer: Option<String>,
    #[serde(default, rename = "_OUI")]
    pub oui: Option<String>,
    #[serde(default, rename = "_ProductClass")]
    pub product_class: Option<String>,
    #[serde(default, rename = "_SerialNumber")]
    pub serial_number: Option<String>,
}

// ── Tasks ────────────────────────────────────────────────────────────

/// A task posted to `POST /devices/{id}/tasks`.
///
/// Serializes as `{"name": "setParameterValues", "parameterValues": [[path, value], ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum Task {
    #[serde(rename_all = "camelCase")]
    SetParameterValues {
        parameter_values: Vec<(String, Value)>,
    },
}

impl Task {
    /// Single-pair `setParameterValues` task.
    pub fn set_parameter(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::SetParameterValues {
            parameter_values: vec![(path.into(), value.into())],
        }
    }

    /// The wire name of the task.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetParameterValues { .. } => "setParameterValues",
        }
    }
}

/// Synchronous acknowledgement of a submitted task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskReceipt {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub device: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    /// `true` when the ACS answered 202: the task is stored but the CPE
    /// has not run it yet.
    #[serde(skip_deserializing)]
    pub queued: bool,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}
