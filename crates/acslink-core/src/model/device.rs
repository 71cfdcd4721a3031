// ── Device handle and parameter snapshot ──

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// One leaf of the parameter tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterValue {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,
    /// xsd type as reported by the ACS (`xsd:string`, `xsd:unsignedInt`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ParameterValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            writable: None,
            value_type: None,
            timestamp: None,
        }
    }

    /// Display text of the value. Empty strings, nulls, and nested
    /// structures read as absent.
    pub fn as_text(&self) -> Option<String> {
        match &self.value {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

/// Dotted parameter path → value cell.
///
/// Ordered by path so index discovery and iteration are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterSnapshot(BTreeMap<String, ParameterValue>);

impl ParameterSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, value: ParameterValue) {
        self.0.insert(path.into(), value);
    }

    pub fn get(&self, path: &str) -> Option<&ParameterValue> {
        self.0.get(path)
    }

    /// Display text at `path`, if present and non-empty.
    pub fn text(&self, path: &str) -> Option<String> {
        self.get(path).and_then(ParameterValue::as_text)
    }

    /// First non-empty value among alternative spellings of one field.
    pub fn first_text<S: AsRef<str>>(&self, paths: &[S]) -> Option<String> {
        paths.iter().find_map(|p| self.text(p.as_ref()))
    }

    /// All paths, in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Distinct numeric instance indices directly below `prefix`,
    /// ascending. `prefix` must end with a dot
    /// (`"…Hosts.Host."` → `[1, 2, 5]`).
    pub fn indices_under(&self, prefix: &str) -> Vec<u32> {
        let found: BTreeSet<u32> = self
            .0
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .map(|(path, _)| path)
            .take_while(|path| path.starts_with(prefix))
            .filter_map(|path| path[prefix.len()..].split('.').next()?.parse().ok())
            .collect();
        found.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ParameterValue)> for ParameterSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, ParameterValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One managed CPE as resolved from the ACS inventory.
///
/// Built fresh for every resolution and owned by the call that resolved
/// it; nothing caches handles across requests.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceHandle {
    /// ACS-assigned identifier, opaque.
    pub id: String,
    /// Product class / model name the device reports, if any.
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub last_inform: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub parameters: ParameterSnapshot,
}
