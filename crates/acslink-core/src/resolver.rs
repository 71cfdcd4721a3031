// ── Device resolver ──
//
// MAC → device handle in two strictly sequential phases:
//
// 1. Exact query: ask the ACS for devices whose WAN-connection MAC equals
//    the input as given. Cheap, but only hits when the subscriber record
//    and the CPE agree on spelling.
// 2. Full scan: pull the whole inventory and compare normalized MACs
//    across every field a CPE might report one in, then fall back to the
//    device-id heuristics.
//
// Upstream failures never escape `resolve`; they are logged and the
// lookup reports "not found".

use tracing::{debug, info, warn};

use acslink_api::AcsClient;
use acslink_api::devices::{WAN_IP_MAC_PATH, WAN_PPP_MAC_PATH};

use crate::convert::DEVICE_INFO_SERIAL;
use crate::error::CoreError;
use crate::mac;
use crate::model::DeviceHandle;

/// Fields that may carry the subscriber's MAC, each in both spellings
/// firmwares use.
static MAC_FIELDS: [[&str; 2]; 3] = [
    [
        "InternetGatewayDevice.DeviceInfo.MACAddress",
        "InternetGatewayDevice.DeviceInfo.MacAddress",
    ],
    [
        WAN_IP_MAC_PATH,
        "InternetGatewayDevice.WANDevice.1.WANConnectionDevice.1.WANIPConnection.1.MacAddress",
    ],
    [
        WAN_PPP_MAC_PATH,
        "InternetGatewayDevice.WANDevice.1.WANConnectionDevice.1.WANPPPConnection.1.MacAddress",
    ],
];

/// Normalized values of every candidate field on one device.
fn candidate_values(handle: &DeviceHandle) -> impl Iterator<Item = String> + '_ {
    MAC_FIELDS
        .iter()
        .filter_map(|spellings| handle.parameters.first_text(spellings))
        .chain(handle.serial_number.clone())
        .chain(handle.parameters.text(DEVICE_INFO_SERIAL))
        .filter_map(|v| mac::normalize(&v))
}

/// Direct evidence that `handle` is the device behind `normalized`.
fn is_strong_match(handle: &DeviceHandle, normalized: &str, raw: &str) -> bool {
    candidate_values(handle).any(|v| v == normalized)
        || handle.id.to_ascii_lowercase().contains(normalized)
        || handle.id.contains(raw)
}

/// Resolves subscriber MACs to ACS device handles.
pub struct DeviceResolver<'a> {
    client: &'a AcsClient,
}

impl<'a> DeviceResolver<'a> {
    pub fn new(client: &'a AcsClient) -> Self {
        Self { client }
    }

    /// Find the device behind `raw_mac`. `None` covers invalid input, no
    /// match in either phase, and upstream failure.
    pub async fn resolve(&self, raw_mac: &str) -> Option<DeviceHandle> {
        if !mac::is_valid(raw_mac) {
            debug!(mac = raw_mac, "not a valid MAC, skipping lookup");
            return None;
        }
        let normalized = mac::normalize(raw_mac)?;

        if let Some(handle) = self.exact_query(raw_mac).await {
            info!(mac = raw_mac, device_id = %handle.id, "matched by WAN MAC query");
            return Some(handle);
        }

        let handle = self.full_scan(&normalized, raw_mac).await?;
        info!(
            mac = raw_mac,
            device_id = %handle.id,
            last_inform = ?handle.last_inform,
            "matched by inventory scan"
        );
        Some(handle)
    }

    /// [`resolve`](Self::resolve) with the miss as an error.
    pub async fn try_resolve(&self, raw_mac: &str) -> Result<DeviceHandle, CoreError> {
        self.resolve(raw_mac)
            .await
            .ok_or_else(|| CoreError::DeviceNotFound {
                mac: raw_mac.to_owned(),
            })
    }

    /// Re-read one device by id. Unlike `resolve`, failures propagate.
    pub async fn fetch(&self, device_id: &str) -> Result<Option<DeviceHandle>, CoreError> {
        Ok(self
            .client
            .get_device(device_id)
            .await?
            .map(DeviceHandle::from))
    }

    async fn exact_query(&self, raw_mac: &str) -> Option<DeviceHandle> {
        match self.client.find_by_wan_mac(raw_mac).await {
            Ok(devices) => devices.into_iter().next().map(DeviceHandle::from),
            Err(e) => {
                warn!(mac = raw_mac, error = %e, "WAN MAC query failed, falling back to scan");
                None
            }
        }
    }

    async fn full_scan(&self, normalized: &str, raw_mac: &str) -> Option<DeviceHandle> {
        let inventory = match self.client.list_devices().await {
            Ok(devices) => devices,
            Err(e) => {
                warn!(mac = raw_mac, error = %e, "inventory scan failed");
                return None;
            }
        };
        debug!(mac = raw_mac, devices = inventory.len(), "scanning inventory");

        let handles: Vec<DeviceHandle> = inventory.into_iter().map(DeviceHandle::from).collect();
        select_match(handles, normalized, raw_mac)
    }
}

/// Pick the device for `normalized` out of a full inventory.
///
/// Strong evidence (a matching MAC or serial field, or the MAC embedded in
/// the id) wins in inventory order. Otherwise a device whose id starts
/// with the MAC's OUI is accepted only when no other device shares that
/// prefix, since the prefix names a vendor rather than a unit.
pub fn select_match(
    handles: Vec<DeviceHandle>,
    normalized: &str,
    raw_mac: &str,
) -> Option<DeviceHandle> {
    if let Some(pos) = handles
        .iter()
        .position(|h| is_strong_match(h, normalized, raw_mac))
    {
        return handles.into_iter().nth(pos);
    }

    let oui = normalized.get(..6)?;
    let mut by_prefix = handles
        .into_iter()
        .filter(|h| mac::extract_from_device_id(&h.id).as_deref() == Some(oui));
    let first = by_prefix.next()?;
    if by_prefix.next().is_some() {
        debug!(oui, "device id prefix is ambiguous");
        return None;
    }
    Some(first)
}
