// Device inventory endpoints
//
// `GET /devices` for the full inventory and `GET /devices/?query=` for
// filtered lookups. The query language is a JSON filter compared against
// the stored representation, so values are passed through untouched.

use serde_json::{Value, json};
use tracing::debug;

use crate::client::AcsClient;
use crate::error::Error;
use crate::models::AcsDevice;

/// MAC of the first IP-routed WAN connection.
pub const WAN_IP_MAC_PATH: &str =
    "InternetGatewayDevice.WANDevice.1.WANConnectionDevice.1.WANIPConnection.1.MACAddress";

/// MAC of the first PPP WAN connection.
pub const WAN_PPP_MAC_PATH: &str =
    "InternetGatewayDevice.WANDevice.1.WANConnectionDevice.1.WANPPPConnection.1.MACAddress";

/// Filter matching devices whose WAN-connection MAC equals `raw_mac` exactly.
pub fn wan_mac_filter(raw_mac: &str) -> Value {
    json!({
        "$or": [
            { WAN_IP_MAC_PATH: raw_mac },
            { WAN_PPP_MAC_PATH: raw_mac },
        ]
    })
}

/// Filter matching one device by its ACS id.
pub fn id_filter(device_id: &str) -> Value {
    json!({ "_id": device_id })
}

impl AcsClient {
    /// List the whole device inventory, in ACS listing order.
    ///
    /// `GET /devices`
    pub async fn list_devices(&self) -> Result<Vec<AcsDevice>, Error> {
        let url = self.url(&["devices"])?;
        debug!("listing devices");
        self.get_json(url).await
    }

    /// List devices matching a JSON filter.
    ///
    /// `GET /devices/?query=<filter>`
    pub async fn query_devices(&self, filter: &Value) -> Result<Vec<AcsDevice>, Error> {
        let mut url = self.url(&["devices", ""])?;
        url.query_pairs_mut()
            .append_pair("query", &filter.to_string());
        debug!(%filter, "querying devices");
        self.get_json(url).await
    }

    /// Devices whose WAN-connection MAC equals `raw_mac` as stored.
    pub async fn find_by_wan_mac(&self, raw_mac: &str) -> Result<Vec<AcsDevice>, Error> {
        self.query_devices(&wan_mac_filter(raw_mac)).await
    }

    /// Fetch one device by id. Returns `None` if the ACS no longer lists it.
    pub async fn get_device(&self, device_id: &str) -> Result<Option<AcsDevice>, Error> {
        let devices = self.query_devices(&id_filter(device_id)).await?;
        Ok(devices.into_iter().next())
    }

    /// Number of devices in the inventory. Doubles as a connectivity check.
    pub async fn count_devices(&self) -> Result<usize, Error> {
        Ok(self.list_devices().await?.len())
    }
}
