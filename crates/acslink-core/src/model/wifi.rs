// ── Wi-Fi domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// SSID or passphrase that could not be read.
pub const NOT_AVAILABLE: &str = "Not Available";
/// Station field (IP, MAC, hostname, band, client mode) that could not be read.
pub const NA: &str = "N/A";
/// Station last-seen time that could not be read.
pub const UNKNOWN: &str = "Desconhecido";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumString,
)]
pub enum Band {
    #[serde(rename = "2.4GHz")]
    #[strum(to_string = "2.4GHz", serialize = "2.4", serialize = "2g")]
    Ghz2_4,
    #[serde(rename = "5GHz")]
    #[strum(to_string = "5GHz", serialize = "5", serialize = "5g")]
    Ghz5,
}

/// SSID and passphrase of one radio, each a real value or [`NOT_AVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandConfig {
    pub ssid: String,
    pub passphrase: String,
}

impl BandConfig {
    pub fn unavailable() -> Self {
        Self {
            ssid: NOT_AVAILABLE.into(),
            passphrase: NOT_AVAILABLE.into(),
        }
    }
}

/// Both radios, always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiConfig {
    #[serde(rename = "5GHz")]
    pub ghz5: BandConfig,
    #[serde(rename = "2.4GHz")]
    pub ghz2_4: BandConfig,
}

impl WifiConfig {
    /// The config reported for a device that could not be read at all.
    pub fn unavailable() -> Self {
        Self {
            ghz5: BandConfig::unavailable(),
            ghz2_4: BandConfig::unavailable(),
        }
    }

    pub fn band(&self, band: Band) -> &BandConfig {
        match band {
            Band::Ghz5 => &self.ghz5,
            Band::Ghz2_4 => &self.ghz2_4,
        }
    }

    pub fn band_mut(&mut self, band: Band) -> &mut BandConfig {
        match band {
            Band::Ghz5 => &mut self.ghz5,
            Band::Ghz2_4 => &mut self.ghz2_4,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        *self == Self::unavailable()
    }
}

/// One client associated with (or known to) the CPE.
///
/// Every field is populated; unknown values carry [`NA`] or [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedStation {
    pub ip: String,
    pub mac: String,
    pub hostname: String,
    pub last_seen: String,
    pub band: String,
    pub client_mode: String,
}

impl Default for ConnectedStation {
    fn default() -> Self {
        Self {
            ip: NA.into(),
            mac: NA.into(),
            hostname: NA.into(),
            last_seen: UNKNOWN.into(),
            band: NA.into(),
            client_mode: NA.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn wifi_config_serializes_band_keys() {
        let mut cfg = WifiConfig::unavailable();
        cfg.band_mut(Band::Ghz5).ssid = "Home5G".into();
        assert_eq!(
            serde_json::to_value(&cfg).unwrap(),
            json!({
                "5GHz": { "ssid": "Home5G", "passphrase": "Not Available" },
                "2.4GHz": { "ssid": "Not Available", "passphrase": "Not Available" }
            })
        );
    }

    #[test]
    fn band_display_and_parse() {
        assert_eq!(Band::Ghz2_4.to_string(), "2.4GHz");
        assert_eq!(Band::Ghz5.to_string(), "5GHz");
        assert_eq!("5g".parse::<Band>().unwrap(), Band::Ghz5);
        assert_eq!("2.4".parse::<Band>().unwrap(), Band::Ghz2_4);
    }

    #[test]
    fn default_station_is_fully_sentineled() {
        let station = ConnectedStation::default();
        assert_eq!(station.ip, NA);
        assert_eq!(station.hostname, NA);
        assert_eq!(station.last_seen, UNKNOWN);
    }
}
