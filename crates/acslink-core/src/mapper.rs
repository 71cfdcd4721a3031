// ── Parameter mapper ──
//
// Translates a device's raw parameter snapshot into vendor-neutral Wi-Fi
// state. Registered models read their exact paths; everything else goes
// through the positional heuristic. Missing leaves become sentinels,
// never errors.

use std::collections::BTreeSet;

use tracing::debug;

use crate::mac;
use crate::model::wifi::{NA, NOT_AVAILABLE, UNKNOWN};
use crate::model::{Band, BandConfig, ConnectedStation, DeviceHandle, ParameterSnapshot, WifiConfig};
use crate::registry::{BandPaths, ParameterLayout, StationTemplate, VendorDescriptor};

/// Marker segment of WLAN interface instances.
const WLAN_MARKER: &str = ".WLANConfiguration.";

/// LAN host table; the source of hostnames and last-seen times.
pub const HOSTS_PREFIX: &str = "InternetGatewayDevice.LANDevice.1.Hosts.Host.";

/// Positional band assignment: first discovered WLAN instance, then second.
const POSITIONAL_BANDS: [Band; 2] = [Band::Ghz5, Band::Ghz2_4];

// ── Positional discovery ────────────────────────────────────────────

/// Base paths of every WLAN interface instance in the snapshot
/// (`InternetGatewayDevice.LANDevice.1.WLANConfiguration.1`), ordered by
/// parent path and then by numeric instance index.
pub fn discover_wlan_instances(snapshot: &ParameterSnapshot) -> Vec<String> {
    let found: BTreeSet<(String, u32)> = snapshot
        .paths()
        .filter_map(|path| {
            let at = path.find(WLAN_MARKER)?;
            let parent = &path[..at];
            let rest = &path[at + WLAN_MARKER.len()..];
            let index = rest.split('.').next()?.parse().ok()?;
            Some((parent.to_owned(), index))
        })
        .collect();

    found
        .into_iter()
        .map(|(parent, index)| format!("{parent}{WLAN_MARKER}{index}"))
        .collect()
}

/// Synthesized paths for a positionally discovered instance.
fn positional_paths(base: &str, band: Band) -> BandPaths {
    BandPaths {
        band,
        ssid: format!("{base}.SSID"),
        passphrase: format!("{base}.KeyPassphrase"),
        stations: Some(StationTemplate {
            ip: format!("{base}.AssociatedDevice.{{i}}.AssociatedDeviceIPAddress"),
            mac: format!("{base}.AssociatedDevice.{{i}}.AssociatedDeviceMACAddress"),
            client_mode: None,
        }),
    }
}

/// Per-band paths in effect for this handle, with the band label each
/// station list gets. Instances past the second are kept for station
/// listing but carry no band.
fn effective_paths(
    handle: &DeviceHandle,
    descriptor: Option<&VendorDescriptor>,
) -> Vec<(Option<Band>, BandPaths)> {
    match descriptor.map(|d| &d.layout) {
        Some(ParameterLayout::Fixed { bands }) => {
            bands.iter().map(|b| (Some(b.band), b.clone())).collect()
        }
        Some(ParameterLayout::Positional) | None => {
            let instances = discover_wlan_instances(&handle.parameters);
            debug!(device_id = %handle.id, ?instances, "positional WLAN discovery");
            instances
                .iter()
                .enumerate()
                .map(|(i, base)| {
                    let band = POSITIONAL_BANDS.get(i).copied();
                    (band, positional_paths(base, band.unwrap_or(Band::Ghz2_4)))
                })
                .collect()
        }
    }
}

// ── Wi-Fi config ────────────────────────────────────────────────────

fn read_band(snapshot: &ParameterSnapshot, paths: &BandPaths, positional: bool) -> BandConfig {
    let ssid = snapshot.text(&paths.ssid);
    let passphrase = if positional {
        let base = paths.passphrase.trim_end_matches(".KeyPassphrase");
        snapshot.first_text(&[
            paths.passphrase.clone(),
            format!("{base}.PreSharedKey.1.KeyPassphrase"),
        ])
    } else {
        snapshot.text(&paths.passphrase)
    };

    BandConfig {
        ssid: ssid.unwrap_or_else(|| NOT_AVAILABLE.into()),
        passphrase: passphrase.unwrap_or_else(|| NOT_AVAILABLE.into()),
    }
}

/// SSID and passphrase per band. Both bands are always present.
pub fn map_wifi_config(handle: &DeviceHandle, descriptor: Option<&VendorDescriptor>) -> WifiConfig {
    let positional = descriptor.is_none_or(VendorDescriptor::is_generic);
    let mut config = WifiConfig::unavailable();

    for (band, paths) in effective_paths(handle, descriptor) {
        let Some(band) = band else { continue };
        *config.band_mut(band) = read_band(&handle.parameters, &paths, positional);
    }
    config
}

// ── Connected stations ──────────────────────────────────────────────

/// One row of the LAN host table.
#[derive(Debug, Clone)]
struct HostEntry {
    ip: Option<String>,
    mac: Option<String>,
    hostname: Option<String>,
    last_seen: Option<String>,
}

fn host_table(snapshot: &ParameterSnapshot) -> Vec<HostEntry> {
    snapshot
        .indices_under(HOSTS_PREFIX)
        .into_iter()
        .map(|i| {
            let field = |name: &str| snapshot.text(&format!("{HOSTS_PREFIX}{i}.{name}"));
            HostEntry {
                ip: field("IPAddress"),
                mac: field("MACAddress"),
                hostname: field("HostName"),
                last_seen: field("LastSeen"),
            }
        })
        .collect()
}

fn find_host<'a>(hosts: &'a [HostEntry], station_mac: Option<&str>) -> Option<&'a HostEntry> {
    let wanted = station_mac.and_then(mac::normalize)?;
    hosts
        .iter()
        .find(|h| h.mac.as_deref().and_then(mac::normalize).as_deref() == Some(wanted.as_str()))
}

fn group_indices(snapshot: &ParameterSnapshot, template: &StationTemplate) -> BTreeSet<u32> {
    [Some(&template.ip), Some(&template.mac), template.client_mode.as_ref()]
        .into_iter()
        .flatten()
        .filter_map(|t| StationTemplate::group_prefix(t))
        .flat_map(|prefix| snapshot.indices_under(prefix))
        .collect()
}

fn associated_stations(
    snapshot: &ParameterSnapshot,
    band: Option<Band>,
    template: &StationTemplate,
    hosts: &[HostEntry],
) -> Vec<ConnectedStation> {
    group_indices(snapshot, template)
        .into_iter()
        .map(|i| {
            let read = |t: &str| snapshot.text(&StationTemplate::expand(t, i));
            let ip = read(&template.ip);
            let mac = read(&template.mac);
            let client_mode = template.client_mode.as_deref().and_then(read);
            let host = find_host(hosts, mac.as_deref());

            ConnectedStation {
                ip: ip
                    .or_else(|| host.and_then(|h| h.ip.clone()))
                    .unwrap_or_else(|| NA.into()),
                mac: mac.unwrap_or_else(|| NA.into()),
                hostname: host
                    .and_then(|h| h.hostname.clone())
                    .unwrap_or_else(|| NA.into()),
                last_seen: host
                    .and_then(|h| h.last_seen.clone())
                    .unwrap_or_else(|| UNKNOWN.into()),
                band: band.map_or_else(|| NA.into(), |b| b.to_string()),
                client_mode: client_mode.unwrap_or_else(|| NA.into()),
            }
        })
        .collect()
}

fn host_stations(hosts: Vec<HostEntry>) -> Vec<ConnectedStation> {
    hosts
        .into_iter()
        .map(|h| ConnectedStation {
            ip: h.ip.unwrap_or_else(|| NA.into()),
            mac: h.mac.unwrap_or_else(|| NA.into()),
            hostname: h.hostname.unwrap_or_else(|| NA.into()),
            last_seen: h.last_seen.unwrap_or_else(|| UNKNOWN.into()),
            ..ConnectedStation::default()
        })
        .collect()
}

/// Stations associated with any radio, enriched from the LAN host table.
///
/// A CPE that reports no associated devices at all gets its host table
/// listed instead.
pub fn map_connected_stations(
    handle: &DeviceHandle,
    descriptor: Option<&VendorDescriptor>,
) -> Vec<ConnectedStation> {
    let snapshot = &handle.parameters;
    let hosts = host_table(snapshot);

    let stations: Vec<ConnectedStation> = effective_paths(handle, descriptor)
        .iter()
        .filter_map(|(band, paths)| Some((*band, paths.stations.as_ref()?)))
        .flat_map(|(band, template)| associated_stations(snapshot, band, template, &hosts))
        .collect();

    if stations.is_empty() {
        debug!(device_id = %handle.id, hosts = hosts.len(), "no associated devices, using host table");
        return host_stations(hosts);
    }
    stations
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::ParameterValue;

    const W: &str = "InternetGatewayDevice.LANDevice.1.WLANConfiguration";

    fn handle(params: &[(String, &str)]) -> DeviceHandle {
        DeviceHandle {
            id: "dev-1".into(),
            model: None,
            serial_number: None,
            last_inform: None,
            parameters: params
                .iter()
                .map(|(k, v)| (k.clone(), ParameterValue::new(*v)))
                .collect(),
        }
    }

    #[test]
    fn registered_model_reads_exact_paths() {
        let h = handle(&[
            (format!("{W}.1.SSID"), "Home5G"),
            (format!("{W}.1.KeyPassphrase"), "secret-5"),
            (format!("{W}.6.SSID"), "Home2G"),
            // Would win under the positional heuristic.
            (format!("{W}.2.SSID"), "Decoy"),
        ]);
        let d = VendorDescriptor::intelbras_1200r();

        let cfg = map_wifi_config(&h, Some(&d));

        assert_eq!(cfg.ghz5.ssid, "Home5G");
        assert_eq!(cfg.ghz5.passphrase, "secret-5");
        assert_eq!(cfg.ghz2_4.ssid, "Home2G");
        assert_eq!(cfg.ghz2_4.passphrase, NOT_AVAILABLE);
    }

    #[test]
    fn positional_heuristic_orders_by_numeric_index() {
        let h = handle(&[
            (format!("{W}.10.SSID"), "Third"),
            (format!("{W}.2.SSID"), "Second"),
            (format!("{W}.2.PreSharedKey.1.KeyPassphrase"), "psk-2"),
            (format!("{W}.1.SSID"), "First"),
            (format!("{W}.1.KeyPassphrase"), "kp-1"),
        ]);

        let cfg = map_wifi_config(&h, None);

        assert_eq!(cfg.ghz5.ssid, "First");
        assert_eq!(cfg.ghz5.passphrase, "kp-1");
        assert_eq!(cfg.ghz2_4.ssid, "Second");
        assert_eq!(cfg.ghz2_4.passphrase, "psk-2");
    }

    #[test]
    fn generic_descriptor_behaves_like_no_descriptor() {
        let h = handle(&[(format!("{W}.3.SSID"), "Only")]);
        let generic = VendorDescriptor::generic();
        assert_eq!(map_wifi_config(&h, Some(&generic)), map_wifi_config(&h, None));
        assert_eq!(map_wifi_config(&h, None).ghz5.ssid, "Only");
        assert_eq!(map_wifi_config(&h, None).ghz2_4, BandConfig::unavailable());
    }

    #[test]
    fn empty_snapshot_is_fully_sentineled() {
        let h = handle(&[]);
        assert!(map_wifi_config(&h, None).is_unavailable());
        assert!(map_wifi_config(&h, Some(&VendorDescriptor::intelbras_1200r())).is_unavailable());
        assert!(map_connected_stations(&h, None).is_empty());
    }

    #[test]
    fn empty_ssid_reads_as_unavailable() {
        let h = handle(&[(format!("{W}.1.SSID"), "")]);
        let cfg = map_wifi_config(&h, Some(&VendorDescriptor::intelbras_1200r()));
        assert_eq!(cfg.ghz5.ssid, NOT_AVAILABLE);
    }

    #[test]
    fn stations_expand_template_and_enrich_from_hosts() {
        let h = handle(&[
            (format!("{W}.1.AssociatedDevice.1.AssociatedDeviceIPAddress"), "192.168.0.10"),
            (format!("{W}.1.AssociatedDevice.1.AssociatedDeviceMACAddress"), "AA:BB:CC:00:00:01"),
            (format!("{W}.1.AssociatedDevice.1.X_ITBS_WLAN_ClientMode"), "11ac"),
            (format!("{W}.6.AssociatedDevice.2.AssociatedDeviceMACAddress"), "aa:bb:cc:00:00:02"),
            (format!("{HOSTS_PREFIX}1.MACAddress"), "aa-bb-cc-00-00-01"),
            (format!("{HOSTS_PREFIX}1.HostName"), "laptop"),
            (format!("{HOSTS_PREFIX}1.LastSeen"), "2024-05-01T10:00:00Z"),
        ]);

        let stations = map_connected_stations(&h, Some(&VendorDescriptor::intelbras_1200r()));

        assert_eq!(
            stations,
            vec![
                ConnectedStation {
                    ip: "192.168.0.10".into(),
                    mac: "AA:BB:CC:00:00:01".into(),
                    hostname: "laptop".into(),
                    last_seen: "2024-05-01T10:00:00Z".into(),
                    band: "5GHz".into(),
                    client_mode: "11ac".into(),
                },
                ConnectedStation {
                    ip: NA.into(),
                    mac: "aa:bb:cc:00:00:02".into(),
                    hostname: NA.into(),
                    last_seen: UNKNOWN.into(),
                    band: "2.4GHz".into(),
                    client_mode: NA.into(),
                },
            ]
        );
    }

    #[test]
    fn host_table_is_used_when_nothing_is_associated() {
        let h = handle(&[
            (format!("{W}.1.SSID"), "Home"),
            (format!("{HOSTS_PREFIX}1.IPAddress"), "192.168.0.20"),
            (format!("{HOSTS_PREFIX}1.MACAddress"), "11:22:33:44:55:66"),
            (format!("{HOSTS_PREFIX}2.HostName"), "printer"),
        ]);

        let stations = map_connected_stations(&h, None);

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].ip, "192.168.0.20");
        assert_eq!(stations[0].hostname, NA);
        assert_eq!(stations[0].last_seen, UNKNOWN);
        assert_eq!(stations[1].hostname, "printer");
        assert_eq!(stations[1].mac, NA);
        assert_eq!(stations[1].band, NA);
    }

    #[test]
    fn discovery_ignores_non_numeric_instances() {
        let h = handle(&[
            (format!("{W}.1.SSID"), "a"),
            (format!("{W}.1.BeaconType"), "WPA"),
            (format!("{W}Number"), "x"),
            ("InternetGatewayDevice.LANDevice.1.WLANConfigurationNumberOfEntries".to_owned(), "2"),
        ]);
        assert_eq!(discover_wlan_instances(&h.parameters), vec![format!("{W}.1")]);
    }
}
