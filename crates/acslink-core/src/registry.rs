// ── Vendor model registry ──
//
// Model key → plain descriptor of where that model keeps its Wi-Fi
// parameters. Unregistered models share one generic descriptor whose
// reads go through the positional heuristic in `mapper`. The registry is
// filled at start-up and read-only afterwards.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::model::Band;

/// Placeholder for the instance index in repeating-group templates.
pub const INDEX_PLACEHOLDER: &str = "{i}";

/// SSID write path used when nothing better is known.
pub const GENERIC_SSID_PATH: &str = "InternetGatewayDevice.LANDevice.1.WLANConfiguration.1.SSID";
/// Passphrase write path used when nothing better is known.
pub const GENERIC_PASSPHRASE_PATH: &str =
    "InternetGatewayDevice.LANDevice.1.WLANConfiguration.1.PreSharedKey.1.KeyPassphrase";

// ── Descriptor ──────────────────────────────────────────────────────

/// Associated-station repeating group. Every path contains `{i}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationTemplate {
    pub ip: String,
    pub mac: String,
    /// Vendor extension reporting the client's PHY mode, if the model has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_mode: Option<String>,
}

impl StationTemplate {
    /// Concrete path of `template` for instance `index`.
    pub fn expand(template: &str, index: u32) -> String {
        template.replace(INDEX_PLACEHOLDER, &index.to_string())
    }

    /// Everything before `{i}`, i.e. the prefix instance indices hang off.
    pub fn group_prefix(template: &str) -> Option<&str> {
        template
            .find(INDEX_PLACEHOLDER)
            .map(|at| &template[..at])
    }

    fn paths(&self) -> impl Iterator<Item = &str> {
        [Some(self.ip.as_str()), Some(self.mac.as_str()), self.client_mode.as_deref()]
            .into_iter()
            .flatten()
    }
}

/// Parameter paths for one radio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandPaths {
    pub band: Band,
    pub ssid: String,
    pub passphrase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stations: Option<StationTemplate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterLayout {
    /// Explicit per-band paths.
    Fixed { bands: Vec<BandPaths> },
    /// Discover WLAN instances from the snapshot: the first is 5 GHz,
    /// the second 2.4 GHz.
    Positional,
}

/// What the mapper and task issuer need to know about one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorDescriptor {
    pub model_key: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware_version: Option<String>,
    pub layout: ParameterLayout,
    /// Band whose SSID/passphrase the write operations change.
    pub primary_band: Band,
}

impl VendorDescriptor {
    /// The fallback for models nobody registered.
    pub fn generic() -> Self {
        Self {
            model_key: "*".into(),
            display_name: "Generic TR-098 CPE".into(),
            hardware_version: None,
            layout: ParameterLayout::Positional,
            primary_band: Band::Ghz5,
        }
    }

    /// Intelbras 1200R: 5 GHz on instance 1, 2.4 GHz on instance 6.
    pub fn intelbras_1200r() -> Self {
        let wlan = |instance: u32, band: Band| {
            let base = format!("InternetGatewayDevice.LANDevice.1.WLANConfiguration.{instance}");
            BandPaths {
                band,
                ssid: format!("{base}.SSID"),
                passphrase: format!("{base}.KeyPassphrase"),
                stations: Some(StationTemplate {
                    ip: format!("{base}.AssociatedDevice.{{i}}.AssociatedDeviceIPAddress"),
                    mac: format!("{base}.AssociatedDevice.{{i}}.AssociatedDeviceMACAddress"),
                    client_mode: Some(format!(
                        "{base}.AssociatedDevice.{{i}}.X_ITBS_WLAN_ClientMode"
                    )),
                }),
            }
        };

        Self {
            model_key: "1200R".into(),
            display_name: "Intelbras 1200R".into(),
            hardware_version: Some("PON1200R_v3.0".into()),
            layout: ParameterLayout::Fixed {
                bands: vec![wlan(1, Band::Ghz5), wlan(6, Band::Ghz2_4)],
            },
            primary_band: Band::Ghz5,
        }
    }

    pub fn is_generic(&self) -> bool {
        matches!(self.layout, ParameterLayout::Positional)
    }

    pub fn band_paths(&self, band: Band) -> Option<&BandPaths> {
        match &self.layout {
            ParameterLayout::Fixed { bands } => bands.iter().find(|b| b.band == band),
            ParameterLayout::Positional => None,
        }
    }

    /// Where `change_ssid` writes.
    pub fn ssid_write_path(&self) -> Option<&str> {
        match &self.layout {
            ParameterLayout::Fixed { .. } => {
                self.band_paths(self.primary_band).map(|b| b.ssid.as_str())
            }
            ParameterLayout::Positional => Some(GENERIC_SSID_PATH),
        }
    }

    /// Where `change_passphrase` writes.
    pub fn passphrase_write_path(&self) -> Option<&str> {
        match &self.layout {
            ParameterLayout::Fixed { .. } => self
                .band_paths(self.primary_band)
                .map(|b| b.passphrase.as_str()),
            ParameterLayout::Positional => Some(GENERIC_PASSPHRASE_PATH),
        }
    }

    /// Reject descriptors the mapper could not use.
    pub fn validate(&self) -> Result<(), CoreError> {
        let invalid = |reason: String| CoreError::Config {
            message: format!("vendor '{}': {reason}", self.model_key),
        };

        if self.model_key.trim().is_empty() {
            return Err(invalid("model key is empty".into()));
        }
        let ParameterLayout::Fixed { bands } = &self.layout else {
            return Ok(());
        };
        if self.band_paths(self.primary_band).is_none() {
            return Err(invalid(format!("no paths for primary band {}", self.primary_band)));
        }
        for (i, paths) in bands.iter().enumerate() {
            if bands[..i].iter().any(|b| b.band == paths.band) {
                return Err(invalid(format!("band {} listed twice", paths.band)));
            }
            if paths.ssid.trim().is_empty() || paths.passphrase.trim().is_empty() {
                return Err(invalid(format!("empty path for band {}", paths.band)));
            }
            if let Some(stations) = &paths.stations {
                if let Some(bad) = stations.paths().find(|p| !p.contains(INDEX_PLACEHOLDER)) {
                    return Err(invalid(format!("station path '{bad}' has no {{i}}")));
                }
            }
        }
        Ok(())
    }
}

// ── Registry ────────────────────────────────────────────────────────

fn registry_key(model: &str) -> String {
    model.trim().to_ascii_uppercase()
}

/// Model key → descriptor, case-insensitive, plus one generic fallback.
#[derive(Debug, Clone)]
pub struct VendorRegistry {
    models: HashMap<String, VendorDescriptor>,
    generic: VendorDescriptor,
}

impl Default for VendorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl VendorRegistry {
    /// Only the generic fallback.
    pub fn empty() -> Self {
        Self {
            models: HashMap::new(),
            generic: VendorDescriptor::generic(),
        }
    }

    /// The models that ship with the crate.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        let descriptor = VendorDescriptor::intelbras_1200r();
        registry
            .models
            .insert(registry_key(&descriptor.model_key), descriptor);
        registry
    }

    /// Built-ins plus `extra`, failing on the first invalid or duplicate entry.
    pub fn with_vendors(
        extra: impl IntoIterator<Item = VendorDescriptor>,
    ) -> Result<Self, CoreError> {
        let mut registry = Self::builtin();
        for descriptor in extra {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, descriptor: VendorDescriptor) -> Result<(), CoreError> {
        descriptor.validate()?;
        let key = registry_key(&descriptor.model_key);
        if self.models.contains_key(&key) {
            return Err(CoreError::DuplicateModel {
                key: descriptor.model_key,
            });
        }
        self.models.insert(key, descriptor);
        Ok(())
    }

    /// Registered descriptor for `model`, if any.
    pub fn get(&self, model: &str) -> Option<&VendorDescriptor> {
        self.models.get(&registry_key(model))
    }

    /// Registered descriptor, or the generic one.
    pub fn lookup(&self, model: Option<&str>) -> &VendorDescriptor {
        model.and_then(|m| self.get(m)).unwrap_or(&self.generic)
    }

    pub fn generic(&self) -> &VendorDescriptor {
        &self.generic
    }

    /// Registered descriptors sorted by model key.
    pub fn descriptors(&self) -> Vec<&VendorDescriptor> {
        let mut all: Vec<_> = self.models.values().collect();
        all.sort_by(|a, b| a.model_key.cmp(&b.model_key));
        all
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn custom(key: &str) -> VendorDescriptor {
        VendorDescriptor {
            model_key: key.into(),
            display_name: format!("Custom {key}"),
            hardware_version: None,
            layout: ParameterLayout::Fixed {
                bands: vec![BandPaths {
                    band: Band::Ghz2_4,
                    ssid: "X.WLANConfiguration.1.SSID".into(),
                    passphrase: "X.WLANConfiguration.1.KeyPassphrase".into(),
                    stations: None,
                }],
            },
            primary_band: Band::Ghz2_4,
        }
    }

    #[test]
    fn builtin_1200r_paths() {
        let registry = VendorRegistry::builtin();
        let d = registry.get("1200R").unwrap();

        assert_eq!(d.display_name, "Intelbras 1200R");
        assert_eq!(
            d.ssid_write_path(),
            Some("InternetGatewayDevice.LANDevice.1.WLANConfiguration.1.SSID")
        );
        assert_eq!(
            d.passphrase_write_path(),
            Some("InternetGatewayDevice.LANDevice.1.WLANConfiguration.1.KeyPassphrase")
        );
        let g24 = d.band_paths(Band::Ghz2_4).unwrap();
        assert_eq!(g24.ssid, "InternetGatewayDevice.LANDevice.1.WLANConfiguration.6.SSID");
        assert_eq!(
            g24.stations.as_ref().unwrap().mac,
            "InternetGatewayDevice.LANDevice.1.WLANConfiguration.6.AssociatedDevice.{i}.AssociatedDeviceMACAddress"
        );
        d.validate().unwrap();
    }

    #[test]
    fn lookup_is_case_insensitive_and_falls_back() {
        let registry = VendorRegistry::builtin();
        assert_eq!(registry.lookup(Some(" 1200r ")).model_key, "1200R");
        assert!(registry.lookup(Some("HG8245H")).is_generic());
        assert!(registry.lookup(None).is_generic());
    }

    #[test]
    fn generic_write_paths() {
        let generic = VendorDescriptor::generic();
        assert_eq!(generic.ssid_write_path(), Some(GENERIC_SSID_PATH));
        assert_eq!(generic.passphrase_write_path(), Some(GENERIC_PASSPHRASE_PATH));
    }

    #[test]
    fn duplicate_model_is_rejected() {
        let err = VendorRegistry::with_vendors([custom("ax3000"), custom("AX3000")]).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateModel { ref key } if key == "AX3000"));

        let err = VendorRegistry::with_vendors([custom("1200r")]).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateModel { .. }));
    }

    #[test]
    fn descriptor_without_primary_band_is_rejected() {
        let mut d = custom("X1");
        d.primary_band = Band::Ghz5;
        assert!(matches!(d.validate(), Err(CoreError::Config { .. })));
    }

    #[test]
    fn station_template_must_carry_placeholder() {
        let mut d = custom("X1");
        if let ParameterLayout::Fixed { bands } = &mut d.layout {
            bands[0].stations = Some(StationTemplate {
                ip: "X.AssociatedDevice.1.IP".into(),
                mac: "X.AssociatedDevice.{i}.MAC".into(),
                client_mode: None,
            });
        }
        assert!(d.validate().is_err());
    }

    #[test]
    fn template_expansion() {
        let t = "A.AssociatedDevice.{i}.AssociatedDeviceIPAddress";
        assert_eq!(StationTemplate::expand(t, 3), "A.AssociatedDevice.3.AssociatedDeviceIPAddress");
        assert_eq!(StationTemplate::group_prefix(t), Some("A.AssociatedDevice."));
        assert_eq!(StationTemplate::group_prefix("A.B"), None);
    }

    #[test]
    fn descriptors_are_sorted() {
        let registry = VendorRegistry::with_vendors([custom("ZX1"), custom("AX3000")]).unwrap();
        let keys: Vec<_> = registry.descriptors().iter().map(|d| d.model_key.as_str()).collect();
        assert_eq!(keys, vec!["1200R", "AX3000", "ZX1"]);
        assert_eq!(registry.len(), 3);
    }
}
