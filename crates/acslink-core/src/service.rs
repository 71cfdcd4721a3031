// ── Device service facade ──
//
// The entry point consumers use. Every call resolves the MAC afresh;
// nothing is cached between calls, so concurrent use for different MACs
// needs no coordination.
//
// Reads of the Wi-Fi config are advisory and degrade to sentinels.
// Station listing and writes propagate failures.

use std::sync::Arc;

use acslink_api::{AcsClient, BasicAuth, TaskReceipt, TlsMode, TransportConfig};
use tracing::{debug, info, warn};

use crate::config::{AcsConfig, TlsVerification};
use crate::error::CoreError;
use crate::mac::MacAddress;
use crate::mapper::{map_connected_stations, map_wifi_config};
use crate::model::{ConnectedStation, DeviceHandle, WifiConfig};
use crate::registry::{VendorDescriptor, VendorRegistry};
use crate::resolver::DeviceResolver;
use crate::tasks::TaskIssuer;

/// Longest SSID 802.11 allows, in bytes.
const MAX_SSID_BYTES: usize = 32;
/// WPA passphrase length bounds, in characters.
const PASSPHRASE_CHARS: std::ops::RangeInclusive<usize> = 8..=63;

struct Inner {
    client: AcsClient,
    registry: VendorRegistry,
    config: AcsConfig,
}

/// Read and change Wi-Fi settings of subscriber CPEs by MAC.
///
/// Cheap to clone; clones share one HTTP connection pool.
#[derive(Clone)]
pub struct DeviceService {
    inner: Arc<Inner>,
}

impl DeviceService {
    /// Build the HTTP client and vendor registry for `config`.
    pub fn new(config: AcsConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: match &config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: config.timeout,
        };
        let auth = config.credentials.as_ref().map(|c| BasicAuth {
            username: c.username.clone(),
            password: c.password.clone(),
        });
        let client = AcsClient::new(config.url.clone(), auth, &transport)?;
        let registry = VendorRegistry::with_vendors(config.vendors.iter().cloned())?;

        debug!(url = %config.url, vendors = registry.len(), "device service ready");
        Ok(Self {
            inner: Arc::new(Inner {
                client,
                registry,
                config,
            }),
        })
    }

    pub fn registry(&self) -> &VendorRegistry {
        &self.inner.registry
    }

    pub fn config(&self) -> &AcsConfig {
        &self.inner.config
    }

    fn resolver(&self) -> DeviceResolver<'_> {
        DeviceResolver::new(&self.inner.client)
    }

    fn issuer(&self) -> TaskIssuer<'_> {
        TaskIssuer::new(
            &self.inner.client,
            self.inner.config.connection_request,
            self.inner.config.settle,
        )
    }

    /// Descriptor for a resolved device; the generic one if unregistered.
    pub fn descriptor_for(&self, handle: &DeviceHandle) -> &VendorDescriptor {
        self.inner.registry.lookup(handle.model.as_deref())
    }

    /// Resolve a MAC, rejecting malformed input before any request.
    pub async fn resolve(&self, mac: &str) -> Result<DeviceHandle, CoreError> {
        MacAddress::parse(mac)?;
        self.resolver().try_resolve(mac).await
    }

    /// Number of devices the ACS lists.
    pub async fn check(&self) -> Result<usize, CoreError> {
        Ok(self.inner.client.count_devices().await?)
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current SSID and passphrase per band.
    ///
    /// Never fails: an invalid MAC, an unknown device, or an unreachable
    /// ACS all yield [`WifiConfig::unavailable`].
    pub async fn get_wifi_config(&self, mac: &str) -> WifiConfig {
        let Some(handle) = self.resolver().resolve(mac).await else {
            warn!(mac, "device not resolved, reporting Wi-Fi config as unavailable");
            return WifiConfig::unavailable();
        };
        let descriptor = self.descriptor_for(&handle);
        debug!(device_id = %handle.id, model = %descriptor.model_key, "mapping Wi-Fi config");
        map_wifi_config(&handle, Some(descriptor))
    }

    /// Stations connected to the device behind `mac`.
    ///
    /// With an inform interval configured, the CPE is first asked to
    /// report more often and re-read; both steps are best-effort.
    pub async fn list_connected_stations(
        &self,
        mac: &str,
    ) -> Result<Vec<ConnectedStation>, CoreError> {
        let mut handle = self.resolve(mac).await?;

        if let Some(seconds) = self.inner.config.inform_interval {
            handle = self.refresh(handle, seconds).await;
        }

        let stations = map_connected_stations(&handle, Some(self.descriptor_for(&handle)));
        debug!(device_id = %handle.id, stations = stations.len(), "mapped connected stations");
        Ok(stations)
    }

    async fn refresh(&self, handle: DeviceHandle, seconds: u32) -> DeviceHandle {
        if let Err(e) = self.issuer().set_polling_interval(&handle, seconds).await {
            warn!(device_id = %handle.id, error = %e, "inform interval update failed");
        }
        match self.resolver().fetch(&handle.id).await {
            Ok(Some(fresh)) => fresh,
            Ok(None) => {
                warn!(device_id = %handle.id, "device missing on re-read, using earlier snapshot");
                handle
            }
            Err(e) => {
                warn!(device_id = %handle.id, error = %e, "re-read failed, using earlier snapshot");
                handle
            }
        }
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Change the SSID of the model's primary band.
    pub async fn change_ssid(&self, mac: &str, ssid: &str) -> Result<TaskReceipt, CoreError> {
        validate_ssid(ssid)?;
        let handle = self.resolve(mac).await?;
        let descriptor = self.descriptor_for(&handle);
        let path = descriptor
            .ssid_write_path()
            .ok_or_else(|| missing_write_path(descriptor, "SSID"))?;

        info!(device_id = %handle.id, ssid, "changing SSID");
        self.issuer().submit(&handle, path, ssid).await
    }

    /// Change the passphrase of the model's primary band.
    pub async fn change_passphrase(
        &self,
        mac: &str,
        passphrase: &str,
    ) -> Result<TaskReceipt, CoreError> {
        validate_passphrase(passphrase)?;
        let handle = self.resolve(mac).await?;
        let descriptor = self.descriptor_for(&handle);
        let path = descriptor
            .passphrase_write_path()
            .ok_or_else(|| missing_write_path(descriptor, "passphrase"))?;

        info!(device_id = %handle.id, "changing passphrase");
        self.issuer().submit(&handle, path, passphrase).await
    }

    /// Change the periodic inform interval and wait for it to settle.
    pub async fn set_polling_interval(
        &self,
        mac: &str,
        seconds: u32,
    ) -> Result<TaskReceipt, CoreError> {
        if seconds == 0 {
            return Err(CoreError::ValidationFailed {
                field: "inform interval".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        let handle = self.resolve(mac).await?;
        self.issuer().set_polling_interval(&handle, seconds).await
    }
}

fn missing_write_path(descriptor: &VendorDescriptor, what: &str) -> CoreError {
    CoreError::Config {
        message: format!(
            "vendor '{}' has no {what} path for band {}",
            descriptor.model_key, descriptor.primary_band
        ),
    }
}

fn validate_ssid(ssid: &str) -> Result<(), CoreError> {
    let invalid = |reason: &str| CoreError::ValidationFailed {
        field: "SSID".into(),
        reason: reason.into(),
    };
    if ssid.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if ssid.len() > MAX_SSID_BYTES {
        return Err(invalid("must be at most 32 bytes"));
    }
    Ok(())
}

fn validate_passphrase(passphrase: &str) -> Result<(), CoreError> {
    if PASSPHRASE_CHARS.contains(&passphrase.chars().count()) {
        Ok(())
    } else {
        Err(CoreError::ValidationFailed {
            field: "passphrase".into(),
            reason: "must be 8 to 63 characters".into(),
        })
    }
}
