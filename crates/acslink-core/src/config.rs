// ── Runtime configuration ──
//
// These types describe *how* to reach the ACS and how to behave once
// there. They carry credential data and tuning, but never touch disk.
// The CLI (via `acslink-config`) builds an `AcsConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::registry::VendorDescriptor;

/// ACS request timeout unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Delay after an inform-interval change before returning.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(10);

/// HTTP Basic credentials for the ACS northbound interface.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed ACS certificates).
    DangerAcceptInvalid,
}

/// How `set_polling_interval` waits for the CPE to pick up a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleStrategy {
    /// Sleep unconditionally.
    FixedDelay(Duration),
    /// Re-read the device every `poll_every` until its last Inform is
    /// newer than the task submission, giving up after `timeout`.
    AwaitInform {
        timeout: Duration,
        poll_every: Duration,
    },
}

impl Default for SettleStrategy {
    fn default() -> Self {
        Self::FixedDelay(DEFAULT_SETTLE_DELAY)
    }
}

/// Configuration for one ACS deployment.
///
/// Built by the CLI, passed to `DeviceService` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct AcsConfig {
    /// NBI root, e.g. `http://acs.example.net:7557`.
    pub url: Url,
    /// `None` for an ACS without authentication.
    pub credentials: Option<Credentials>,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Ask the ACS to contact the CPE immediately on every task.
    pub connection_request: bool,
    pub settle: SettleStrategy,
    /// When set, station listing first pushes this periodic inform
    /// interval (seconds) to the CPE and re-reads it.
    pub inform_interval: Option<u32>,
    /// Extra vendor descriptors registered on top of the built-ins.
    pub vendors: Vec<VendorDescriptor>,
}

impl AcsConfig {
    /// Defaults for everything but the URL.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            credentials: None,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
            connection_request: false,
            settle: SettleStrategy::default(),
            inform_interval: None,
            vendors: Vec::new(),
        }
    }
}
