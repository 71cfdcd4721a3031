//! Configuration for the acslink CLI.
//!
//! TOML profiles, credential resolution (env + plaintext + keyring),
//! custom vendor descriptors, and translation to `acslink_core::AcsConfig`.
//! The CLI adds `GlobalOpts`-aware overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use acslink_core::config::DEFAULT_TIMEOUT;
use acslink_core::{
    AcsConfig, Band, BandPaths, Credentials, ParameterLayout, SettleStrategy, StationTemplate,
    TlsVerification, VendorDescriptor,
};

/// Keyring service name; entries are `<profile>/password`.
pub const KEYRING_SERVICE: &str = "acslink";
/// Environment prefix for config keys; `__` separates nesting levels.
pub const ENV_PREFIX: &str = "ACSLINK_";
pub const PASSWORD_ENV: &str = "ACSLINK_PASSWORD";
pub const USERNAME_ENV: &str = "ACSLINK_USERNAME";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in {path}")]
    UnknownProfile { name: String, path: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named ACS profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,

    /// Extra vendor models, shared by all profiles.
    #[serde(default)]
    pub vendors: Vec<VendorEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
            vendors: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// A named ACS profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// NBI base URL (e.g., "http://acs.example.net:7557").
    pub url: String,

    /// Basic-auth username. No username means no authentication.
    pub username: Option<String>,

    /// Password in plaintext. Prefer `password_env` or the keyring.
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Ask the ACS to contact the CPE immediately on every task.
    #[serde(default)]
    pub connection_request: bool,

    /// Periodic inform interval pushed before listing stations (seconds).
    pub inform_interval: Option<u32>,

    /// How to wait after an inform-interval change.
    pub settle: Option<SettleEntry>,
}

/// `[profiles.<name>.settle]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SettleEntry {
    /// Sleep `delay` seconds.
    Fixed {
        #[serde(default = "default_settle_delay")]
        delay: u64,
    },
    /// Poll every `poll_every` seconds until the CPE informs, for at most
    /// `timeout` seconds.
    AwaitInform {
        #[serde(default = "default_settle_timeout")]
        timeout: u64,
        #[serde(default = "default_poll_every")]
        poll_every: u64,
    },
}

fn default_settle_delay() -> u64 {
    10
}
fn default_settle_timeout() -> u64 {
    60
}
fn default_poll_every() -> u64 {
    5
}

impl From<&SettleEntry> for SettleStrategy {
    fn from(entry: &SettleEntry) -> Self {
        match *entry {
            SettleEntry::Fixed { delay } => Self::FixedDelay(Duration::from_secs(delay)),
            SettleEntry::AwaitInform {
                timeout,
                poll_every,
            } => Self::AwaitInform {
                timeout: Duration::from_secs(timeout),
                poll_every: Duration::from_secs(poll_every.max(1)),
            },
        }
    }
}

/// `[[vendors]]`: a model the built-in registry does not know.
///
/// With no `bands`, reads use the positional heuristic.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VendorEntry {
    pub model: String,
    pub display_name: Option<String>,
    pub hardware_version: Option<String>,
    #[serde(default = "default_primary_band")]
    pub primary_band: String,
    #[serde(default)]
    pub bands: Vec<VendorBandEntry>,
}

fn default_primary_band() -> String {
    "5GHz".into()
}

/// `[[vendors.bands]]`. Station paths use `{i}` for the instance index.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VendorBandEntry {
    pub band: String,
    pub ssid: String,
    pub passphrase: String,
    pub station_ip: Option<String>,
    pub station_mac: Option<String>,
    pub station_client_mode: Option<String>,
}

fn parse_band(raw: &str, field: &str) -> Result<Band, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("expected '2.4GHz' or '5GHz', got '{raw}'"),
    })
}

impl VendorEntry {
    /// Translate into a registry descriptor.
    pub fn to_descriptor(&self) -> Result<VendorDescriptor, ConfigError> {
        let field = |name: &str| format!("vendors.{}.{name}", self.model);

        let layout = if self.bands.is_empty() {
            ParameterLayout::Positional
        } else {
            let bands = self
                .bands
                .iter()
                .map(|b| {
                    let stations = match (&b.station_ip, &b.station_mac) {
                        (Some(ip), Some(mac)) => Some(StationTemplate {
                            ip: ip.clone(),
                            mac: mac.clone(),
                            client_mode: b.station_client_mode.clone(),
                        }),
                        (None, None) => None,
                        _ => {
                            return Err(ConfigError::Validation {
                                field: field("bands"),
                                reason: "station_ip and station_mac must be set together".into(),
                            });
                        }
                    };
                    Ok(BandPaths {
                        band: parse_band(&b.band, &field("bands.band"))?,
                        ssid: b.ssid.clone(),
                        passphrase: b.passphrase.clone(),
                        stations,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            ParameterLayout::Fixed { bands }
        };

        let descriptor = VendorDescriptor {
            model_key: self.model.clone(),
            display_name: self.display_name.clone().unwrap_or_else(|| self.model.clone()),
            hardware_version: self.hardware_version.clone(),
            layout,
            primary_band: parse_band(&self.primary_band, &field("primary_band"))?,
        };
        descriptor.validate().map_err(|e| ConfigError::Validation {
            field: "vendors".into(),
            reason: e.to_string(),
        })?;
        Ok(descriptor)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("net", "acslink", "acslink").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("acslink");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the default path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment. A missing file is
/// not an error; defaults and the environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

impl Config {
    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.into(),
                path: config_path().display().to_string(),
            })
    }

    /// All `[[vendors]]` as registry descriptors.
    pub fn vendor_descriptors(&self) -> Result<Vec<VendorDescriptor>, ConfigError> {
        self.vendors.iter().map(VendorEntry::to_descriptor).collect()
    }
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve the ACS password.
///
/// Order: the profile's `password_env` variable, `ACSLINK_PASSWORD`,
/// plaintext in the profile, then the system keyring.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    // 4. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Basic-auth credentials for a profile, or `None` if it has no username.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Option<Credentials>, ConfigError> {
    let Some(username) = profile
        .username
        .clone()
        .or_else(|| std::env::var(USERNAME_ENV).ok())
    else {
        return Ok(None);
    };
    let password = resolve_password(profile, profile_name)?;
    Ok(Some(Credentials { username, password }))
}

/// Build an `AcsConfig` from a profile, without CLI flag overrides.
pub fn profile_to_acs_config(
    config: &Config,
    profile: &Profile,
    profile_name: &str,
) -> Result<AcsConfig, ConfigError> {
    let url: url::Url = profile.url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {}", profile.url),
    })?;

    let tls = if profile.insecure.unwrap_or(config.defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut acs = AcsConfig::new(url);
    acs.credentials = resolve_credentials(profile, profile_name)?;
    acs.tls = tls;
    acs.timeout = Duration::from_secs(profile.timeout.unwrap_or(config.defaults.timeout));
    acs.connection_request = profile.connection_request;
    acs.inform_interval = profile.inform_interval;
    if let Some(ref settle) = profile.settle {
        acs.settle = settle.into();
    }
    acs.vendors = config.vendor_descriptors()?;
    Ok(acs)
}
