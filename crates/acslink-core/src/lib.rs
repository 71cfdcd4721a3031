//! Device resolution and Wi-Fi provisioning on top of a TR-069 ACS.
//!
//! - **[`DeviceService`]**: the facade. Resolves a subscriber MAC to a
//!   managed CPE and reads or changes its Wi-Fi settings.
//! - **[`DeviceResolver`]**: exact WAN-MAC query first, then a full
//!   inventory scan with MAC, serial, and device-id heuristics.
//! - **[`VendorRegistry`]**: model key → [`VendorDescriptor`] of parameter
//!   paths, with a generic positional fallback.
//! - **[`mapper`]**: raw parameter snapshot → [`WifiConfig`] /
//!   [`ConnectedStation`]s, with sentinels for anything missing.
//! - **[`TaskIssuer`]**: `setParameterValues` submissions and the settle
//!   wait after an inform-interval change.

pub mod config;
pub mod convert;
pub mod error;
pub mod mac;
pub mod mapper;
pub mod model;
pub mod registry;
pub mod resolver;
pub mod service;
pub mod tasks;

// ── Primary re-exports ──────────────────────────────────────────────
pub use acslink_api::TaskReceipt;
pub use config::{AcsConfig, Credentials, SettleStrategy, TlsVerification};
pub use error::CoreError;
pub use mac::MacAddress;
pub use model::{
    Band, BandConfig, ConnectedStation, DeviceHandle, ParameterSnapshot, ParameterValue,
    WifiConfig,
};
pub use registry::{BandPaths, ParameterLayout, StationTemplate, VendorDescriptor, VendorRegistry};
pub use resolver::DeviceResolver;
pub use service::DeviceService;
pub use tasks::TaskIssuer;
