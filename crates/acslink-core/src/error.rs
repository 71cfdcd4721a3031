// ── Core error types ──
//
// Consumers never see HTTP status codes or JSON parse failures directly.
// The `From<acslink_api::Error>` impl folds transport-layer errors into
// two buckets: the ACS could not be reached or answered badly
// (`UpstreamUnavailable`), or it answered with something we cannot read
// (`MalformedUpstreamData`).

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid MAC address: '{input}'")]
    InvalidMac { input: String },

    #[error("Invalid {field}: {reason}")]
    ValidationFailed { field: String, reason: String },

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("No managed device found for MAC {mac}")]
    DeviceNotFound { mac: String },

    // ── Upstream errors ──────────────────────────────────────────────
    #[error("ACS unavailable: {reason}")]
    UpstreamUnavailable {
        reason: String,
        /// HTTP status, when the ACS answered at all.
        status: Option<u16>,
        /// Set when the ACS did not answer within the client timeout.
        timeout_secs: Option<u64>,
    },

    #[error("Unexpected data from ACS: {message}")]
    MalformedUpstreamData { message: String },

    // ── Registry / configuration errors ──────────────────────────────
    #[error("Vendor model '{key}' is registered more than once")]
    DuplicateModel { key: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` for "no such device".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DeviceNotFound { .. })
    }

    /// Returns `true` if the ACS itself was the problem.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable { .. } | Self::MalformedUpstreamData { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<acslink_api::Error> for CoreError {
    fn from(err: acslink_api::Error) -> Self {
        match err {
            acslink_api::Error::Authentication { status } => CoreError::UpstreamUnavailable {
                reason: "ACS rejected the configured credentials".into(),
                status: Some(status),
                timeout_secs: None,
            },
            acslink_api::Error::Transport(ref e) => CoreError::UpstreamUnavailable {
                reason: e.to_string(),
                status: e.status().map(|s| s.as_u16()),
                timeout_secs: None,
            },
            acslink_api::Error::Timeout { timeout_secs } => CoreError::UpstreamUnavailable {
                reason: format!("request timed out after {timeout_secs}s"),
                status: None,
                timeout_secs: Some(timeout_secs),
            },
            acslink_api::Error::Tls(reason) => CoreError::UpstreamUnavailable {
                reason: format!("TLS error: {reason}"),
                status: None,
                timeout_secs: None,
            },
            acslink_api::Error::Http { status, body } => CoreError::UpstreamUnavailable {
                reason: if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {}", body.trim())
                },
                status: Some(status),
                timeout_secs: None,
            },
            acslink_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid ACS URL: {e}"),
            },
            acslink_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedUpstreamData { message }
            }
        }
    }
}
