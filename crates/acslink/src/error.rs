//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text, and each of those onto a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use acslink_config::ConfigError;
use acslink_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the ACS: {reason}")]
    #[diagnostic(
        code(acslink::connection_failed),
        help(
            "Check that the ACS northbound interface is running and reachable.\n\
             Try: acslink check --url <URL>"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("ACS answered with an error: {reason}")]
    #[diagnostic(code(acslink::upstream))]
    Upstream { reason: String },

    #[error("Unexpected data from ACS: {message}")]
    #[diagnostic(
        code(acslink::malformed_response),
        help("The URL may not point at the ACS northbound interface.")
    )]
    MalformedResponse { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed (HTTP {status})")]
    #[diagnostic(
        code(acslink::auth_failed),
        help(
            "Verify the username and password of the profile.\n\
             The password is read from ACSLINK_PASSWORD, the profile, or the keyring."
        )
    )]
    AuthFailed { status: u16 },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(acslink::no_credentials),
        help(
            "Set ACSLINK_PASSWORD, add `password` or `password_env` to the profile,\n\
             or store it in the keyring under service 'acslink', entry '{profile}/password'."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("No managed device found for MAC '{mac}'")]
    #[diagnostic(
        code(acslink::not_found),
        help("Check the MAC against the subscriber record, or run: acslink devices resolve {mac} -vv")
    )]
    NotFound { mac: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(acslink::validation))]
    Validation { field: String, reason: String },

    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(acslink::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in {path}")]
    #[diagnostic(code(acslink::profile_not_found))]
    ProfileNotFound { name: String, path: String },

    #[error("No ACS configured")]
    #[diagnostic(
        code(acslink::no_config),
        help(
            "Pass --url (or set ACSLINK_URL), or add a profile to\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(acslink::config))]
    Config { message: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(acslink::timeout),
        help("Increase timeout with --timeout or check ACS responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(acslink::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidMac { input } => CliError::Validation {
                field: "MAC address".into(),
                reason: format!("'{input}' is not 12 hex digits"),
            },

            CoreError::ValidationFailed { field, reason } => {
                CliError::Validation { field, reason }
            }

            CoreError::DeviceNotFound { mac } => CliError::NotFound { mac },

            CoreError::UpstreamUnavailable {
                timeout_secs: Some(seconds),
                ..
            } => CliError::Timeout { seconds },

            CoreError::UpstreamUnavailable {
                status: Some(status @ (401 | 403)),
                ..
            } => CliError::AuthFailed { status },

            CoreError::UpstreamUnavailable {
                reason,
                status: None,
                ..
            } => CliError::ConnectionFailed { reason },

            CoreError::UpstreamUnavailable { reason, .. } => CliError::Upstream { reason },

            CoreError::MalformedUpstreamData { message } => {
                CliError::MalformedResponse { message }
            }

            CoreError::DuplicateModel { key } => CliError::Config {
                message: format!("vendor model '{key}' is configured more than once"),
            },

            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name, path } => CliError::ProfileNotFound { name, path },
            ConfigError::Figment(e) => CliError::Config {
                message: e.to_string(),
            },
        }
    }
}
