use thiserror::Error;

/// Top-level error type for the `acslink-api` crate.
///
/// Covers every failure mode of the ACS REST surface: transport,
/// authentication, non-success responses, and unexpected bodies.
/// `acslink-core` maps these into its own taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The ACS rejected the configured Basic credentials.
    #[error("ACS rejected the credentials (HTTP {status})")]
    Authentication { status: u16 },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── ACS ─────────────────────────────────────────────────────────
    /// Any other non-2xx response. The body is kept verbatim because the
    /// ACS reports faults as plain text.
    #[error("ACS returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status carried by this error, if the ACS answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status } | Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a transient error.
    ///
    /// Nothing in this workspace retries; the flag only feeds diagnostics.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_is_exposed() {
        let err = Error::Http {
            status: 503,
            body: "busy".into(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(err.is_transient());
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_is_detected() {
        let err = Error::Http {
            status: 404,
            body: String::new(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_transient());
    }

    #[test]
    fn deserialization_has_no_status() {
        let err = Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        };
        assert_eq!(err.status(), None);
    }
}
