// ACS HTTP client
//
// Wraps `reqwest::Client` with ACS-specific URL construction, Basic
// credentials, and response classification. Endpoint methods live in
// `devices.rs` and `tasks.rs` as inherent impls to keep this module
// focused on transport mechanics.

use std::fmt;

use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// HTTP Basic credentials, fixed per deployment.
#[derive(Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: SecretString,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Raw HTTP client for the ACS northbound interface.
///
/// Every request carries the deployment's Basic credentials. Responses are
/// classified before the caller sees them: 401/403 become
/// [`Error::Authentication`], any other non-2xx becomes [`Error::Http`], and
/// a 2xx body that is not the expected JSON becomes [`Error::Deserialization`].
pub struct AcsClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Option<BasicAuth>,
    timeout_secs: u64,
}

impl AcsClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the ACS NBI root (e.g. `http://acs.example.net:7557`).
    pub fn new(
        base_url: Url,
        auth: Option<BasicAuth>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        ensure_base(&base_url)?;
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            auth,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        auth: Option<BasicAuth>,
    ) -> Result<Self, Error> {
        ensure_base(&base_url)?;
        Ok(Self {
            http,
            base_url,
            auth,
            timeout_secs: TransportConfig::default().timeout_secs(),
        })
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append path segments to the base URL. Each segment is
    /// percent-encoded, so device ids containing `%` or `/` stay intact.
    /// An empty trailing segment yields a trailing slash.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.send(self.http.get(url)).await?;
        Self::parse_body(resp).await.map(|(_, body)| body)
    }

    /// Send a POST request with a JSON body and decode the JSON response,
    /// returning the status alongside it.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<(StatusCode, T), Error> {
        debug!("POST {}", url);
        let resp = self.send(self.http.post(url).json(body)).await?;
        Self::parse_body(resp).await
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, Error> {
        let req = match &self.auth {
            Some(auth) => req.basic_auth(&auth.username, Some(auth.password.expose_secret())),
            None => req,
        };
        req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                Error::Transport(e)
            }
        })
    }

    async fn parse_body<T: DeserializeOwned>(resp: Response) -> Result<(StatusCode, T), Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: body.clone(),
        })?;
        Ok((status, parsed))
    }
}

fn ensure_base(url: &Url) -> Result<(), Error> {
    if url.cannot_be_a_base() {
        return Err(Error::InvalidUrl(
            url::ParseError::RelativeUrlWithCannotBeABaseBase,
        ));
    }
    Ok(())
}
