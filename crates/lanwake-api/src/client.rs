// Backend HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, error-payload detection,
// and form submission. Endpoint groups (devices, discovery, status) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::FormOutcome;
use crate::transport::TransportConfig;

/// Raw HTTP client for the device manager backend.
///
/// Every JSON method distinguishes a transport failure, an explicit
/// `{ "error": "..." }` payload, and a non-2xx status. Nothing here
/// panics on a bad response.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl BackendClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root (e.g. `http://192.168.1.10:5000`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: normalize_base(base_url),
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for disabling redirects if form
    /// outcomes need to be observed. `timeout` should match the one the
    /// client was built with; it is only used in error reports.
    pub fn with_client(http: reqwest::Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            timeout_secs: timeout.as_secs(),
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Resolve an endpoint path against the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.parse_json(resp).await
    }

    /// Send a bodiless POST request and decode the JSON body.
    pub(crate) async fn post_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.parse_json(resp).await
    }

    /// Submit a form-encoded POST and report how the backend answered.
    pub(crate) async fn post_form(
        &self,
        path: &str,
        form: Option<&impl Serialize>,
    ) -> Result<FormOutcome, Error> {
        let url = self.url(path)?;
        debug!("POST (form) {}", url);

        let mut req = self.http.post(url);
        if let Some(form) = form {
            req = req.form(form);
        }
        let resp = req.send().await.map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let outcome = if status.is_redirection() {
            FormOutcome::Redirected {
                location: resp
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_owned),
            }
        } else if status.is_success() {
            FormOutcome::Completed {
                status: status.as_u16(),
            }
        } else {
            FormOutcome::Rejected {
                status: status.as_u16(),
            }
        };
        debug!(?outcome, "form submission answered");
        Ok(outcome)
    }

    /// Decode a JSON response, detecting `{ "error": "..." }` payloads
    /// before looking at the status code.
    async fn parse_json<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if let Some(message) = error_payload(&body) {
            return Err(Error::Backend {
                message,
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// Ensure the base path ends with `/` so `Url::join` appends instead of
/// replacing the last segment.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Extract the message from an `{ "error": "..." }` body.
fn error_payload(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .as_object()?
        .get("error")?
        .as_str()
        .map(str::to_owned)
}
