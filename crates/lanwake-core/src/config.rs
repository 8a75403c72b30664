// ── Runtime dashboard configuration ──
//
// Describes *how* to reach a backend and how often to poll it. Never
// touches disk: `lanwake-config` (or a test) builds a `DashboardConfig`
// and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use lanwake_api::{TlsMode, TransportConfig};

/// Discovery progress poll period.
pub const DISCOVERY_POLL_INTERVAL: Duration = Duration::from_millis(2000);
/// Recurring device-status poll period.
pub const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(30_000);
/// One-shot status fetch after (re)starting status monitoring.
pub const STATUS_INITIAL_DELAY: Duration = Duration::from_millis(5000);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs on the LAN).
    DangerAcceptInvalid,
}

/// Configuration for one backend.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend base URL (e.g., `http://127.0.0.1:5000`).
    pub backend_url: Url,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    pub discovery_poll_interval: Duration,
    pub status_poll_interval: Duration,
    pub status_initial_delay: Duration,
}

impl DashboardConfig {
    /// Config for `backend_url` with the stock timings.
    pub fn new(backend_url: Url) -> Self {
        Self {
            backend_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            discovery_poll_interval: DISCOVERY_POLL_INTERVAL,
            status_poll_interval: STATUS_POLL_INTERVAL,
            status_initial_delay: STATUS_INITIAL_DELAY,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
