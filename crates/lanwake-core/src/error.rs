// ── Core error types ──
//
// User-facing errors for the dashboard layer. Wraps `lanwake_api::Error`
// without exposing reqwest types, so outcomes can be cloned into render
// snapshots and notices.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    // ── Transport ────────────────────────────────────────────────────
    #[error("Cannot reach backend: {reason}")]
    Transport { reason: String },

    #[error("Backend request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Backend responses ────────────────────────────────────────────
    /// Explicit `{ "error": "..." }` payload, shown to the user verbatim.
    #[error("{message}")]
    Backend { message: String, status: u16 },

    #[error("Backend answered with HTTP {status}")]
    Http { status: u16 },

    #[error("Invalid backend response: {message}")]
    InvalidResponse { message: String },

    // ── Lookup / validation / configuration ──────────────────────────
    #[error("{message}")]
    Validation { message: String },

    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// No usable response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. })
    }

    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Backend { message, .. } => Some(message),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<lanwake_api::Error> for CoreError {
    fn from(err: lanwake_api::Error) -> Self {
        match err {
            lanwake_api::Error::Transport(e) => CoreError::Transport {
                reason: e.to_string(),
            },
            lanwake_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            lanwake_api::Error::Tls(msg) => CoreError::Transport {
                reason: format!("TLS error: {msg}"),
            },
            lanwake_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid backend URL: {e}"),
            },
            lanwake_api::Error::Backend { message, status } => {
                CoreError::Backend { message, status }
            }
            lanwake_api::Error::Http { status, body: _ } => CoreError::Http { status },
            lanwake_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}
