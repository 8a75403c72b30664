//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use lanwake_config::ConfigError;
use lanwake_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the lanwake backend")]
    #[diagnostic(
        code(lanwake::connection_failed),
        help(
            "{reason}\n\
             Check that the backend is running, or point at it with --backend <URL>."
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(lanwake::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Backend answers ──────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(lanwake::backend))]
    Backend { message: String },

    #[error("Backend answered with HTTP {status}")]
    #[diagnostic(code(lanwake::http))]
    Http { status: u16 },

    #[error("Backend rejected {action} (HTTP {status})")]
    #[diagnostic(
        code(lanwake::rejected),
        help("A device with the same MAC address may already exist.")
    )]
    Rejected { action: String, status: u16 },

    #[error("Invalid backend response: {message}")]
    #[diagnostic(
        code(lanwake::invalid_response),
        help("Is --backend pointing at a lanwake backend?")
    )]
    InvalidResponse { message: String },

    /// The operation already reported its failure as a notice.
    #[error("{operation} failed")]
    #[diagnostic(code(lanwake::operation_failed))]
    OperationFailed { operation: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(lanwake::not_found),
        help("Run: lanwake {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(lanwake::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(lanwake::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: lanwake config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(lanwake::config),
        help("Inspect the file with: lanwake config show")
    )]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(lanwake::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON output: {0}")]
    #[diagnostic(code(lanwake::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML output: {0}")]
    #[diagnostic(code(lanwake::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::CONFLICT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport { reason } => CliError::ConnectionFailed { reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Backend { message, status: _ } => CliError::Backend { message },

            CoreError::Http { status } => CliError::Http { status },

            CoreError::InvalidResponse { message } => CliError::InvalidResponse { message },

            CoreError::Validation { message } => CliError::Validation {
                field: "device".into(),
                reason: message,
            },

            CoreError::DeviceNotFound { identifier } => CliError::NotFound {
                resource_type: "device".into(),
                identifier,
                list_command: "devices list".into(),
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
            ConfigError::UnknownProfile { profile, available } => CliError::ProfileNotFound {
                name: profile,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_exit_codes() {
        let cases = [
            (
                CoreError::Transport {
                    reason: "connection refused".into(),
                },
                exit_code::CONNECTION,
            ),
            (CoreError::Timeout { timeout_secs: 5 }, exit_code::TIMEOUT),
            (
                CoreError::DeviceNotFound {
                    identifier: "a1b2c3d4".into(),
                },
                exit_code::NOT_FOUND,
            ),
            (
                CoreError::Validation {
                    message: "Name and MAC address are required".into(),
                },
                exit_code::USAGE,
            ),
            (
                CoreError::Backend {
                    message: "Discovery already in progress".into(),
                    status: 400,
                },
                exit_code::GENERAL,
            ),
        ];

        for (core, code) in cases {
            assert_eq!(CliError::from(core).exit_code(), code);
        }
    }

    #[test]
    fn backend_message_is_shown_verbatim() {
        let err = CliError::from(CoreError::Backend {
            message: "Discovery already in progress".into(),
            status: 400,
        });
        assert_eq!(err.to_string(), "Discovery already in progress");
    }

    #[test]
    fn unknown_profile_is_not_found() {
        let err = CliError::from(ConfigError::UnknownProfile {
            profile: "lab".into(),
            available: vec!["home".into(), "office".into()],
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert!(matches!(
            err,
            CliError::ProfileNotFound { ref available, .. } if available == "home, office"
        ));
    }
}
