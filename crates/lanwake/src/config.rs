//! CLI configuration: thin wrapper around `lanwake_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--backend, --insecure, ...).

use std::time::Duration;

use lanwake_core::{DashboardConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use lanwake_config::{
    Config, Defaults, Profile, config_path, load_config, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the `DashboardConfig` for a backend-bound command.
///
/// An explicitly requested profile must exist. Without one, the default
/// profile is used if configured, and the stock backend address otherwise.
pub fn build_dashboard_config(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let profile = if global.profile.is_some() {
        cfg.profile(&profile_name)?.clone()
    } else {
        cfg.profiles.get(&profile_name).cloned().unwrap_or_default()
    };

    resolve_profile(&profile, &cfg.defaults, global)
}

/// Translate a `Profile` + global flags into a `DashboardConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<DashboardConfig, CliError> {
    let mut config = lanwake_config::profile_to_dashboard_config(profile, defaults)?;

    if let Some(ref raw) = global.backend {
        config.backend_url = lanwake_config::parse_backend_url(raw)?;
    }
    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }

    Ok(config)
}
