//! Shared helpers for command handlers.

use lanwake_core::{DeviceAction, DeviceForm};
use tracing::warn;

use crate::cli::{DeviceFields, GlobalOpts};
use crate::error::CliError;

use super::Frontend;

/// Build a device form from `--name/--mac/--ip/--description`.
pub fn device_form(fields: DeviceFields) -> DeviceForm {
    DeviceForm {
        name: fields.name,
        mac: fields.mac,
        ip: fields.ip.unwrap_or_default(),
        description: fields.description.unwrap_or_default(),
    }
}

/// Turn a device action result into the command's exit status.
///
/// `done` is printed on success unless the dashboard already announced it.
pub fn finish_action(
    action: DeviceAction,
    what: &str,
    done: Option<&str>,
    frontend: &Frontend,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match action {
        DeviceAction::Submitted => {
            if let Some(done) = done {
                if !global.quiet {
                    eprintln!("✓ {done}");
                }
            }
            Ok(())
        }
        DeviceAction::Cancelled => cancelled(what, frontend, global),
        DeviceAction::Rejected { status } => Err(CliError::Rejected {
            action: what.into(),
            status,
        }),
    }
}

/// A declined confirmation. Without a terminal to ask on, it is an error
/// pointing at `--yes`.
pub fn cancelled(what: &str, frontend: &Frontend, global: &GlobalOpts) -> Result<(), CliError> {
    if frontend.notifier.declined_unprompted() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: what.into(),
        });
    }
    if !global.quiet {
        eprintln!("Cancelled.");
    }
    Ok(())
}

/// Resolve on Ctrl-C. If the handler cannot be installed, never resolves.
pub async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
