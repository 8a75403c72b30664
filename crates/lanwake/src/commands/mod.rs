//! Command dispatch: bridges CLI args -> dashboard operations -> output.

pub mod config_cmd;
pub mod devices;
pub mod discover;
pub mod import;
pub mod mac;
pub mod status;
pub mod util;

use std::sync::Arc;

use lanwake_core::Dashboard;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::terminal::{TerminalNotifier, TerminalRenderer};

/// The terminal collaborators a dashboard was built with, kept so
/// commands can switch to live output and inspect declined prompts.
pub struct Frontend {
    pub renderer: Arc<TerminalRenderer>,
    pub notifier: Arc<TerminalNotifier>,
}

impl Frontend {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            renderer: Arc::new(TerminalRenderer::new(global)),
            notifier: Arc::new(TerminalNotifier::new(global)),
        }
    }
}

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    dashboard: &Dashboard,
    frontend: &Frontend,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(dashboard, frontend, args, global).await,
        Command::Discover(args) => discover::handle(dashboard, frontend, args, global).await,
        Command::Import(args) => import::handle(dashboard, frontend, args, global).await,
        Command::Status(args) => status::handle(dashboard, frontend, args, global).await,
        // Handled before a dashboard is built
        Command::Mac { .. } | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
