//! Discovery command handlers.

use std::fmt::Write as _;

use tabled::{Table, Tabled, settings::Style};
use tracing::debug;

use lanwake_core::{
    Dashboard, DiscoveredDevice, DiscoverySession, PollKind, Renderer, StartOutcome,
};

use crate::cli::{DiscoverArgs, DiscoverCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{Frontend, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DiscoveredRow {
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "State")]
    state: &'static str,
}

impl From<&DiscoveredDevice> for DiscoveredRow {
    fn from(d: &DiscoveredDevice) -> Self {
        Self {
            mac: d.mac.to_string(),
            ip: d.ip.clone(),
            state: if d.already_imported {
                "imported"
            } else {
                "new"
            },
        }
    }
}

fn detail(session: &DiscoverySession) -> String {
    let mut out = String::new();
    let state = if session.active { "running" } else { "idle" };
    let _ = write!(
        out,
        "Scan {state}: {} found, {} new",
        session.count,
        session.new_device_count()
    );
    if session.has_results() {
        let rows: Vec<DiscoveredRow> = session.devices.iter().map(DiscoveredRow::from).collect();
        let _ = write!(out, "\n{}", Table::new(rows).with(Style::rounded()));
        if session.new_device_count() > 0 && !session.active {
            out.push_str("\nImport them with: lanwake import all");
        }
    }
    out
}

/// `MAC IP` of every device, one per line.
fn plain(session: &DiscoverySession) -> String {
    session
        .devices
        .iter()
        .map(|d| format!("{} {}", d.mac, d.ip))
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_session(session: &DiscoverySession, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(global.output, session, detail, plain)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Follow the running scan until it finishes. Ctrl-C stops it.
async fn follow(dashboard: &Dashboard, frontend: &Frontend) -> DiscoverySession {
    frontend.renderer.set_live(true);
    frontend.renderer.render_discovery(&dashboard.discovery_snapshot());

    tokio::select! {
        () = dashboard.polling().wait(PollKind::Discovery) => {
            debug!("scan finished");
        }
        () = util::interrupted() => {
            frontend.renderer.set_live(false);
            eprintln!("Stopping scan...");
            dashboard.stop_discovery().await;
        }
    }

    frontend.renderer.set_live(false);
    dashboard.discovery_snapshot()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    frontend: &Frontend,
    args: DiscoverArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DiscoverCommand::Start { watch } => match dashboard.start_discovery().await {
            StartOutcome::Started if watch => {
                let session = follow(dashboard, frontend).await;
                print_session(&session, global)
            }
            StartOutcome::Started => {
                if !global.quiet {
                    eprintln!("✓ Scan started. Follow it with: lanwake discover status --watch");
                }
                Ok(())
            }
            StartOutcome::Rejected { .. } | StartOutcome::Failed => {
                Err(CliError::OperationFailed {
                    operation: "Discovery start".into(),
                })
            }
        },

        DiscoverCommand::Stop => {
            let session = dashboard.stop_discovery().await;
            print_session(&session, global)
        }

        DiscoverCommand::Status { watch } => {
            let mut session = dashboard.open_discovery_view().await;
            if watch && session.active {
                session = follow(dashboard, frontend).await;
            }
            print_session(&session, global)
        }
    }
}
