//! Status command handler.

use tabled::Tabled;

use lanwake_core::Dashboard;

use crate::cli::{GlobalOpts, StatusArgs};
use crate::error::CliError;
use crate::output;

use super::devices::{DeviceEntry, entries};
use super::{Frontend, util};

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn row(entry: &DeviceEntry, color: bool) -> StatusRow {
    StatusRow {
        name: entry.device.name.clone(),
        ip: entry.device.ip.clone().unwrap_or_else(|| "-".into()),
        status: output::status_label(&entry.status, color),
    }
}

pub async fn handle(
    dashboard: &Dashboard,
    frontend: &Frontend,
    args: StatusArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let count = dashboard.refresh_device_list().await?;

    let color = frontend.renderer.color();
    let out = output::render_list(
        global.output,
        &entries(dashboard),
        |e| row(e, color),
        |e| format!("{} {}", e.device.id, e.status),
    )?;
    output::print_output(&out, global.quiet);

    if !args.watch {
        return Ok(());
    }
    if count == 0 {
        if !global.quiet {
            eprintln!("No devices to watch. Add one with: lanwake devices add");
        }
        return Ok(());
    }

    if !global.quiet {
        eprintln!(
            "Watching {count} devices every {}s, Ctrl-C to stop",
            dashboard.config().status_poll_interval.as_secs()
        );
    }
    frontend.renderer.set_live(true);
    util::interrupted().await;
    frontend.renderer.set_live(false);
    Ok(())
}
