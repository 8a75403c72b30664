//! Device command handlers.

use serde::Serialize;
use tabled::Tabled;

use lanwake_core::{Dashboard, DeviceId, DeviceStatus, ManagedDevice};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{Frontend, util};

// ── Table row ───────────────────────────────────────────────────────

/// A saved device with its current indicator, as listed.
#[derive(Serialize)]
pub struct DeviceEntry {
    #[serde(flatten)]
    pub device: ManagedDevice,
    pub status: DeviceStatus,
}

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last Wake")]
    last_wake: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn row(entry: &DeviceEntry, color: bool) -> DeviceRow {
    let d = &entry.device;
    DeviceRow {
        id: d.id.to_string(),
        name: d.name.clone(),
        mac: d.mac.to_string(),
        ip: d.ip.clone().unwrap_or_else(|| "-".into()),
        status: output::status_label(&entry.status, color),
        last_wake: d.last_wake_display().unwrap_or_else(|| "Never".into()),
        description: d.description.clone().unwrap_or_default(),
    }
}

/// Devices currently on screen, in list order.
pub fn entries(dashboard: &Dashboard) -> Vec<DeviceEntry> {
    let model = dashboard.render_model();
    model
        .devices()
        .iter()
        .map(|device| DeviceEntry {
            status: model.status_of(&device.id).cloned().unwrap_or_default(),
            device: device.clone(),
        })
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    frontend: &Frontend,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            dashboard.initialize().await?;
            let color = frontend.renderer.color();
            let out = output::render_list(
                global.output,
                &entries(dashboard),
                |e| row(e, color),
                |e| e.device.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Add(fields) => {
            let form = util::device_form(fields);
            let action = dashboard.add_device(&form).await?;
            let done = format!("Device '{}' saved", form.name);
            util::finish_action(action, "device add", Some(&done), frontend, global)
        }

        DevicesCommand::Wake { device } => {
            let action = dashboard.wake_device(&DeviceId::from(device)).await?;
            util::finish_action(action, "wake", None, frontend, global)
        }

        DevicesCommand::Delete { device } => {
            let id = DeviceId::from(device);
            let action = dashboard.delete_device(&id).await?;
            let done = format!("Device {id} deleted");
            util::finish_action(action, "device delete", Some(&done), frontend, global)
        }

        DevicesCommand::Update { device, fields } => {
            let id = DeviceId::from(device);
            let form = util::device_form(fields);
            let action = dashboard.update_device(&id, &form).await?;
            let done = format!("Device {id} updated");
            util::finish_action(action, "device update", Some(&done), frontend, global)
        }
    }
}
