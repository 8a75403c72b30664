//! Import command handlers.

use lanwake_core::{Dashboard, ImportOutcome, MacAddress};

use crate::cli::{GlobalOpts, ImportArgs, ImportCommand};
use crate::error::CliError;

use super::{Frontend, util};

pub async fn handle(
    dashboard: &Dashboard,
    frontend: &Frontend,
    args: ImportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let outcome = match args.command {
        ImportCommand::All => dashboard.import_all().await,

        ImportCommand::One {
            mac,
            ip,
            name,
            description,
        } => {
            let mac = MacAddress::new(&mac);
            if !mac.is_canonical() {
                return Err(CliError::Validation {
                    field: "mac".into(),
                    reason: format!("'{mac}' is not a 48-bit MAC address"),
                });
            }

            if name.is_none() && description.is_none() {
                dashboard.import_one(&mac, &ip).await
            } else {
                let mut form = dashboard.import_form(&mac, &ip);
                if let Some(name) = name {
                    form.name = name;
                }
                if let Some(description) = description {
                    form.description = description;
                }
                dashboard.submit_import(&form).await
            }
        }
    };

    match outcome {
        ImportOutcome::NothingToImport | ImportOutcome::Imported { .. } => Ok(()),
        ImportOutcome::Cancelled => util::cancelled("bulk import", frontend, global),
        ImportOutcome::PartialFailure { attempted, failed } => Err(CliError::OperationFailed {
            operation: format!("Import of {failed} of {attempted} devices"),
        }),
        ImportOutcome::Unavailable | ImportOutcome::Failed => Err(CliError::OperationFailed {
            operation: "Import".into(),
        }),
    }
}
