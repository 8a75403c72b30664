// ── Import coordinator ──
//
// Turns discovered devices into persisted ones, one at a time through a
// pre-filled form or all new ones at once.

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::backend::FormOutcome;
use crate::controller::Dashboard;
use crate::model::{DeviceForm, MacAddress};
use crate::render::Notice;

pub(crate) const NOTHING_TO_IMPORT: &str = "No new devices to import";
pub(crate) const LIST_UNAVAILABLE: &str = "Failed to get device list";
pub(crate) const BULK_PARTIAL_FAILURE: &str =
    "Some devices failed to import. Please try importing them individually.";
pub(crate) const IMPORT_SUCCEEDED: &str = "Device imported successfully!";
pub(crate) const IMPORT_FAILED: &str =
    "Failed to import device. Please check if the device already exists.";

/// Result of an import operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Every discovered device is already imported.
    NothingToImport,
    /// The user declined the confirmation.
    Cancelled,
    /// Every request settled without a transport failure.
    Imported { count: usize },
    /// At least one request of the batch failed to reach the backend.
    PartialFailure { attempted: usize, failed: usize },
    /// The current discovery results could not be fetched.
    Unavailable,
    /// A single import the backend did not accept.
    Failed,
}

impl Dashboard {
    /// Import every discovered device not yet imported, under default names.
    ///
    /// Re-fetches the discovery results first, so devices imported from
    /// elsewhere in the meantime are skipped. Requests run concurrently and
    /// the outcome is decided only after all of them have settled. The
    /// device list and discovery view are refreshed afterwards either way.
    pub async fn import_all(&self) -> ImportOutcome {
        let session = match self.inner.backend.discovery_status().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "could not fetch discovery results for import");
                self.notify(Notice::Error(LIST_UNAVAILABLE.into())).await;
                return ImportOutcome::Unavailable;
            }
        };

        let forms: Vec<DeviceForm> = session
            .new_devices()
            .map(|d| DeviceForm::for_discovered(&d.mac, &d.ip))
            .collect();
        if forms.is_empty() {
            self.notify(Notice::Info(NOTHING_TO_IMPORT.into())).await;
            return ImportOutcome::NothingToImport;
        }

        let attempted = forms.len();
        let prompt = format!(
            "Import all {attempted} new devices? You can modify device details individually after import."
        );
        if !self.inner.notifier.confirm(&prompt).await {
            debug!(attempted, "bulk import declined");
            return ImportOutcome::Cancelled;
        }

        let backend = &self.inner.backend;
        let results = join_all(forms.iter().map(|form| backend.create_device(form))).await;
        let failed = results.iter().filter(|r| r.is_err()).count();

        let outcome = if failed == 0 {
            info!(count = attempted, "bulk import finished");
            self.notify(Notice::Success(format!(
                "Successfully imported {attempted} devices!"
            )))
            .await;
            ImportOutcome::Imported { count: attempted }
        } else {
            for err in results.iter().filter_map(|r| r.as_ref().err()) {
                warn!(error = %err, "bulk import request failed");
            }
            self.notify(Notice::Error(BULK_PARTIAL_FAILURE.into())).await;
            ImportOutcome::PartialFailure { attempted, failed }
        };

        self.refresh_device_list_quietly().await;
        self.check_discovery_status().await;
        outcome
    }

    /// Open the import form for one discovered device, pre-filled with its
    /// default name.
    pub fn import_form(&self, mac: &MacAddress, ip: &str) -> DeviceForm {
        let form = DeviceForm::for_discovered(mac, ip);
        self.inner.renderer.open_import_form(&form);
        form
    }

    /// Submit an import form. Only a redirect from the backend counts as
    /// success; then the form closes and the device list and discovery
    /// results are refreshed.
    pub async fn submit_import(&self, form: &DeviceForm) -> ImportOutcome {
        match self.inner.backend.create_device(form).await {
            Ok(FormOutcome::Redirected { .. }) => {
                info!(name = %form.name, mac = %form.mac, "device imported");
                self.inner.renderer.close_import_form();
                self.refresh_device_list_quietly().await;
                self.check_discovery_status().await;
                self.notify(Notice::Success(IMPORT_SUCCEEDED.into())).await;
                ImportOutcome::Imported { count: 1 }
            }
            Ok(other) => {
                warn!(?other, mac = %form.mac, "import not accepted");
                self.notify(Notice::Error(IMPORT_FAILED.into())).await;
                ImportOutcome::Failed
            }
            Err(e) => {
                warn!(error = %e, mac = %form.mac, "import request failed");
                self.notify(Notice::Error(IMPORT_FAILED.into())).await;
                ImportOutcome::Failed
            }
        }
    }

    /// Import one discovered device under its default name.
    pub async fn import_one(&self, mac: &MacAddress, ip: &str) -> ImportOutcome {
        let form = self.import_form(mac, ip);
        self.submit_import(&form).await
    }
}
