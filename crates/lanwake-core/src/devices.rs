// ── Device list and device actions ──

use tracing::{debug, info, warn};

use crate::backend::FormOutcome;
use crate::controller::Dashboard;
use crate::error::CoreError;
use crate::model::{DeviceForm, DeviceId, ManagedDevice};
use crate::render::{Notice, RenderModel};

/// Result of a device form action (add, wake, delete, update).
///
/// The backend answers these with a redirect whether or not the change was
/// applied, so `Submitted` means "accepted for processing".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceAction {
    Submitted,
    /// The user declined the confirmation.
    Cancelled,
    /// The backend answered with an error status.
    Rejected { status: u16 },
}

impl From<FormOutcome> for DeviceAction {
    fn from(outcome: FormOutcome) -> Self {
        match outcome {
            FormOutcome::Redirected { .. } | FormOutcome::Completed { .. } => Self::Submitted,
            FormOutcome::Rejected { status } => Self::Rejected { status },
        }
    }
}

impl Dashboard {
    /// Fetch the full device list and render it. Indicators reset to
    /// unknown, one status fetch runs right away, and status monitoring is
    /// restarted for the new set. Returns the number of devices.
    pub async fn refresh_device_list(&self) -> Result<usize, CoreError> {
        let devices = self.inner.backend.list_devices().await?;
        let count = devices.len();

        self.inner.renderer.render_device_list(&devices);
        self.inner
            .model
            .send_replace(RenderModel::from_devices(devices));
        debug!(count, "device list rendered");

        if count > 0 {
            self.refresh_statuses_quietly().await;
        }
        self.restart_status_monitoring().await;
        Ok(count)
    }

    pub(crate) async fn refresh_device_list_quietly(&self) {
        if let Err(e) = self.refresh_device_list().await {
            warn!(error = %e, "device list refresh failed");
        }
    }

    /// Look a device up in the rendered list, reloading the list once if
    /// it is not there.
    pub async fn find_device(&self, id: &DeviceId) -> Result<ManagedDevice, CoreError> {
        let cached = self.inner.model.borrow().device(id).cloned();
        if let Some(device) = cached {
            return Ok(device);
        }
        self.refresh_device_list().await?;
        self.inner
            .model
            .borrow()
            .device(id)
            .cloned()
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: id.to_string(),
            })
    }

    /// Create a device from the add form.
    pub async fn add_device(&self, form: &DeviceForm) -> Result<DeviceAction, CoreError> {
        validate(form)?;
        let action = DeviceAction::from(self.inner.backend.create_device(form).await?);
        info!(name = %form.name, ?action, "device add submitted");
        self.refresh_device_list_quietly().await;
        Ok(action)
    }

    /// Send a wake signal after confirmation.
    pub async fn wake_device(&self, id: &DeviceId) -> Result<DeviceAction, CoreError> {
        let device = self.find_device(id).await?;
        let prompt = format!("Send wake signal to {}?", device.name);
        if !self.inner.notifier.confirm(&prompt).await {
            return Ok(DeviceAction::Cancelled);
        }

        let action = DeviceAction::from(self.inner.backend.wake_device(id).await?);
        if action == DeviceAction::Submitted {
            info!(%id, name = %device.name, "wake signal sent");
            self.notify(Notice::Success(format!("Wake signal sent to {}", device.name)))
                .await;
        }
        self.refresh_device_list_quietly().await;
        Ok(action)
    }

    /// Delete a device after confirmation.
    pub async fn delete_device(&self, id: &DeviceId) -> Result<DeviceAction, CoreError> {
        let device = self.find_device(id).await?;
        let prompt = format!("Delete device {}?", device.name);
        if !self.inner.notifier.confirm(&prompt).await {
            return Ok(DeviceAction::Cancelled);
        }

        let action = DeviceAction::from(self.inner.backend.delete_device(id).await?);
        info!(%id, ?action, "device delete submitted");
        self.refresh_device_list_quietly().await;
        Ok(action)
    }

    /// Replace a device's editable fields.
    pub async fn update_device(
        &self,
        id: &DeviceId,
        form: &DeviceForm,
    ) -> Result<DeviceAction, CoreError> {
        validate(form)?;
        let action = DeviceAction::from(self.inner.backend.update_device(id, form).await?);
        info!(%id, ?action, "device update submitted");
        self.refresh_device_list_quietly().await;
        Ok(action)
    }
}

fn validate(form: &DeviceForm) -> Result<(), CoreError> {
    match form.missing_required() {
        Some(_) => Err(CoreError::Validation {
            message: "Name and MAC address are required".into(),
        }),
        None => Ok(()),
    }
}
