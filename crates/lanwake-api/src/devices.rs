// Device endpoints
//
// Full-list fetch (JSON) plus the form-based mutations the page submits:
// create, wake, delete, update.

use tracing::debug;

use crate::client::BackendClient;
use crate::error::Error;
use crate::models::{DeviceForm, DeviceRecord, FormOutcome};

impl BackendClient {
    /// List all persisted devices.
    ///
    /// `GET /devices`
    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        debug!("listing devices");
        self.get_json("devices").await
    }

    /// Create a device from a form.
    ///
    /// `POST /add` (form-encoded `name`, `mac`, `ip`, `description`).
    /// Success is signalled by a redirect.
    pub async fn create_device(&self, form: &DeviceForm) -> Result<FormOutcome, Error> {
        debug!(name = %form.name, mac = %form.mac, "creating device");
        self.post_form("add", Some(form)).await
    }

    /// Send a Wake-on-LAN packet to a device.
    ///
    /// `POST /wake/{id}`
    pub async fn wake_device(&self, id: &str) -> Result<FormOutcome, Error> {
        debug!(id, "waking device");
        self.post_form(&format!("wake/{id}"), None::<&DeviceForm>)
            .await
    }

    /// Delete a device.
    ///
    /// `POST /delete/{id}`
    pub async fn delete_device(&self, id: &str) -> Result<FormOutcome, Error> {
        debug!(id, "deleting device");
        self.post_form(&format!("delete/{id}"), None::<&DeviceForm>)
            .await
    }

    /// Replace a device's editable fields.
    ///
    /// `POST /update/{id}`
    pub async fn update_device(&self, id: &str, form: &DeviceForm) -> Result<FormOutcome, Error> {
        debug!(id, name = %form.name, "updating device");
        self.post_form(&format!("update/{id}"), Some(form)).await
    }
}
