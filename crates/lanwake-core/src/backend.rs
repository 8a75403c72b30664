// ── Backend seam ──
//
// Everything the dashboard needs from the backend, expressed in domain
// types. `BackendClient` is the production implementation; tests swap in
// an in-memory fake.

use async_trait::async_trait;
use tracing::debug;

use lanwake_api::BackendClient;
pub use lanwake_api::FormOutcome;

use crate::convert::status_map;
use crate::error::CoreError;
use crate::model::{DeviceForm, DeviceId, DiscoverySession, ManagedDevice, StatusMap};

#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /status`
    async fn device_statuses(&self) -> Result<StatusMap, CoreError>;

    /// `GET /devices`
    async fn list_devices(&self) -> Result<Vec<ManagedDevice>, CoreError>;

    /// `POST /discover/start`. A refusal carries the backend's message as
    /// [`CoreError::Backend`].
    async fn start_discovery(&self) -> Result<(), CoreError>;

    /// `POST /discover/stop`
    async fn stop_discovery(&self) -> Result<(), CoreError>;

    /// `GET /discover/status`
    async fn discovery_status(&self) -> Result<DiscoverySession, CoreError>;

    /// `POST /add`. HTTP status is data, only transport failures are `Err`.
    async fn create_device(&self, form: &DeviceForm) -> Result<FormOutcome, CoreError>;

    async fn wake_device(&self, id: &DeviceId) -> Result<FormOutcome, CoreError>;

    async fn delete_device(&self, id: &DeviceId) -> Result<FormOutcome, CoreError>;

    async fn update_device(&self, id: &DeviceId, form: &DeviceForm)
    -> Result<FormOutcome, CoreError>;
}

#[async_trait]
impl Backend for BackendClient {
    async fn device_statuses(&self) -> Result<StatusMap, CoreError> {
        let raw = BackendClient::device_statuses(self).await?;
        debug!(count = raw.len(), "fetched device statuses");
        Ok(status_map(raw))
    }

    async fn list_devices(&self) -> Result<Vec<ManagedDevice>, CoreError> {
        let records = BackendClient::list_devices(self).await?;
        Ok(records.into_iter().map(ManagedDevice::from).collect())
    }

    async fn start_discovery(&self) -> Result<(), CoreError> {
        Ok(BackendClient::start_discovery(self).await?)
    }

    async fn stop_discovery(&self) -> Result<(), CoreError> {
        BackendClient::stop_discovery(self).await?;
        Ok(())
    }

    async fn discovery_status(&self) -> Result<DiscoverySession, CoreError> {
        let record = BackendClient::discovery_status(self).await?;
        Ok(DiscoverySession::from(record))
    }

    async fn create_device(&self, form: &DeviceForm) -> Result<FormOutcome, CoreError> {
        Ok(BackendClient::create_device(self, &form.into()).await?)
    }

    async fn wake_device(&self, id: &DeviceId) -> Result<FormOutcome, CoreError> {
        Ok(BackendClient::wake_device(self, id.as_str()).await?)
    }

    async fn delete_device(&self, id: &DeviceId) -> Result<FormOutcome, CoreError> {
        Ok(BackendClient::delete_device(self, id.as_str()).await?)
    }

    async fn update_device(
        &self,
        id: &DeviceId,
        form: &DeviceForm,
    ) -> Result<FormOutcome, CoreError> {
        Ok(BackendClient::update_device(self, id.as_str(), &form.into()).await?)
    }
}
