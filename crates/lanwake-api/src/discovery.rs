// Discovery endpoints
//
// Start/stop a backend network scan and read its progress snapshot.

use tracing::debug;

use crate::client::BackendClient;
use crate::error::Error;
use crate::models::DiscoveryStatusRecord;

impl BackendClient {
    /// Begin a network scan.
    ///
    /// `POST /discover/start`. A scan already in progress comes back as
    /// [`Error::Backend`] carrying the backend's message.
    pub async fn start_discovery(&self) -> Result<(), Error> {
        debug!("starting discovery");
        let _: serde_json::Value = self.post_json("discover/start").await?;
        Ok(())
    }

    /// End the running scan. Any JSON body is accepted.
    ///
    /// `POST /discover/stop`
    pub async fn stop_discovery(&self) -> Result<serde_json::Value, Error> {
        debug!("stopping discovery");
        self.post_json("discover/stop").await
    }

    /// Current scan snapshot.
    ///
    /// `GET /discover/status`
    pub async fn discovery_status(&self) -> Result<DiscoveryStatusRecord, Error> {
        self.get_json("discover/status").await
    }
}
