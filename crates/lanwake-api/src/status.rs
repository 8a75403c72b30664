// Device status endpoint

use std::collections::HashMap;

use tracing::debug;

use crate::client::BackendClient;
use crate::error::Error;

impl BackendClient {
    /// Per-device reachability, keyed by device id.
    ///
    /// `GET /status` → `{ "<id>": "online" | "offline" | "unknown" | ... }`.
    /// Values are passed through untyped; the set is open-ended.
    pub async fn device_statuses(&self) -> Result<HashMap<String, String>, Error> {
        debug!("fetching device statuses");
        self.get_json("status").await
    }
}
