// ── Discovery session types ──

use serde::{Deserialize, Serialize};

use super::entity_id::MacAddress;

/// One device found by a backend scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredDevice {
    pub mac: MacAddress,
    pub ip: String,
    /// Set by the backend when a persisted device already has this MAC.
    pub already_imported: bool,
}

/// Client-side mirror of the backend's discovery session.
///
/// Replaced wholesale by every snapshot: the backend list always wins,
/// devices are never merged across polls. `Default` is the idle state
/// (inactive, nothing found).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySession {
    pub active: bool,
    pub count: usize,
    pub devices: Vec<DiscoveredDevice>,
}

impl DiscoverySession {
    /// Devices not yet imported, in discovery order.
    pub fn new_devices(&self) -> impl Iterator<Item = &DiscoveredDevice> {
        self.devices.iter().filter(|d| !d.already_imported)
    }

    /// Drives whether a bulk import is offered.
    pub fn new_device_count(&self) -> usize {
        self.new_devices().count()
    }

    pub fn has_results(&self) -> bool {
        !self.devices.is_empty()
    }

    /// Same results, marked as no longer scanning.
    pub fn into_inactive(mut self) -> Self {
        self.active = false;
        self
    }
}
