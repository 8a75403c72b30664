// ── Render model and UI collaborators ──
//
// `RenderModel` is the explicit record of what is on screen: the device
// list and one status indicator per device. The status poller asks it
// whether anything is worth polling. `Renderer` and `Notifier` are the
// front-end's side of the contract.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{
    DeviceForm, DeviceId, DeviceStatus, DiscoverySession, ManagedDevice, StatusMap,
};

// ── RenderModel ─────────────────────────────────────────────────────

/// Devices currently rendered, with their status indicators in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderModel {
    devices: Vec<ManagedDevice>,
    indicators: IndexMap<DeviceId, DeviceStatus>,
}

impl RenderModel {
    /// Fresh model for a full list render. Every indicator starts `Unknown`.
    pub fn from_devices(devices: Vec<ManagedDevice>) -> Self {
        let indicators = devices
            .iter()
            .map(|d| (d.id.clone(), DeviceStatus::Unknown))
            .collect();
        Self {
            devices,
            indicators,
        }
    }

    pub fn devices(&self) -> &[ManagedDevice] {
        &self.devices
    }

    pub fn indicators(&self) -> &IndexMap<DeviceId, DeviceStatus> {
        &self.indicators
    }

    /// Gate for status monitoring.
    pub fn has_indicators(&self) -> bool {
        !self.indicators.is_empty()
    }

    pub fn status_of(&self, id: &DeviceId) -> Option<&DeviceStatus> {
        self.indicators.get(id)
    }

    pub fn device(&self, id: &DeviceId) -> Option<&ManagedDevice> {
        self.devices.iter().find(|d| &d.id == id)
    }

    /// Update indicators that have an entry in `statuses`. Indicators
    /// without one keep their current value. Returns how many changed.
    pub fn apply_statuses(&mut self, statuses: &StatusMap) -> usize {
        let mut changed = 0;
        for (id, current) in &mut self.indicators {
            if let Some(next) = statuses.get(id) {
                if current != next {
                    current.clone_from(next);
                    changed += 1;
                }
            }
        }
        changed
    }
}

// ── Collaborators ───────────────────────────────────────────────────

/// Turns state snapshots into UI. Every method must be idempotent and
/// accept empty data.
pub trait Renderer: Send + Sync {
    fn render_device_list(&self, devices: &[ManagedDevice]);

    fn render_discovery(&self, session: &DiscoverySession);

    fn render_status(&self, indicators: &IndexMap<DeviceId, DeviceStatus>);

    /// Drop previously rendered discovery results (a new scan is starting).
    fn clear_discovered(&self) {}

    fn open_import_form(&self, _form: &DeviceForm) {}

    fn close_import_form(&self) {}

    fn set_discovery_view(&self, _visible: bool) {}
}

/// Interruptive user notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Success(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Self::Info(m) | Self::Success(m) | Self::Error(m) => m,
        }
    }
}

/// Blocking user dialogs: alerts and yes/no confirmations.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: Notice);

    async fn confirm(&self, prompt: &str) -> bool;
}
