// ── Managed device domain types ──

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::entity_id::{DeviceId, MacAddress};

/// Reachability of a managed device as reported by `GET /status`.
///
/// Open-ended: values the backend introduces later are kept verbatim in
/// [`DeviceStatus::Other`] rather than collapsed into `Unknown`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceStatus {
    Online,
    Offline,
    #[default]
    Unknown,
    Other(String),
}

impl DeviceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

impl From<String> for DeviceStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "online" => Self::Online,
            "offline" => Self::Offline,
            "unknown" => Self::Unknown,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for DeviceStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_owned())
    }
}

impl From<DeviceStatus> for String {
    fn from(status: DeviceStatus) -> Self {
        match status {
            DeviceStatus::Other(raw) => raw,
            other => other.as_str().to_owned(),
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status response keyed by device id.
pub type StatusMap = HashMap<DeviceId, DeviceStatus>;

/// A device persisted by the backend. The client only ever holds a
/// transient copy obtained from a full-list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedDevice {
    pub id: DeviceId,
    pub name: String,
    pub mac: MacAddress,
    pub ip: Option<String>,
    pub description: Option<String>,
    /// Raw ISO-8601 timestamp of the last wake, as stored by the backend.
    pub last_wake: Option<String>,
}

impl ManagedDevice {
    /// Parsed last-wake time. `None` if absent or not ISO-8601.
    pub fn last_wake_at(&self) -> Option<NaiveDateTime> {
        let raw = self.last_wake.as_deref()?;
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }

    /// `YYYY-MM-DD HH:MM:SS` rendering of the last wake.
    pub fn last_wake_display(&self) -> Option<String> {
        if let Some(at) = self.last_wake_at() {
            return Some(at.format("%Y-%m-%d %H:%M:%S").to_string());
        }
        self.last_wake
            .as_deref()
            .map(|raw| raw.chars().take(19).collect::<String>().replace('T', " "))
    }
}

/// Fields submitted when creating or editing a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceForm {
    pub name: String,
    pub mac: String,
    pub ip: String,
    pub description: String,
}

impl DeviceForm {
    /// Pre-filled form for importing a discovered device.
    pub fn for_discovered(mac: &MacAddress, ip: &str) -> Self {
        Self {
            name: default_device_name(ip),
            mac: mac.to_string(),
            ip: ip.to_owned(),
            description: String::new(),
        }
    }

    /// Name and MAC are the only required fields.
    pub fn missing_required(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("name")
        } else if self.mac.trim().is_empty() {
            Some("mac")
        } else {
            None
        }
    }
}

/// Default name for an imported device: `"Device-"` followed by the last
/// dot-separated segment of its IPv4 address (`192.168.1.50` → `Device-50`).
pub fn default_device_name(ip: &str) -> String {
    let last = ip.rsplit('.').next().unwrap_or(ip);
    format!("Device-{last}")
}
