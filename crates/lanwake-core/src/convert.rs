// ── API-to-domain type conversions ──
//
// Bridges raw `lanwake_api` wire records into `lanwake_core::model` types:
// MACs are normalized, empty optional strings become `None`, and status
// strings become `DeviceStatus`.

use std::collections::HashMap;

use tracing::warn;

use lanwake_api::{DeviceRecord, DiscoveredRecord, DiscoveryStatusRecord};

use crate::model::{
    DeviceForm, DeviceId, DeviceStatus, DiscoveredDevice, DiscoverySession, MacAddress,
    ManagedDevice, StatusMap,
};

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

// ── Managed devices ────────────────────────────────────────────────

impl From<DeviceRecord> for ManagedDevice {
    fn from(r: DeviceRecord) -> Self {
        Self {
            id: DeviceId::new(r.id),
            name: r.name,
            mac: MacAddress::new(&r.mac),
            ip: non_empty(r.ip),
            description: non_empty(r.description),
            last_wake: non_empty(r.last_wake),
        }
    }
}

impl From<&DeviceForm> for lanwake_api::DeviceForm {
    fn from(f: &DeviceForm) -> Self {
        Self {
            name: f.name.clone(),
            mac: f.mac.clone(),
            ip: f.ip.clone(),
            description: f.description.clone(),
        }
    }
}

// ── Discovery ──────────────────────────────────────────────────────

impl From<DiscoveredRecord> for DiscoveredDevice {
    fn from(r: DiscoveredRecord) -> Self {
        Self {
            mac: MacAddress::new(&r.mac),
            ip: r.ip,
            already_imported: r.already_imported,
        }
    }
}

/// The device list is authoritative. A `count` that disagrees with it is
/// logged and replaced, so `count == devices.len()` always holds after a
/// snapshot is applied.
impl From<DiscoveryStatusRecord> for DiscoverySession {
    fn from(r: DiscoveryStatusRecord) -> Self {
        let devices: Vec<DiscoveredDevice> = r.devices.into_iter().map(Into::into).collect();
        let reported = usize::try_from(r.count).unwrap_or(usize::MAX);
        if reported != devices.len() {
            warn!(
                reported,
                listed = devices.len(),
                "discovery count disagrees with device list, using list length"
            );
        }
        Self {
            active: r.active,
            count: devices.len(),
            devices,
        }
    }
}

// ── Status ─────────────────────────────────────────────────────────

pub(crate) fn status_map(raw: HashMap<String, String>) -> StatusMap {
    raw.into_iter()
        .map(|(id, status)| (DeviceId::new(id), DeviceStatus::from(status)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(mac: &str, ip: &str, already_imported: bool) -> DiscoveredRecord {
        DiscoveredRecord {
            mac: mac.into(),
            ip: ip.into(),
            already_imported,
        }
    }

    #[test]
    fn count_follows_device_list() {
        let session = DiscoverySession::from(DiscoveryStatusRecord {
            active: true,
            count: 7,
            devices: vec![
                record("aa:bb:cc:dd:ee:01", "192.168.1.50", false),
                record("aa:bb:cc:dd:ee:02", "192.168.1.51", true),
            ],
        });
        assert!(session.active);
        assert_eq!(session.count, 2);
        assert_eq!(session.devices[0].mac.as_str(), "AA:BB:CC:DD:EE:01");
        assert!(session.devices[1].already_imported);
    }

    #[test]
    fn empty_optionals_become_none() {
        let device = ManagedDevice::from(DeviceRecord {
            id: "a1b2c3d4".into(),
            name: "NAS".into(),
            mac: "aa-bb-cc-dd-ee-ff".into(),
            ip: Some(String::new()),
            description: Some("  ".into()),
            created_at: None,
            last_wake: Some("2024-06-15T10:30:00".into()),
        });
        assert_eq!(device.id.as_str(), "a1b2c3d4");
        assert_eq!(device.mac.as_str(), "AA:BB:CC:DD:EE:FF");
        assert_eq!(device.ip, None);
        assert_eq!(device.description, None);
        assert_eq!(device.last_wake.as_deref(), Some("2024-06-15T10:30:00"));
    }

    #[test]
    fn status_map_keeps_unknown_values() {
        let raw = HashMap::from([
            ("a1".to_owned(), "online".to_owned()),
            ("b2".to_owned(), "napping".to_owned()),
        ]);
        let map = status_map(raw);
        assert_eq!(map[&DeviceId::from("a1")], DeviceStatus::Online);
        assert_eq!(map[&DeviceId::from("b2")], DeviceStatus::Other("napping".into()));
    }
}
