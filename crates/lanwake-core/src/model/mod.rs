// ── Domain model ──

pub mod device;
pub mod discovery;
pub mod entity_id;

pub use device::{DeviceForm, DeviceStatus, ManagedDevice, StatusMap, default_device_name};
pub use discovery::{DiscoveredDevice, DiscoverySession};
pub use entity_id::{DeviceId, MacAddress};
