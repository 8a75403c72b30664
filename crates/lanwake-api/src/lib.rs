// lanwake-api: Async Rust client for the lanwake device manager backend

pub mod client;
pub mod devices;
pub mod discovery;
pub mod error;
pub mod models;
pub mod status;
pub mod transport;

pub use client::BackendClient;
pub use error::Error;
pub use models::{
    DeviceForm, DeviceRecord, DiscoveredRecord, DiscoveryStatusRecord, FormOutcome,
};
pub use transport::{TlsMode, TransportConfig};
