//! Discovery and status synchronization for the lanwake device manager.
//!
//! This crate sits between `lanwake-api` and a front-end (the `lanwake`
//! CLI, or anything else implementing [`Renderer`] and [`Notifier`]):
//!
//! - **[`Dashboard`]**: central facade. Starts, polls and stops discovery
//!   scans, imports discovered devices one by one or in bulk, keeps device
//!   status indicators fresh, and performs device actions (add, wake,
//!   delete, update).
//!
//! - **[`PollingManager`]**: named timer slots ([`PollKind::Discovery`],
//!   [`PollKind::Status`]). Starting a slot always cancels the previous
//!   timer of that kind, so at most one of each is ever live.
//!
//! - **[`RenderModel`]**: what is currently on screen (devices plus one
//!   status indicator each). Status polling runs only while it has
//!   indicators.
//!
//! - **[`Backend`]**: the backend seam, implemented for
//!   [`lanwake_api::BackendClient`].
//!
//! - **Domain model** ([`model`]): `ManagedDevice`, `DiscoverySession`,
//!   `MacAddress` and friends.

pub mod backend;
pub mod config;
pub mod controller;
pub mod convert;
pub mod devices;
pub mod discovery;
pub mod error;
pub mod import;
pub mod model;
pub mod polling;
pub mod render;
pub mod status;

#[cfg(test)]
mod test_support;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{Backend, FormOutcome};
pub use config::{DashboardConfig, TlsVerification};
pub use controller::Dashboard;
pub use devices::DeviceAction;
pub use discovery::StartOutcome;
pub use error::CoreError;
pub use import::ImportOutcome;
pub use polling::{PollControl, PollKind, PollingManager, Schedule};
pub use render::{Notice, Notifier, RenderModel, Renderer};

pub use model::{
    DeviceForm, DeviceId, DeviceStatus, DiscoveredDevice, DiscoverySession, MacAddress,
    ManagedDevice, StatusMap, default_device_name,
};
