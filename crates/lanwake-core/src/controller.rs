// ── Dashboard facade ──
//
// Owns the backend handle, UI collaborators, polling timers, and the two
// pieces of observable state: the render model and the latest discovery
// snapshot. Operations live in `discovery`, `import`, `status` and
// `devices` as further `impl Dashboard` blocks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, info};

use lanwake_api::BackendClient;

use crate::backend::Backend;
use crate::config::DashboardConfig;
use crate::error::CoreError;
use crate::model::DiscoverySession;
use crate::polling::PollingManager;
use crate::render::{Notice, Notifier, RenderModel, Renderer};

/// The main entry point for front-ends.
///
/// Cheaply cloneable via `Arc<DashboardInner>`. Timer tasks hold clones,
/// so call [`shutdown()`](Self::shutdown) to release them.
#[derive(Clone)]
pub struct Dashboard {
    pub(crate) inner: Arc<DashboardInner>,
}

pub(crate) struct DashboardInner {
    pub(crate) config: DashboardConfig,
    pub(crate) backend: Arc<dyn Backend>,
    pub(crate) renderer: Arc<dyn Renderer>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) polling: PollingManager,
    pub(crate) model: watch::Sender<RenderModel>,
    pub(crate) discovery: watch::Sender<DiscoverySession>,
    pub(crate) discovery_view: AtomicBool,
}

impl Dashboard {
    /// Assemble a dashboard around an existing backend. Starts nothing;
    /// call [`initialize()`](Self::initialize) for the first render.
    pub fn new(
        config: DashboardConfig,
        backend: Arc<dyn Backend>,
        renderer: Arc<dyn Renderer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (model, _) = watch::channel(RenderModel::default());
        let (discovery, _) = watch::channel(DiscoverySession::default());

        Self {
            inner: Arc::new(DashboardInner {
                config,
                backend,
                renderer,
                notifier,
                polling: PollingManager::new(),
                model,
                discovery,
                discovery_view: AtomicBool::new(false),
            }),
        }
    }

    /// Build the HTTP backend from `config` and assemble a dashboard on it.
    pub fn connect(
        config: DashboardConfig,
        renderer: Arc<dyn Renderer>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, CoreError> {
        let client = BackendClient::new(config.backend_url.clone(), &config.transport())?;
        debug!(url = %config.backend_url, "backend client ready");
        Ok(Self::new(config, Arc::new(client), renderer, notifier))
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn polling(&self) -> &PollingManager {
        &self.inner.polling
    }

    // ── Observable state ─────────────────────────────────────────────

    pub fn render_model(&self) -> RenderModel {
        self.inner.model.borrow().clone()
    }

    pub fn subscribe_render_model(&self) -> watch::Receiver<RenderModel> {
        self.inner.model.subscribe()
    }

    /// Latest discovery snapshot received from the backend.
    pub fn discovery_snapshot(&self) -> DiscoverySession {
        self.inner.discovery.borrow().clone()
    }

    pub fn subscribe_discovery(&self) -> watch::Receiver<DiscoverySession> {
        self.inner.discovery.subscribe()
    }

    pub fn is_discovery_view_open(&self) -> bool {
        self.inner.discovery_view.load(Ordering::Relaxed)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// First render: loads the device list, which in turn starts status
    /// monitoring when there is at least one device.
    pub async fn initialize(&self) -> Result<(), CoreError> {
        self.refresh_device_list().await?;
        info!(
            devices = self.inner.model.borrow().devices().len(),
            "dashboard initialized"
        );
        Ok(())
    }

    /// Cancel every timer. In-flight requests finish on their own.
    pub async fn shutdown(&self) {
        self.inner.polling.stop_all().await;
        debug!("dashboard shut down");
    }

    // ── Shared helpers ───────────────────────────────────────────────

    pub(crate) fn publish_discovery(&self, session: DiscoverySession) {
        self.inner.renderer.render_discovery(&session);
        self.inner.discovery.send_replace(session);
    }

    pub(crate) async fn notify(&self, notice: Notice) {
        self.inner.notifier.notify(notice).await;
    }
}
