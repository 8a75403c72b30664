// ── Device status poller ──
//
// Recurring `GET /status` while at least one status indicator is
// rendered, plus one early fetch shortly after (re)start. The gate is
// evaluated at restart time only, so every change to the rendered device
// set must call `restart_status_monitoring`.

use tracing::{debug, warn};

use crate::controller::Dashboard;
use crate::error::CoreError;
use crate::polling::{PollControl, PollKind, Schedule};

impl Dashboard {
    /// Cancel the status timer and start a new one if any indicator is
    /// rendered. Returns whether monitoring is now running.
    pub async fn restart_status_monitoring(&self) -> bool {
        let polling = &self.inner.polling;
        polling.stop(PollKind::Status).await;

        let has_indicators = self.inner.model.borrow().has_indicators();
        if !has_indicators {
            debug!("no devices rendered, status monitoring idle");
            return false;
        }

        let config = &self.inner.config;
        let schedule =
            Schedule::every(config.status_poll_interval).with_lead(config.status_initial_delay);
        let dashboard = self.clone();
        polling
            .start(PollKind::Status, schedule, move |_| {
                let dashboard = dashboard.clone();
                async move {
                    dashboard.refresh_statuses_quietly().await;
                    PollControl::Continue
                }
            })
            .await;
        true
    }

    /// Status refresh whose failure is already logged; the next tick retries.
    pub(crate) async fn refresh_statuses_quietly(&self) {
        if self.refresh_statuses().await.is_err() {
            debug!("status refresh skipped, keeping current indicators");
        }
    }

    /// Fetch statuses once and apply them to the rendered indicators.
    /// Indicators missing from the response keep their value. Returns how
    /// many indicators changed.
    pub async fn refresh_statuses(&self) -> Result<usize, CoreError> {
        let statuses = self
            .inner
            .backend
            .device_statuses()
            .await
            .inspect_err(|e| warn!(error = %e, "status fetch failed"))?;

        let mut changed = 0;
        self.inner
            .model
            .send_modify(|model| changed = model.apply_statuses(&statuses));
        let indicators = self.inner.model.borrow().indicators().clone();
        self.inner.renderer.render_status(&indicators);
        debug!(reported = statuses.len(), changed, "statuses applied");
        Ok(changed)
    }
}
