// ── Discovery session lifecycle ──
//
// Start, poll, stop and re-check of the backend scan. The client mirrors
// backend state: every snapshot replaces the previous one wholesale, and
// the discovery timer runs only while the backend reports an active scan.

use std::sync::atomic::Ordering;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::controller::Dashboard;
use crate::model::DiscoverySession;
use crate::polling::{PollControl, PollKind, Schedule};
use crate::render::Notice;

pub(crate) const START_FAILED: &str = "Failed to start device discovery";

/// Result of [`Dashboard::start_discovery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Scan running, polling started.
    Started,
    /// The backend refused, e.g. a scan is already in progress.
    Rejected { message: String },
    /// No usable response from the backend.
    Failed,
}

impl Dashboard {
    /// Ask the backend to start scanning. On success the previously
    /// rendered results are cleared and the discovery timer starts.
    pub async fn start_discovery(&self) -> StartOutcome {
        match self.inner.backend.start_discovery().await {
            Ok(()) => {
                self.inner.renderer.clear_discovered();
                self.start_discovery_polling().await;
                info!("discovery started");
                StartOutcome::Started
            }
            Err(e) => {
                if let Some(message) = e.backend_message() {
                    let message = message.to_owned();
                    warn!(%message, "backend refused to start discovery");
                    self.notify(Notice::Error(message.clone())).await;
                    StartOutcome::Rejected { message }
                } else {
                    warn!(error = %e, "failed to start discovery");
                    self.notify(Notice::Error(START_FAILED.into())).await;
                    StartOutcome::Failed
                }
            }
        }
    }

    /// Timer body: fetch and render one snapshot. Returns `Stop` once the
    /// backend reports the scan inactive. A failed fetch skips the render
    /// and keeps the timer alive. A snapshot arriving after `cancel` fired
    /// belongs to a stopped or replaced timer and is dropped.
    pub async fn poll_discovery(&self, cancel: &CancellationToken) -> PollControl {
        match self.inner.backend.discovery_status().await {
            Ok(_) if cancel.is_cancelled() => {
                debug!("discovery poller stopped while fetching, dropping snapshot");
                PollControl::Stop
            }
            Ok(session) => {
                let active = session.active;
                debug!(active, count = session.count, "discovery poll");
                self.publish_discovery(session);
                if active {
                    PollControl::Continue
                } else {
                    info!("discovery finished");
                    PollControl::Stop
                }
            }
            Err(e) => {
                warn!(error = %e, "discovery poll failed, retrying next tick");
                PollControl::Continue
            }
        }
    }

    /// Ask the backend to stop, cancel the local timer whatever the answer,
    /// then render the final results as inactive. If they cannot be fetched
    /// an empty inactive snapshot is rendered instead.
    pub async fn stop_discovery(&self) -> DiscoverySession {
        if let Err(e) = self.inner.backend.stop_discovery().await {
            warn!(error = %e, "stop request failed");
        }
        self.inner.polling.stop(PollKind::Discovery).await;

        let session = match self.inner.backend.discovery_status().await {
            Ok(session) => session.into_inactive(),
            Err(e) => {
                warn!(error = %e, "could not fetch final discovery results");
                DiscoverySession::default()
            }
        };
        info!(count = session.count, "discovery stopped");
        self.publish_discovery(session.clone());
        session
    }

    /// Show the discovery view and render the backend's current session,
    /// which may be finished or still running from an earlier visit. If the
    /// backend cannot be reached an idle session is rendered and a running
    /// timer is left alone.
    pub async fn open_discovery_view(&self) -> DiscoverySession {
        self.inner.discovery_view.store(true, Ordering::Relaxed);
        self.inner.renderer.set_discovery_view(true);

        match self.inner.backend.discovery_status().await {
            Ok(session) => {
                self.publish_discovery(session.clone());
                self.track_session(&session).await;
                session
            }
            Err(e) => {
                warn!(error = %e, "could not check discovery status");
                let idle = DiscoverySession::default();
                self.publish_discovery(idle.clone());
                idle
            }
        }
    }

    /// Flip the discovery view. Returns whether it is now visible.
    pub async fn toggle_discovery_view(&self) -> bool {
        if self.is_discovery_view_open() {
            self.inner.discovery_view.store(false, Ordering::Relaxed);
            self.inner.renderer.set_discovery_view(false);
            false
        } else {
            self.open_discovery_view().await;
            true
        }
    }

    /// One-off snapshot fetch outside the timer, e.g. after an import.
    /// `None` if the backend could not be reached.
    pub async fn check_discovery_status(&self) -> Option<DiscoverySession> {
        match self.inner.backend.discovery_status().await {
            Ok(session) => {
                self.publish_discovery(session.clone());
                self.track_session(&session).await;
                Some(session)
            }
            Err(e) => {
                warn!(error = %e, "discovery status check failed");
                None
            }
        }
    }

    /// Keep the timer in step with a snapshot: running while the scan is
    /// active, absent otherwise.
    async fn track_session(&self, session: &DiscoverySession) {
        let polling = &self.inner.polling;
        if session.active {
            if !polling.is_running(PollKind::Discovery).await {
                debug!("resuming discovery polling for active scan");
                self.start_discovery_polling().await;
            }
        } else {
            polling.stop(PollKind::Discovery).await;
        }
    }

    async fn start_discovery_polling(&self) {
        let dashboard = self.clone();
        self.inner
            .polling
            .start(
                PollKind::Discovery,
                Schedule::every(self.inner.config.discovery_poll_interval),
                move |cancel| {
                    let dashboard = dashboard.clone();
                    async move { dashboard.poll_discovery(&cancel).await }
                },
            )
            .await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::CoreError;
    use crate::test_support::{Call, Harness, Rendered, session, unreachable};

    fn scanning() -> DiscoverySession {
        session(
            true,
            &[
                ("AA:BB:CC:DD:EE:01", "192.168.1.50", false),
                ("AA:BB:CC:DD:EE:02", "192.168.1.51", true),
                ("AA:BB:CC:DD:EE:03", "192.168.1.52", false),
            ],
        )
    }

    fn status_polls(h: &Harness) -> usize {
        h.backend.count(|c| *c == Call::DiscoveryStatus)
    }

    #[tokio::test(start_paused = true)]
    async fn starting_twice_keeps_a_single_poller() {
        let h = Harness::new();
        h.backend.script_discovery([Ok(scanning())]);

        assert_eq!(h.dashboard.start_discovery().await, StartOutcome::Started);
        assert_eq!(h.dashboard.start_discovery().await, StartOutcome::Started);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(status_polls(&h), 1);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(status_polls(&h), 2);
        h.dashboard.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn start_clears_previous_results_before_polling() {
        let h = Harness::new();
        h.backend.script_discovery([Ok(scanning())]);

        h.dashboard.start_discovery().await;
        assert_eq!(h.renderer.events(), vec![Rendered::ClearDiscovered]);
        assert!(h.dashboard.polling().is_running(PollKind::Discovery).await);
        h.dashboard.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn refused_start_shows_backend_message_and_never_polls() {
        let h = Harness::new();
        h.backend.set_start(Err(CoreError::Backend {
            message: "Discovery already in progress".into(),
            status: 400,
        }));

        let outcome = h.dashboard.start_discovery().await;

        assert_eq!(
            outcome,
            StartOutcome::Rejected {
                message: "Discovery already in progress".into()
            }
        );
        assert_eq!(
            h.notifier.notices(),
            vec![Notice::Error("Discovery already in progress".into())]
        );
        assert!(!h.dashboard.polling().is_running(PollKind::Discovery).await);
        assert!(h.renderer.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_start_shows_generic_message() {
        let h = Harness::new();
        h.backend.set_start(Err(unreachable()));

        assert_eq!(h.dashboard.start_discovery().await, StartOutcome::Failed);
        assert_eq!(h.notifier.notices(), vec![Notice::Error(START_FAILED.into())]);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(status_polls(&h), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn inactive_snapshot_ends_polling() {
        let h = Harness::new();
        h.backend
            .script_discovery([Ok(scanning()), Ok(scanning().into_inactive())]);

        h.dashboard.start_discovery().await;
        h.dashboard.polling().wait(PollKind::Discovery).await;

        let rendered = h.renderer.discoveries();
        assert_eq!(rendered.len(), 2);
        assert!(!rendered[1].active);
        assert!(!h.dashboard.polling().is_running(PollKind::Discovery).await);

        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(status_polls(&h), 2);
        assert_eq!(h.dashboard.discovery_snapshot(), scanning().into_inactive());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_poll_skips_render_and_retries() {
        let h = Harness::new();
        h.backend.script_discovery([
            Err(unreachable()),
            Ok(scanning()),
            Ok(scanning().into_inactive()),
        ]);

        h.dashboard.start_discovery().await;
        h.dashboard.polling().wait(PollKind::Discovery).await;

        assert_eq!(status_polls(&h), 3);
        assert_eq!(h.renderer.discoveries().len(), 2);
        assert!(h.notifier.notices().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_keeps_found_devices_marked_inactive() {
        let h = Harness::new();
        h.backend.script_discovery([Ok(scanning())]);
        h.dashboard.start_discovery().await;

        let last = h.dashboard.stop_discovery().await;

        assert!(!last.active);
        assert_eq!(last.count, 3);
        assert_eq!(h.renderer.last_discovery(), Some(last));
        assert!(!h.dashboard.polling().is_running(PollKind::Discovery).await);
        assert!(h.backend.calls().contains(&Call::StopDiscovery));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_with_failing_refetch_renders_empty_inactive() {
        let h = Harness::new();
        h.backend.set_stop(Err(unreachable()));
        h.backend.script_discovery([Err(unreachable())]);
        h.dashboard.start_discovery().await;

        let last = h.dashboard.stop_discovery().await;

        assert_eq!(last, DiscoverySession::default());
        assert_eq!(h.renderer.last_discovery(), Some(DiscoverySession::default()));
        assert!(!h.dashboard.polling().is_running(PollKind::Discovery).await);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(status_polls(&h), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn response_in_flight_at_stop_is_dropped() {
        let h = Harness::new();
        h.backend.set_discovery_delay(Duration::from_secs(1));
        h.backend.script_discovery([Ok(scanning())]);
        h.dashboard.start_discovery().await;

        // The 2 s tick is waiting on its response.
        tokio::time::sleep(Duration::from_millis(2500)).await;
        let last = h.dashboard.stop_discovery().await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(!last.active);
        assert_eq!(h.renderer.discoveries(), vec![last.clone()]);
        assert_eq!(h.dashboard.discovery_snapshot(), last);
        assert!(!h.dashboard.polling().is_running(PollKind::Discovery).await);
    }

    #[tokio::test(start_paused = true)]
    async fn late_tick_cannot_reactivate_a_stopped_scan() {
        let h = Harness::new();
        h.backend.set_discovery_delay(Duration::from_secs(3));
        h.backend.script_discovery([Ok(scanning())]);
        h.dashboard.start_discovery().await;

        // Tick fired at 2 s and waits until 5 s; the final fetch is immediate.
        tokio::time::sleep(Duration::from_millis(2100)).await;
        h.backend.set_discovery_delay(Duration::ZERO);
        let last = h.dashboard.stop_discovery().await;
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(status_polls(&h), 2);
        assert!(!h.dashboard.discovery_snapshot().active);
        assert_eq!(h.renderer.last_discovery(), Some(last));
        assert!(!h.dashboard.polling().is_running(PollKind::Discovery).await);
    }

    #[tokio::test(start_paused = true)]
    async fn late_tick_from_replaced_timer_is_dropped() {
        let h = Harness::new();
        h.backend.set_discovery_delay(Duration::from_secs(3));
        h.backend
            .script_discovery([Ok(scanning()), Ok(scanning().into_inactive())]);
        h.dashboard.start_discovery().await;

        // Restart while the first timer's tick is still waiting.
        tokio::time::sleep(Duration::from_millis(2100)).await;
        h.dashboard.start_discovery().await;
        // Old response lands at 5 s, the new timer's first one at 7.1 s.
        tokio::time::sleep(Duration::from_millis(3400)).await;

        assert!(h.renderer.discoveries().is_empty());
        assert!(h.dashboard.polling().is_running(PollKind::Discovery).await);
        h.dashboard.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn opening_view_on_active_scan_resumes_polling() {
        let h = Harness::new();
        h.backend.script_discovery([Ok(scanning())]);

        let shown = h.dashboard.open_discovery_view().await;

        assert!(shown.active);
        assert_eq!(shown.count, 3);
        assert!(h.dashboard.is_discovery_view_open());
        assert!(h.dashboard.polling().is_running(PollKind::Discovery).await);
        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(status_polls(&h), 2);
        h.dashboard.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn opening_view_on_finished_scan_renders_once() {
        let h = Harness::new();
        h.backend
            .script_discovery([Ok(scanning().into_inactive())]);

        h.dashboard.open_discovery_view().await;

        assert_eq!(
            h.renderer.events(),
            vec![
                Rendered::DiscoveryView(true),
                Rendered::Discovery(scanning().into_inactive()),
            ]
        );
        assert!(!h.dashboard.polling().is_running(PollKind::Discovery).await);
    }

    #[tokio::test(start_paused = true)]
    async fn opening_view_when_backend_is_down_renders_idle() {
        let h = Harness::new();
        h.backend.script_discovery([Err(unreachable())]);

        let shown = h.dashboard.open_discovery_view().await;

        assert_eq!(shown, DiscoverySession::default());
        assert_eq!(h.renderer.last_discovery(), Some(DiscoverySession::default()));
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_view_open_keeps_running_poller() {
        let h = Harness::new();
        h.backend.script_discovery([Ok(scanning())]);
        h.dashboard.start_discovery().await;

        h.backend
            .script_discovery([Err(unreachable()), Ok(scanning())]);
        let shown = h.dashboard.open_discovery_view().await;

        assert_eq!(shown, DiscoverySession::default());
        assert!(h.dashboard.polling().is_running(PollKind::Discovery).await);
        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(status_polls(&h), 2);
        assert_eq!(h.renderer.last_discovery(), Some(scanning()));
        h.dashboard.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn toggling_hides_without_fetching() {
        let h = Harness::new();

        assert!(h.dashboard.toggle_discovery_view().await);
        assert!(!h.dashboard.toggle_discovery_view().await);

        assert_eq!(status_polls(&h), 1);
        assert_eq!(
            h.renderer.events().last(),
            Some(&Rendered::DiscoveryView(false))
        );
        assert!(!h.dashboard.is_discovery_view_open());
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_checks_render_identical_snapshots() {
        let h = Harness::new();
        h.backend
            .script_discovery([Ok(scanning().into_inactive())]);

        let first = h.dashboard.check_discovery_status().await;
        let second = h.dashboard.check_discovery_status().await;

        assert_eq!(first, second);
        let rendered = h.renderer.discoveries();
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0], rendered[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn inactive_check_cancels_running_poller() {
        let h = Harness::new();
        h.backend.script_discovery([Ok(scanning())]);
        h.dashboard.start_discovery().await;

        h.backend
            .script_discovery([Ok(scanning().into_inactive())]);
        h.dashboard.check_discovery_status().await;

        assert!(!h.dashboard.polling().is_running(PollKind::Discovery).await);
    }
}
