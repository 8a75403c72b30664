// ── Named polling timers ──
//
// One slot per `PollKind`. Starting a slot cancels whatever occupied it,
// so two timers of the same kind never coexist. Each slot is a spawned
// task driven by `tokio::time::interval` and a `CancellationToken`. Each
// tick receives the slot's token so a result that lands after the slot
// was stopped or replaced can be recognised and dropped.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

/// Timer slots. At most one live timer per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PollKind {
    Discovery,
    Status,
}

/// Returned by each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollControl {
    Continue,
    /// End the loop and free the slot.
    Stop,
}

/// When a slot ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Recurring period. The first periodic tick fires one period after start.
    pub period: Duration,
    /// Optional extra one-shot tick this long after start.
    pub lead: Option<Duration>,
}

impl Schedule {
    pub fn every(period: Duration) -> Self {
        Self { period, lead: None }
    }

    pub fn with_lead(mut self, lead: Duration) -> Self {
        self.lead = Some(lead);
        self
    }
}

struct Slot {
    generation: u64,
    cancel: CancellationToken,
    /// Cancelled when the slot's task exits.
    done: CancellationToken,
}

#[derive(Default)]
struct PollingInner {
    slots: Mutex<HashMap<PollKind, Slot>>,
    generation: AtomicU64,
}

/// Owner of every polling timer. Cheaply cloneable.
#[derive(Clone, Default)]
pub struct PollingManager {
    inner: Arc<PollingInner>,
}

impl PollingManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any timer of `kind`, then start a new one calling `tick` on
    /// `schedule`. `tick` is handed the slot's cancellation token.
    pub async fn start<F, Fut>(&self, kind: PollKind, schedule: Schedule, tick: F)
    where
        F: FnMut(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = PollControl> + Send + 'static,
    {
        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let cancel = CancellationToken::new();
        let done = CancellationToken::new();

        let mut slots = self.inner.slots.lock().await;
        if let Some(old) = slots.insert(
            kind,
            Slot {
                generation,
                cancel: cancel.clone(),
                done: done.clone(),
            },
        ) {
            old.cancel.cancel();
            debug!(%kind, "replaced running poller");
        }
        drop(slots);

        debug!(%kind, period_ms = schedule.period.as_millis(), "poller started");
        tokio::spawn(run_slot(
            Arc::clone(&self.inner),
            kind,
            generation,
            schedule,
            cancel,
            done.drop_guard(),
            tick,
        ));
    }

    /// Cancel the timer of `kind`. A tick already in flight still completes
    /// but sees its token cancelled. Returns whether a timer was running.
    pub async fn stop(&self, kind: PollKind) -> bool {
        let removed = self.inner.slots.lock().await.remove(&kind);
        match removed {
            Some(slot) => {
                slot.cancel.cancel();
                debug!(%kind, "poller stopped");
                true
            }
            None => false,
        }
    }

    pub async fn is_running(&self, kind: PollKind) -> bool {
        self.inner.slots.lock().await.contains_key(&kind)
    }

    /// Resolve once the current timer of `kind` has ended, by stop or by
    /// its own `PollControl::Stop`. Immediate if none is running.
    pub async fn wait(&self, kind: PollKind) {
        let done = self
            .inner
            .slots
            .lock()
            .await
            .get(&kind)
            .map(|slot| slot.done.clone());
        if let Some(done) = done {
            done.cancelled().await;
        }
    }

    pub async fn stop_all(&self) {
        let mut slots = self.inner.slots.lock().await;
        for (kind, slot) in slots.drain() {
            slot.cancel.cancel();
            debug!(%kind, "poller stopped");
        }
    }
}

async fn run_slot<F, Fut>(
    inner: Arc<PollingInner>,
    kind: PollKind,
    generation: u64,
    schedule: Schedule,
    cancel: CancellationToken,
    _done: DropGuard,
    mut tick: F,
) where
    F: FnMut(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = PollControl> + Send + 'static,
{
    let started = Instant::now();
    let mut interval = tokio::time::interval_at(started + schedule.period, schedule.period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let lead = tokio::time::sleep_until(started + schedule.lead.unwrap_or_default());
    tokio::pin!(lead);
    let mut lead_pending = schedule.lead.is_some();

    loop {
        let control = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = &mut lead, if lead_pending => {
                lead_pending = false;
                tick(cancel.clone()).await
            }
            _ = interval.tick() => tick(cancel.clone()).await,
        };
        if control == PollControl::Stop {
            debug!(%kind, "poller finished");
            break;
        }
    }

    let mut slots = inner.slots.lock().await;
    if slots.get(&kind).is_some_and(|slot| slot.generation == generation) {
        slots.remove(&kind);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter_tick(
        hits: &Arc<AtomicUsize>,
        stop_after: usize,
    ) -> impl FnMut(CancellationToken) -> std::future::Ready<PollControl> + Send + 'static {
        let hits = Arc::clone(hits);
        move |_| {
            let n = hits.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(if n >= stop_after {
                PollControl::Stop
            } else {
                PollControl::Continue
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_one_period() {
        let polling = PollingManager::new();
        let hits = Arc::new(AtomicUsize::new(0));
        polling
            .start(
                PollKind::Discovery,
                Schedule::every(Duration::from_secs(2)),
                counter_tick(&hits, usize::MAX),
            )
            .await;

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        polling.stop_all().await;
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_a_slot_leaves_one_timer() {
        let polling = PollingManager::new();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            polling
                .start(
                    PollKind::Discovery,
                    Schedule::every(Duration::from_secs(2)),
                    counter_tick(&hits, usize::MAX),
                )
                .await;
        }

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(polling.is_running(PollKind::Discovery).await);
        polling.stop_all().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_control_frees_the_slot() {
        let polling = PollingManager::new();
        let hits = Arc::new(AtomicUsize::new(0));
        polling
            .start(
                PollKind::Discovery,
                Schedule::every(Duration::from_secs(2)),
                counter_tick(&hits, 2),
            )
            .await;

        polling.wait(PollKind::Discovery).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        tokio::task::yield_now().await;
        assert!(!polling.is_running(PollKind::Discovery).await);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn lead_tick_fires_before_first_period() {
        let polling = PollingManager::new();
        let hits = Arc::new(AtomicUsize::new(0));
        polling
            .start(
                PollKind::Status,
                Schedule::every(Duration::from_secs(30)).with_lead(Duration::from_secs(5)),
                counter_tick(&hits, usize::MAX),
            )
            .await;

        tokio::time::sleep(Duration::from_millis(5001)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        polling.stop_all().await;
    }

    #[tokio::test(start_paused = true)]
    async fn slots_are_independent() {
        let polling = PollingManager::new();
        let discovery = Arc::new(AtomicUsize::new(0));
        let status = Arc::new(AtomicUsize::new(0));
        polling
            .start(
                PollKind::Discovery,
                Schedule::every(Duration::from_secs(2)),
                counter_tick(&discovery, usize::MAX),
            )
            .await;
        polling
            .start(
                PollKind::Status,
                Schedule::every(Duration::from_secs(3)),
                counter_tick(&status, usize::MAX),
            )
            .await;

        assert!(polling.stop(PollKind::Discovery).await);
        assert!(!polling.stop(PollKind::Discovery).await);
        tokio::time::sleep(Duration::from_millis(3100)).await;
        assert_eq!(discovery.load(Ordering::SeqCst), 0);
        assert_eq!(status.load(Ordering::SeqCst), 1);
        assert!(polling.is_running(PollKind::Status).await);
        polling.stop_all().await;
        assert!(!polling.is_running(PollKind::Status).await);
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_tick_sees_stop() {
        let polling = PollingManager::new();
        let (tx, rx) = tokio::sync::oneshot::channel();
        let mut tx = Some(tx);
        polling
            .start(
                PollKind::Discovery,
                Schedule::every(Duration::from_secs(2)),
                move |cancel: CancellationToken| {
                    let tx = tx.take();
                    async move {
                        tokio::time::sleep(Duration::from_secs(3)).await;
                        if let Some(tx) = tx {
                            let _ = tx.send(cancel.is_cancelled());
                        }
                        PollControl::Continue
                    }
                },
            )
            .await;

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert!(polling.stop(PollKind::Discovery).await);
        assert!(rx.await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_without_timer_returns_immediately() {
        let polling = PollingManager::new();
        polling.wait(PollKind::Status).await;
        assert!(!polling.is_running(PollKind::Status).await);
    }
}
