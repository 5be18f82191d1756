//! Poll loop: a fixed recurring timer plus a one-shot retry after failures.
//!
//! Cycles are independent tasks. A slow request does not hold back the next
//! tick, so responses can overlap; `ResponseOrdering` decides what happens
//! when they arrive out of order.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::dashboard::{Applied, Dashboard, Redraw};
use crate::api::signal::{ApiError, SignalClient};
use crate::display::{ChartCanvas, DisplaySurface};
use crate::models::Snapshot;

/// Anything that can produce a snapshot on demand
pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, ApiError>> + Send;
}

impl SnapshotSource for SignalClient {
    fn fetch_snapshot(&self) -> impl Future<Output = Result<Snapshot, ApiError>> + Send {
        self.get_snapshot()
    }
}

/// What a single cycle ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Updated,
    Failed { retry_scheduled: bool },
    /// A newer cycle had already been applied
    Stale,
}

struct Shared<F, S, C> {
    source: F,
    dashboard: Mutex<Dashboard<S, C>>,
    next_cycle: AtomicU64,
    retry_pending: AtomicBool,
    poll_interval: Duration,
    retry_delay: Duration,
}

pub struct Poller<F, S, C> {
    shared: Arc<Shared<F, S, C>>,
}

impl<F, S, C> Clone for Poller<F, S, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<F, S, C> Poller<F, S, C>
where
    F: SnapshotSource,
    S: DisplaySurface + Send + 'static,
    C: ChartCanvas + Send + 'static,
{
    pub fn new(source: F, dashboard: Dashboard<S, C>, poll_interval: Duration, retry_delay: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                dashboard: Mutex::new(dashboard),
                next_cycle: AtomicU64::new(1),
                retry_pending: AtomicBool::new(false),
                poll_interval,
                retry_delay,
            }),
        }
    }

    #[cfg(test)]
    pub fn dashboard(&self) -> &Mutex<Dashboard<S, C>> {
        &self.shared.dashboard
    }

    #[cfg(test)]
    pub fn retry_pending(&self) -> bool {
        self.shared.retry_pending.load(Ordering::SeqCst)
    }

    /// Run forever: one cycle immediately, then one per poll interval
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.shared.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.spawn_cycle();
        }
    }

    /// Start a cycle in its own task
    pub fn spawn_cycle(&self) -> JoinHandle<CycleOutcome> {
        let poller = self.clone();
        tokio::spawn(async move { poller.run_cycle().await })
    }

    /// One fetch-and-render pass
    pub async fn run_cycle(&self) -> CycleOutcome {
        let seq = self.shared.next_cycle.fetch_add(1, Ordering::SeqCst);
        debug!("Starting poll cycle {}", seq);

        self.shared.dashboard.lock().await.show_loading();

        let result = self.shared.source.fetch_snapshot().await;

        let (outcome, redraw) = {
            let mut dashboard = self.shared.dashboard.lock().await;
            match result {
                Ok(snapshot) => {
                    let now = chrono::Local::now().time();
                    match dashboard.apply_snapshot(seq, &snapshot, now) {
                        Applied::Updated { chart, flash } => {
                            if let Some(change) = chart.filter(|c| c.from != c.to) {
                                info!("Chart {:?} -> {:?}", change.from, change.to);
                            }
                            if let Some(flash) = flash {
                                self.schedule_flash_end(flash);
                            }
                            (CycleOutcome::Updated, dashboard.take_redraw())
                        }
                        Applied::Stale => (CycleOutcome::Stale, None),
                    }
                }
                Err(e) => {
                    error!("API error (cycle {}): {}", seq, e);
                    if dashboard.show_error(seq, &e.to_string()) {
                        let retry_scheduled = self.schedule_retry();
                        (CycleOutcome::Failed { retry_scheduled }, None)
                    } else {
                        (CycleOutcome::Stale, None)
                    }
                }
            }
        };

        if let Some(redraw) = redraw {
            Self::redraw(redraw).await;
        }

        match outcome {
            CycleOutcome::Updated => info!("Data updated successfully (cycle {})", seq),
            CycleOutcome::Failed { retry_scheduled: true } => {
                info!("Cycle {} failed, retrying in {:?}", seq, self.shared.retry_delay)
            }
            CycleOutcome::Failed { retry_scheduled: false } => {
                debug!("Cycle {} failed, a retry is already pending", seq)
            }
            CycleOutcome::Stale => debug!("Cycle {} superseded by a newer one", seq),
        }
        outcome
    }

    /// Draw the chart on the blocking pool, off the dashboard lock
    async fn redraw(redraw: Redraw<C>) {
        match tokio::task::spawn_blocking(move || redraw.run()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!("Failed to redraw chart: {}", e),
            Err(e) => error!("Chart redraw task failed: {}", e),
        }
    }

    /// Queue one extra cycle after the retry delay, unless one is already queued
    fn schedule_retry(&self) -> bool {
        if self
            .shared
            .retry_pending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        let poller = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(poller.shared.retry_delay).await;
            poller.shared.retry_pending.store(false, Ordering::SeqCst);
            poller.run_cycle().await;
        });
        true
    }

    /// Present the panel again once the price flash has run out
    fn schedule_flash_end(&self, after: Duration) {
        if after.is_zero() {
            return;
        }

        let poller = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            poller.shared.dashboard.lock().await.present();
        });
    }
}
