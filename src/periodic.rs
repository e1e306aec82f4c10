use crate::checks::{spawn_isolated, Check};
use crate::error::CheckError;
use crate::updater::{StatusUpdater, ThresholdStatusUpdater, Updater};
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

const MIN_PERIOD: Duration = Duration::from_millis(1);
const MAX_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Background task feeding the result of a check into an updater on every
/// tick. The task ends when [`Ticker::stop`] is called or the ticker is dropped.
struct Ticker {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Ticker {
    fn spawn(check: Arc<dyn Check>, period: Duration, updater: Arc<dyn Updater>) -> Self {
        // The interval panics on a zero period and on a start past the end of time.
        let period = period.clamp(MIN_PERIOD, MAX_PERIOD);
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticks.tick() => {
                        let result = spawn_isolated(check.clone()).await;
                        if let Err(e) = &result {
                            debug!("Periodic check failed: {}", e);
                        }
                        updater.update(result);
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            debug!("Periodic check stopped");
                            break;
                        }
                    }
                }
            }
        });

        Ticker { shutdown, handle }
    }

    fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    fn is_stopped(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Runs a check every `period` in the background and reports the result of
/// the last completed run. Reading the status never runs the check.
///
/// The first run happens one `period` after construction. Until then the
/// checker reports [`CheckError::NotYetChecked`].
pub struct PeriodicChecker {
    status: Arc<StatusUpdater>,
    ticker: Ticker,
}

impl PeriodicChecker {
    /// # Panics
    ///
    /// Panics when called outside of a Tokio runtime.
    pub fn new<C: Check + 'static>(check: C, period: Duration) -> Self {
        let status = Arc::new(StatusUpdater::new());
        let ticker = Ticker::spawn(Arc::new(check), period, status.clone());
        PeriodicChecker { status, ticker }
    }

    pub fn status(&self) -> Result<(), CheckError> {
        self.status.status()
    }

    /// Stops the background task. The last result stays available.
    pub fn stop(&self) {
        self.ticker.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.ticker.is_stopped()
    }
}

#[async_trait]
impl Check for PeriodicChecker {
    async fn check(&self) -> Result<(), CheckError> {
        self.status()
    }
}

/// A [`PeriodicChecker`] whose results go through a [`ThresholdStatusUpdater`],
/// so a failure is only reported after `threshold` failing runs in a row.
pub struct PeriodicThresholdChecker {
    status: Arc<ThresholdStatusUpdater>,
    ticker: Ticker,
}

impl PeriodicThresholdChecker {
    /// # Panics
    ///
    /// Panics when called outside of a Tokio runtime.
    pub fn new<C: Check + 'static>(check: C, period: Duration, threshold: usize) -> Self {
        let status = Arc::new(ThresholdStatusUpdater::new(threshold));
        let ticker = Ticker::spawn(Arc::new(check), period, status.clone());
        PeriodicThresholdChecker { status, ticker }
    }

    pub fn status(&self) -> Result<(), CheckError> {
        self.status.status()
    }

    pub fn stop(&self) {
        self.ticker.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.ticker.is_stopped()
    }
}

#[async_trait]
impl Check for PeriodicThresholdChecker {
    async fn check(&self) -> Result<(), CheckError> {
        self.status()
    }
}
