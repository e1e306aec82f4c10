use crate::checks::Check;
use crate::error::CheckError;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A [`Check`] whose status is pushed in from the outside.
pub trait Updater: Check {
    /// Records the outcome of the latest external check.
    fn update(&self, result: Result<(), CheckError>);
}

/// Locks `mutex`, recovering the data if a previous holder panicked. The
/// guarded values here are plain status cells, so they are always consistent.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the result of the most recent [`Updater::update`] call.
///
/// Until the first update it reports [`CheckError::NotYetChecked`].
#[derive(Debug)]
pub struct StatusUpdater {
    status: Mutex<Result<(), CheckError>>,
}

impl StatusUpdater {
    pub fn new() -> Self {
        StatusUpdater {
            status: Mutex::new(Err(CheckError::NotYetChecked)),
        }
    }

    pub fn status(&self) -> Result<(), CheckError> {
        lock(&self.status).clone()
    }
}

impl Default for StatusUpdater {
    fn default() -> Self {
        Self::new()
    }
}

impl Updater for StatusUpdater {
    fn update(&self, result: Result<(), CheckError>) {
        *lock(&self.status) = result;
    }
}

#[async_trait]
impl Check for StatusUpdater {
    async fn check(&self) -> Result<(), CheckError> {
        self.status()
    }
}

#[derive(Debug)]
struct ThresholdState {
    failures: usize,
    last_error: CheckError,
}

/// A status updater that only reports a failure once `threshold` failing
/// updates arrived in a row. Any success resets the count.
///
/// A fresh updater starts out tripped: until a first success is recorded,
/// failures are reported straight away.
#[derive(Debug)]
pub struct ThresholdStatusUpdater {
    threshold: usize,
    state: Mutex<ThresholdState>,
}

impl ThresholdStatusUpdater {
    /// A threshold of 0 behaves like 1.
    pub fn new(threshold: usize) -> Self {
        let threshold = threshold.max(1);
        ThresholdStatusUpdater {
            threshold,
            state: Mutex::new(ThresholdState {
                failures: threshold,
                last_error: CheckError::NotYetChecked,
            }),
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn status(&self) -> Result<(), CheckError> {
        let state = lock(&self.state);
        if state.failures >= self.threshold {
            Err(state.last_error.clone())
        } else {
            Ok(())
        }
    }
}

impl Updater for ThresholdStatusUpdater {
    fn update(&self, result: Result<(), CheckError>) {
        let mut state = lock(&self.state);
        match result {
            Ok(()) => state.failures = 0,
            Err(e) => {
                // Saturate at the threshold, the exact count past it is irrelevant.
                if state.failures < self.threshold {
                    state.failures += 1;
                }
                state.last_error = e;
            }
        }
    }
}

#[async_trait]
impl Check for ThresholdStatusUpdater {
    async fn check(&self) -> Result<(), CheckError> {
        self.status()
    }
}
