use crate::checks::{check_fn, spawn_isolated, Check};
use crate::error::CheckError;
use crate::periodic::{PeriodicChecker, PeriodicThresholdChecker};
use crate::status::HealthStatus;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use std::time::Duration;

/// A set of named checks.
///
/// Registering a name that is already taken replaces the previous check.
#[derive(Default)]
pub struct Registry {
    checks: RwLock<HashMap<String, Arc<dyn Check>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, check: impl Check + 'static) {
        let name = name.into();
        let mut checks = self.checks.write().unwrap_or_else(PoisonError::into_inner);
        if checks.insert(name.clone(), Arc::new(check)).is_some() {
            warn!("Health check {} registered twice, replacing it", name);
        } else {
            debug!("Registered health check {}", name);
        }
    }

    pub fn register_fn<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn() -> Result<(), CheckError> + Send + Sync + 'static,
    {
        self.register(name, check_fn(f));
    }

    /// Registers `f` to be run every `period` in the background. The task
    /// lives as long as the check stays in the registry.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a Tokio runtime.
    pub fn register_periodic_fn<F>(&self, name: impl Into<String>, period: Duration, f: F)
    where
        F: Fn() -> Result<(), CheckError> + Send + Sync + 'static,
    {
        self.register(name, PeriodicChecker::new(check_fn(f), period));
    }

    /// Like [`Registry::register_periodic_fn`], but a failure is only reported
    /// after `threshold` failing runs in a row.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a Tokio runtime.
    pub fn register_periodic_threshold_fn<F>(
        &self,
        name: impl Into<String>,
        period: Duration,
        threshold: usize,
        f: F,
    ) where
        F: Fn() -> Result<(), CheckError> + Send + Sync + 'static,
    {
        self.register(
            name,
            PeriodicThresholdChecker::new(check_fn(f), period, threshold),
        );
    }

    pub fn len(&self) -> usize {
        self.checks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evaluates every registered check concurrently.
    ///
    /// The registry lock is released before any check runs, so checks may
    /// themselves use the registry. A check that panics is reported as
    /// failing without affecting the others.
    pub async fn check_status(&self) -> HealthStatus {
        let checks: Vec<(String, Arc<dyn Check>)> = self
            .checks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, check)| (name.clone(), check.clone()))
            .collect();

        let pending: Vec<_> = checks
            .into_iter()
            .map(|(name, check)| (name, spawn_isolated(check)))
            .collect();

        let mut errors = BTreeMap::new();
        for (name, result) in pending {
            if let Err(e) = result.await {
                debug!("Health check {} failed: {}", name, e);
                errors.insert(name, e.to_string());
            }
        }
        HealthStatus::from_errors(errors)
    }
}

static DEFAULT_REGISTRY: LazyLock<RwLock<Arc<Registry>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Registry::new())));

/// The process wide registry used by the free functions of this module and
/// by the default HTTP handlers.
pub fn default_registry() -> Arc<Registry> {
    DEFAULT_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replaces the default registry and returns the previous one. Evaluations
/// already running keep using the registry they started with.
pub fn set_default_registry(registry: Registry) -> Arc<Registry> {
    let mut current = DEFAULT_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *current, Arc::new(registry))
}

pub fn register(name: impl Into<String>, check: impl Check + 'static) {
    default_registry().register(name, check);
}

pub fn register_fn<F>(name: impl Into<String>, f: F)
where
    F: Fn() -> Result<(), CheckError> + Send + Sync + 'static,
{
    default_registry().register_fn(name, f);
}

pub fn register_periodic_fn<F>(name: impl Into<String>, period: Duration, f: F)
where
    F: Fn() -> Result<(), CheckError> + Send + Sync + 'static,
{
    default_registry().register_periodic_fn(name, period, f);
}

pub fn register_periodic_threshold_fn<F>(
    name: impl Into<String>,
    period: Duration,
    threshold: usize,
    f: F,
) where
    F: Fn() -> Result<(), CheckError> + Send + Sync + 'static,
{
    default_registry().register_periodic_threshold_fn(name, period, threshold, f);
}

pub async fn check_status() -> HealthStatus {
    default_registry().check_status().await
}
