//! Health checks for a running service.
//!
//! Named checks are registered into a [`Registry`]. The HTTP boundary in
//! [`handler`] evaluates every registered check and answers 200 when all of
//! them pass and 503 otherwise. Checks that are expensive can be wrapped in a
//! [`PeriodicChecker`] so that requests only read the most recent result.

pub mod checks;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod periodic;
pub mod registry;
pub mod server;
pub mod status;
pub mod updater;

pub use checks::{check_fn, Check, CheckFunc};
pub use error::CheckError;
pub use periodic::{PeriodicChecker, PeriodicThresholdChecker};
pub use registry::{
    check_status, default_registry, register, register_fn, register_periodic_fn,
    register_periodic_threshold_fn, set_default_registry, Registry,
};
pub use status::HealthStatus;
pub use updater::{StatusUpdater, ThresholdStatusUpdater, Updater};
