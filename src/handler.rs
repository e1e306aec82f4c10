//! HTTP boundary: reports the health of a registry and protects other
//! handlers while the service is unhealthy.

use crate::error::CheckError;
use crate::registry::{default_registry, Registry};
use crate::status::HealthStatus;
use crate::updater::{StatusUpdater, Updater};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{info, warn};
use std::sync::Arc;

pub const STATUS_PATH: &str = "/debug/health";
pub const DOWN_PATH: &str = "/debug/health/down";
pub const UP_PATH: &str = "/debug/health/up";

/// Name under which [`routes`] registers the manual toggle.
pub const MANUAL_CHECK_NAME: &str = "manual_http_status";

fn status_code(status: &HealthStatus) -> StatusCode {
    if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn status_response(registry: &Registry) -> Response {
    let status = registry.check_status().await;
    if !status.healthy {
        warn!("Health check failed: {}", status);
    }
    (status_code(&status), Json(status)).into_response()
}

/// Answers 200 when every check of the default registry passes, 503
/// otherwise. The JSON body is informational only.
pub async fn status_handler() -> Response {
    status_response(&default_registry()).await
}

#[derive(Clone)]
struct HealthState {
    registry: Arc<Registry>,
    manual: Arc<StatusUpdater>,
}

async fn registry_status(State(state): State<HealthState>) -> Response {
    status_response(&state.registry).await
}

async fn manual_down(State(state): State<HealthState>) -> StatusCode {
    info!("Health manually marked down");
    state
        .manual
        .update(Err(CheckError::failed("manually marked down")));
    StatusCode::OK
}

async fn manual_up(State(state): State<HealthState>) -> StatusCode {
    info!("Health manually marked up");
    state.manual.update(Ok(()));
    StatusCode::OK
}

/// Health routes for `registry`.
///
/// Besides the status endpoint this registers a manual check under
/// [`MANUAL_CHECK_NAME`], initially healthy, which can be flipped with a
/// POST to [`DOWN_PATH`] or [`UP_PATH`].
pub fn routes(registry: Arc<Registry>) -> Router {
    let manual = Arc::new(StatusUpdater::new());
    manual.update(Ok(()));
    registry.register(MANUAL_CHECK_NAME, manual.clone());

    Router::new()
        .route(STATUS_PATH, get(registry_status))
        .route(DOWN_PATH, post(manual_down))
        .route(UP_PATH, post(manual_up))
        .with_state(HealthState { registry, manual })
}

async fn guard(registry: &Registry, request: Request, next: Next) -> Response {
    let status = registry.check_status().await;
    if !status.healthy {
        warn!("Rejecting {} {}: {}", request.method(), request.uri(), status);
        return (status_code(&status), Json(status)).into_response();
    }
    next.run(request).await
}

async fn guard_default(request: Request, next: Next) -> Response {
    guard(&default_registry(), request, next).await
}

async fn guard_registry(
    State(registry): State<Arc<Registry>>,
    request: Request,
    next: Next,
) -> Response {
    guard(&registry, request, next).await
}

/// Wraps `inner` so that every request is answered with a 503 while the
/// default registry is unhealthy. `inner` is not called in that case.
pub fn handler(inner: Router) -> Router {
    inner.layer(middleware::from_fn(guard_default))
}

/// Like [`handler`], but guarded by `registry` instead of the default one.
pub fn handler_with_registry(inner: Router, registry: Arc<Registry>) -> Router {
    inner.layer(middleware::from_fn_with_state(registry, guard_registry))
}
