mod file_check;
mod tcp_check;
mod url_check;

pub mod plugin_manager;

pub use file_check::FileCheck;
pub use tcp_check::TcpCheck;
pub use url_check::UrlCheck;

use crate::error::CheckError;
use async_trait::async_trait;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;

/// Something that can report whether it is healthy.
///
/// `Ok(())` means healthy, an error describes the failure. Implementations
/// may be queried by several requests at once.
#[async_trait]
pub trait Check: Send + Sync {
    async fn check(&self) -> Result<(), CheckError>;
}

#[async_trait]
impl<C: Check + ?Sized> Check for Arc<C> {
    async fn check(&self) -> Result<(), CheckError> {
        (**self).check().await
    }
}

/// Adapts a plain function into a [`Check`].
pub struct CheckFunc<F>(F);

impl<F> CheckFunc<F>
where
    F: Fn() -> Result<(), CheckError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        CheckFunc(f)
    }
}

#[async_trait]
impl<F> Check for CheckFunc<F>
where
    F: Fn() -> Result<(), CheckError> + Send + Sync,
{
    async fn check(&self) -> Result<(), CheckError> {
        (self.0)()
    }
}

pub fn check_fn<F>(f: F) -> CheckFunc<F>
where
    F: Fn() -> Result<(), CheckError> + Send + Sync,
{
    CheckFunc::new(f)
}

/// Starts evaluating `check` on its own task right away and returns a future
/// resolving to its result. A panic inside the check is turned into
/// [`CheckError::Panicked`] instead of unwinding into the caller.
pub(crate) fn spawn_isolated(
    check: Arc<dyn Check>,
) -> impl Future<Output = Result<(), CheckError>> {
    let handle = tokio::spawn(async move { check.check().await });
    async move {
        match handle.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => Err(CheckError::Panicked(panic_message(e.into_panic()))),
            Err(e) => Err(CheckError::failed(e.to_string())),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
