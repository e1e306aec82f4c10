use crate::config::CONFIG;
use crate::handler;
use crate::registry::Registry;
use log::{debug, error, info, warn};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Server is already running")]
    AlreadyRunning,
    #[error("Failed to bind to {0}: {1}")]
    Bind(String, std::io::Error),
}

/// Serves the health routes of a registry on the configured address.
pub struct Server {
    registry: Arc<Registry>,
    handle: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Server {
    pub fn new(registry: Arc<Registry>) -> Self {
        Server {
            registry,
            handle: None,
            shutdown: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub async fn start(&mut self) -> Result<(), ServerError> {
        if self.is_running() {
            warn!("Server is already running.");
            return Err(ServerError::AlreadyRunning);
        }

        let app = handler::routes(self.registry.clone()).layer(TraceLayer::new_for_http());

        let addr = format!("{}:{}", CONFIG.server.address, CONFIG.server.port);
        debug!("Connecting to {}", addr);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            error!("Failed to bind to {}: {}", addr, e);
            ServerError::Bind(addr.clone(), e)
        })?;

        let (shutdown, shutdown_rx) = oneshot::channel();
        self.shutdown = Some(shutdown);
        self.handle = Some(tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }));
        info!("Server started.");
        Ok(())
    }

    /// Stops accepting connections and waits for in-flight requests.
    pub async fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(e) = handle.await {
            error!("Server task failed: {}", e);
        }
        info!("Server stopped.");
    }
}
