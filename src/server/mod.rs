//! HTTP server for entity extraction.
//!
//! Provides:
//! - `POST /extract` for extracting entities from a document
//! - `GET /api/languages` for the enabled languages and parser state
//! - `GET /health` for container orchestration

mod error;
mod handlers;
mod routes;

pub use error::ApiError;
pub use routes::create_router;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;

use crate::config::Settings;
use crate::services::ExtractionService;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ExtractionService>,
    /// Bounds how many extractions run at once.
    pub limiter: Arc<Semaphore>,
    pub request_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(service: ExtractionService, workers: usize, request_timeout: Option<Duration>) -> Self {
        Self {
            service: Arc::new(service),
            limiter: Arc::new(Semaphore::new(workers.max(1))),
            request_timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let service = settings.build_service()?;
        Ok(Self::new(
            service,
            settings.workers,
            settings.request_timeout,
        ))
    }
}

/// Construct the configured preload parsers before accepting traffic.
async fn preload(state: &AppState, settings: &Settings) -> anyhow::Result<()> {
    if settings.preload.is_empty() {
        return Ok(());
    }

    let service = Arc::clone(&state.service);
    let languages = settings.preload.clone();
    let failures = tokio::task::spawn_blocking(move || service.cache().warm(&languages)).await?;

    for (lang, e) in failures {
        tracing::warn!("Failed to preload parser for {}: {}", lang, e);
    }
    Ok(())
}

/// Start the web server and run until Ctrl+C or SIGTERM.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let state = AppState::from_settings(settings)?;
    preload(&state, settings).await?;

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind((settings.host.as_str(), settings.port)).await?;
    tracing::info!(
        "Starting server at http://{} ({} workers)",
        listener.local_addr()?,
        settings.workers
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down, draining in-flight requests");
}
