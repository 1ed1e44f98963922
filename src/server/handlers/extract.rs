//! Extraction endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::models::{ExtractionRequest, ExtractionResult};
use crate::services::ExtractionError;

use super::super::error::ApiError;
use super::super::AppState;

/// Run one extraction on the blocking pool, bounded by the worker limit.
pub async fn extract(
    State(state): State<AppState>,
    request: Result<Json<ExtractionRequest>, JsonRejection>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let Json(request) = request?;
    let run = run_extraction(state.clone(), request);

    let result = match state.request_timeout {
        // On timeout the blocking task keeps running and frees its permit
        // when done; only the response is abandoned.
        Some(limit) => tokio::time::timeout(limit, run)
            .await
            .map_err(|_| {
                tracing::warn!("Extraction exceeded {:?}, abandoning response", limit);
                ApiError::Timeout(limit)
            })??,
        None => run.await?,
    };

    Ok(Json(result))
}

async fn run_extraction(
    state: AppState,
    request: ExtractionRequest,
) -> Result<ExtractionResult, ApiError> {
    let permit = Arc::clone(&state.limiter)
        .acquire_owned()
        .await
        .map_err(|_| {
            tracing::error!("Extraction worker pool closed");
            ExtractionError::Internal("worker pool closed".to_string())
        })?;

    let service = Arc::clone(&state.service);
    let task = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        service.handle(request)
    });

    match task.await {
        Ok(result) => Ok(result?),
        Err(e) => {
            tracing::error!("Extraction task failed: {}", e);
            Err(ExtractionError::Internal(format!("extraction task failed: {}", e)).into())
        }
    }
}
