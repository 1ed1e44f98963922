//! API endpoint handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::models::Language;
use crate::services::ParserStatus;

use super::super::AppState;

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

#[derive(Debug, Serialize)]
struct LanguageInfo {
    code: &'static str,
    name: &'static str,
    model: &'static str,
    status: ParserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct LanguagesResponse {
    default_language: &'static str,
    languages: Vec<LanguageInfo>,
}

/// Enabled languages with their parser load state.
pub async fn api_languages(State(state): State<AppState>) -> impl IntoResponse {
    let cache = state.service.cache();
    let languages = cache
        .status()
        .into_iter()
        .map(|(lang, status): (Language, ParserStatus)| LanguageInfo {
            code: lang.code(),
            name: lang.name(),
            model: lang.model_name(),
            status,
            reason: cache.failure_reason(lang),
        })
        .collect();

    Json(LanguagesResponse {
        default_language: state.service.default_language().code(),
        languages,
    })
}
