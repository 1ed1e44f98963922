//! Error responses for the HTTP API.

use std::time::Duration;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::services::ExtractionError;

/// A request failure rendered as `{ "error": kind, "message": .. }`.
/// Message returned for internal failures.
pub const GENERIC_FAILURE: &str = "Entity extraction failed";

#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be decoded.
    BadRequest(String),
    Extraction(ExtractionError),
    Timeout(Duration),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Extraction(ExtractionError::UnsupportedLanguage(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Extraction(ExtractionError::ParserUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Extraction(ExtractionError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Extraction(e) => e.kind(),
            Self::Timeout(_) => "timeout",
        }
    }

    /// Client-facing message. Internal failure details stay in the logs.
    pub fn message(&self) -> String {
        match self {
            Self::BadRequest(detail) => detail.clone(),
            Self::Extraction(ExtractionError::Internal(_)) => GENERIC_FAILURE.to_string(),
            Self::Extraction(e) => e.to_string(),
            Self::Timeout(limit) => format!("Extraction did not finish within {:?}", limit),
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(e: ExtractionError) -> Self {
        Self::Extraction(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.kind(),
            message: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
