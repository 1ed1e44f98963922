//! Extraction error types.

use thiserror::Error;

use crate::models::Language;

/// Request-level extraction failures.
///
/// Empty input is not an error; it yields an empty result.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),
    #[error("Parser for {0} is unavailable")]
    ParserUnavailable(Language),
    #[error("Extraction failed: {0}")]
    Internal(String),
}

impl ExtractionError {
    /// Short machine-readable kind, used in error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedLanguage(_) => "unsupported_language",
            Self::ParserUnavailable(_) => "parser_unavailable",
            Self::Internal(_) => "internal",
        }
    }
}
