//! Request and response shapes exchanged with extraction clients.

use serde::{Deserialize, Serialize};

/// Key identifying entity extraction results.
pub const RESULT_KEY: &str = "extracted_entities";
/// Model identifier reported with every result.
pub const MODEL_ID: &str = "NK_ibex_entity_extractor";
/// Model version reported with every result.
pub const MODEL_VERSION: &str = "0.0.1";
/// Confidence is not computed; every result carries this placeholder.
pub const CONFIDENCE_PLACEHOLDER: f32 = 0.0;

/// Text to extract from: a single document or several joined together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentText {
    Single(String),
    Many(Vec<String>),
}

impl DocumentText {
    /// Flatten into one string, joining multiple documents with a space.
    pub fn into_text(self) -> String {
        match self {
            Self::Single(text) => text,
            Self::Many(docs) => docs.join(" "),
        }
    }
}

impl Default for DocumentText {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl From<&str> for DocumentText {
    fn from(text: &str) -> Self {
        Self::Single(text.to_string())
    }
}

impl From<String> for DocumentText {
    fn from(text: String) -> Self {
        Self::Single(text)
    }
}

/// An extraction request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionRequest {
    #[serde(default)]
    pub text: DocumentText,
    /// Two-letter language code; unknown or empty falls back to the default.
    #[serde(default)]
    pub language: String,
    /// Extractor-specific hint, unused by entity extraction.
    #[serde(default)]
    pub raw: String,
}

impl ExtractionRequest {
    pub fn new(text: impl Into<DocumentText>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            language: language.into(),
            raw: String::new(),
        }
    }
}

/// Entities extracted from one request, plus fixed model metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub key: String,
    pub values: Vec<String>,
    pub model: String,
    pub version: String,
    pub confidence: f32,
}

impl ExtractionResult {
    /// A result with no entities.
    pub fn empty() -> Self {
        Self::with_values(Vec::new())
    }

    /// A result carrying `values`, with empty strings dropped.
    pub fn with_values(values: Vec<String>) -> Self {
        Self {
            key: RESULT_KEY.to_string(),
            values: values.into_iter().filter(|v| !v.is_empty()).collect(),
            model: MODEL_ID.to_string(),
            version: MODEL_VERSION.to_string(),
            confidence: CONFIDENCE_PLACEHOLDER,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_metadata() {
        let result = ExtractionResult::empty();
        assert_eq!(result.key, "extracted_entities");
        assert_eq!(result.model, "NK_ibex_entity_extractor");
        assert_eq!(result.version, "0.0.1");
        assert_eq!(result.confidence, 0.0);
        assert!(result.values.is_empty());
    }

    #[test]
    fn test_result_drops_empty_values() {
        let result = ExtractionResult::with_values(vec![
            "Madrid".to_string(),
            String::new(),
            "Monday".to_string(),
        ]);
        assert_eq!(result.values, vec!["Madrid", "Monday"]);
    }

    #[test]
    fn test_request_accepts_single_text() {
        let req: ExtractionRequest =
            serde_json::from_str(r#"{"text": "hello", "language": "en", "raw": "3"}"#).unwrap();
        assert_eq!(req.text, DocumentText::Single("hello".to_string()));
        assert_eq!(req.language, "en");
        assert_eq!(req.raw, "3");
    }

    #[test]
    fn test_request_accepts_document_list() {
        let req: ExtractionRequest =
            serde_json::from_str(r#"{"text": ["one doc", "two doc"]}"#).unwrap();
        assert_eq!(req.language, "");
        assert_eq!(req.text.into_text(), "one doc two doc");
    }

    #[test]
    fn test_request_defaults_missing_fields() {
        let req: ExtractionRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.text.into_text(), "");
        assert!(req.raw.is_empty());
    }
}
