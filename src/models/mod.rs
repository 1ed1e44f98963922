//! Data models for ibex.

mod extraction;
mod language;
mod token;

pub use extraction::{
    DocumentText, ExtractionRequest, ExtractionResult, CONFIDENCE_PLACEHOLDER, MODEL_ID,
    MODEL_VERSION, RESULT_KEY,
};
pub use language::{Language, UnknownLanguage};
pub use token::{EntitySpan, PartOfSpeech, TaggedToken};
