//! Parser capability: turns normalized text into entity candidates.
//!
//! Parsers are expensive to construct (model loading) and cheap to share, so
//! they are built through a [`ParserLoader`] and handed out by the
//! [`ParserCache`] as reference-counted handles. The built-in
//! [`LexiconParser`] needs no model files; other backends plug in by
//! implementing the two traits.

mod cache;
mod lexicon;

use std::sync::Arc;

use thiserror::Error;

use crate::models::{EntitySpan, Language};

use super::normalize::NormalizedText;

pub(crate) use cache::panic_message;
pub use cache::{ParserCache, ParserStatus, MAX_LOAD_ATTEMPTS};
pub use lexicon::{LexiconLoader, LexiconParser};

/// Shared, read-only handle to a constructed parser.
pub type ParserHandle = Arc<dyn EntityParser>;

/// Error returned when a parser cannot be constructed.
#[derive(Debug, Clone, Error)]
pub enum ParserLoadError {
    #[error("No parser model available for {0}")]
    ModelNotFound(Language),
    #[error("Failed to load parser model {model}: {reason}")]
    Failed { model: String, reason: String },
}

/// Error returned when parsing a document fails.
#[derive(Debug, Clone, Error)]
#[error("Parse failed: {0}")]
pub struct ParseError(pub String);

/// A constructed parser for one language.
pub trait EntityParser: Send + Sync {
    /// Identifier of the model backing this parser (e.g. "en_core_web_md").
    fn model_name(&self) -> &str;

    /// Tag `text` and return its named-entity candidates in document order.
    fn parse(&self, text: &NormalizedText) -> Result<Vec<EntitySpan>, ParseError>;
}

/// Builds parsers. Called at most twice per language by [`ParserCache`].
pub trait ParserLoader: Send + Sync {
    fn load(&self, language: Language) -> Result<ParserHandle, ParserLoadError>;
}
