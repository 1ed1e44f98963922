//! Service layer for entity extraction.
//!
//! This module contains the extraction pipeline separated from transport
//! concerns. Services can be used by the CLI, the HTTP server, or tests.

pub mod entity_filter;
pub mod error;
pub mod exclude_words;
pub mod extraction;
pub mod normalize;
pub mod parser;

pub use entity_filter::EntityFilter;
pub use error::ExtractionError;
pub use exclude_words::ExcludeWordSet;
pub use extraction::ExtractionService;
pub use normalize::{normalize, NormalizedText};
pub use parser::{
    EntityParser, LexiconLoader, LexiconParser, ParserCache, ParserHandle, ParserLoader,
    ParserStatus,
};
