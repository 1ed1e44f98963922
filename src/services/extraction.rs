//! Entity extraction service.
//!
//! Orchestrates one request: language resolution, parser lookup,
//! normalization, parsing, filtering and deduplication. Synchronous, since
//! parsing is CPU-bound; the server runs it on the blocking pool.

use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error};

use crate::models::{ExtractionRequest, ExtractionResult, Language};

use super::entity_filter::EntityFilter;
use super::error::ExtractionError;
use super::normalize::normalize;
use super::parser::{panic_message, ParserCache};

/// Service for extracting named entities from text.
pub struct ExtractionService {
    cache: Arc<ParserCache>,
    filter: EntityFilter,
    default_language: Language,
}

impl ExtractionService {
    pub fn new(cache: Arc<ParserCache>, filter: EntityFilter, default_language: Language) -> Self {
        Self {
            cache,
            filter,
            default_language,
        }
    }

    pub fn cache(&self) -> &ParserCache {
        &self.cache
    }

    pub fn filter(&self) -> &EntityFilter {
        &self.filter
    }

    pub fn default_language(&self) -> Language {
        self.default_language
    }

    /// Extract the distinct entities of `text`, sorted.
    ///
    /// An unknown or empty `language` falls back to the default language.
    pub fn extract(&self, text: &str, language: &str) -> Result<ExtractionResult, ExtractionError> {
        if text.trim().is_empty() {
            return Ok(ExtractionResult::empty());
        }

        let started = Instant::now();
        let language = Language::resolve(Some(language), self.default_language);
        let parser = self.cache.get(language)?;

        let normalized = normalize(text);
        let spans = panic::catch_unwind(AssertUnwindSafe(|| parser.parse(&normalized)))
            .map_err(|payload| {
                let reason = panic_message(payload.as_ref());
                error!(
                    "Parser {} panicked on {} chars of text: {}",
                    parser.model_name(),
                    normalized.len(),
                    reason
                );
                ExtractionError::Internal(format!("parser panicked: {}", reason))
            })?
            .map_err(|e| {
                error!(
                    "Parser {} failed on {} chars of text: {}",
                    parser.model_name(),
                    normalized.len(),
                    e
                );
                ExtractionError::Internal(e.to_string())
            })?;

        let candidates = spans.len();
        let values: BTreeSet<String> = spans
            .iter()
            .filter(|span| self.filter.should_keep(span))
            .map(|span| span.text().to_string())
            .filter(|text| !text.is_empty())
            .collect();

        debug!(
            "Extracted {} entities ({} candidates) in {} using {} in {:?}",
            values.len(),
            candidates,
            language,
            parser.model_name(),
            started.elapsed()
        );

        Ok(ExtractionResult::with_values(values.into_iter().collect()))
    }

    /// Extract entities from several documents treated as one text.
    pub fn extract_documents(
        &self,
        documents: &[String],
        language: &str,
    ) -> Result<ExtractionResult, ExtractionError> {
        self.extract(&documents.join(" "), language)
    }

    /// Handle a wire request.
    pub fn handle(&self, request: ExtractionRequest) -> Result<ExtractionResult, ExtractionError> {
        let language = request.language;
        self.extract(&request.text.into_text(), &language)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::models::{EntitySpan, PartOfSpeech, TaggedToken};
    use crate::services::exclude_words::ExcludeWordSet;
    use crate::services::normalize::NormalizedText;
    use crate::services::parser::{
        EntityParser, LexiconLoader, ParseError, ParserHandle, ParserLoadError, ParserLoader,
    };

    /// Returns fixed spans and counts parse calls.
    struct ScriptedParser {
        spans: Vec<EntitySpan>,
        parses: Arc<AtomicUsize>,
        fail: bool,
    }

    impl EntityParser for ScriptedParser {
        fn model_name(&self) -> &str {
            "scripted"
        }

        fn parse(&self, _text: &NormalizedText) -> Result<Vec<EntitySpan>, ParseError> {
            self.parses.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ParseError("tokenizer exploded".to_string()));
            }
            Ok(self.spans.clone())
        }
    }

    struct ScriptedLoader {
        spans: Vec<EntitySpan>,
        parses: Arc<AtomicUsize>,
        fail: bool,
    }

    impl ParserLoader for ScriptedLoader {
        fn load(&self, _language: Language) -> Result<ParserHandle, ParserLoadError> {
            Ok(Arc::new(ScriptedParser {
                spans: self.spans.clone(),
                parses: Arc::clone(&self.parses),
                fail: self.fail,
            }))
        }
    }

    struct PanickingParser;

    impl EntityParser for PanickingParser {
        fn model_name(&self) -> &str {
            "panicking"
        }

        fn parse(&self, _text: &NormalizedText) -> Result<Vec<EntitySpan>, ParseError> {
            panic!("index out of bounds");
        }
    }

    struct PanickingLoader;

    impl ParserLoader for PanickingLoader {
        fn load(&self, _language: Language) -> Result<ParserHandle, ParserLoadError> {
            Ok(Arc::new(PanickingParser))
        }
    }

    fn propn(text: &str) -> EntitySpan {
        EntitySpan::new(vec![TaggedToken::new(text, PartOfSpeech::ProperNoun, "NNP")])
    }

    fn service_with(loader: Arc<dyn ParserLoader>, exclude: &[&str]) -> ExtractionService {
        let cache = Arc::new(ParserCache::new(loader, &Language::ALL));
        let filter = EntityFilter::new(Arc::new(ExcludeWordSet::from_words(exclude)));
        ExtractionService::new(cache, filter, Language::English)
    }

    fn scripted(spans: Vec<EntitySpan>) -> (ExtractionService, Arc<AtomicUsize>) {
        let parses = Arc::new(AtomicUsize::new(0));
        let loader = Arc::new(ScriptedLoader {
            spans,
            parses: Arc::clone(&parses),
            fail: false,
        });
        (service_with(loader, &[]), parses)
    }

    #[test]
    fn test_empty_text_skips_parser() {
        let (service, parses) = scripted(vec![propn("Madrid")]);

        for text in ["", "   ", "\n\t"] {
            let result = service.extract(text, "en").unwrap();
            assert!(result.values.is_empty());
        }
        assert_eq!(parses.load(Ordering::SeqCst), 0);
        assert!(service.cache().loaded_languages().is_empty());
    }

    #[test]
    fn test_values_deduplicated_and_sorted() {
        let (service, _) = scripted(vec![propn("Madrid"), propn("Barcelona"), propn("Madrid")]);
        let result = service.extract("anything", "es").unwrap();
        assert_eq!(result.values, vec!["Barcelona", "Madrid"]);
    }

    #[test]
    fn test_unknown_language_falls_back_to_default() {
        let (service, _) = scripted(vec![propn("Madrid")]);
        let result = service.extract("anything", "xx").unwrap();
        assert_eq!(result.values, vec!["Madrid"]);
        assert_eq!(service.cache().loaded_languages(), vec![Language::English]);
    }

    #[test]
    fn test_language_outside_whitelist_is_unsupported() {
        let loader = Arc::new(LexiconLoader);
        let cache = Arc::new(ParserCache::new(loader, &[Language::English]));
        let filter = EntityFilter::new(Arc::new(ExcludeWordSet::empty()));
        let service = ExtractionService::new(cache, filter, Language::English);

        let err = service.extract("Hola Madrid", "es").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedLanguage(_)));
    }

    #[test]
    fn test_parse_error_is_internal() {
        let loader = Arc::new(ScriptedLoader {
            spans: Vec::new(),
            parses: Arc::new(AtomicUsize::new(0)),
            fail: true,
        });
        let service = service_with(loader, &[]);
        let err = service.extract("anything", "en").unwrap_err();
        assert_eq!(
            err,
            ExtractionError::Internal("Parse failed: tokenizer exploded".to_string())
        );
    }

    #[test]
    fn test_parser_panic_is_internal() {
        let service = service_with(Arc::new(PanickingLoader), &[]);
        let err = service.extract("anything", "en").unwrap_err();
        assert!(matches!(err, ExtractionError::Internal(ref m) if m.contains("index out of bounds")));

        // The cached parser is still handed out afterwards.
        assert!(service.cache().get(Language::English).is_ok());
    }

    #[test]
    fn test_filter_applied() {
        let (service, _) = scripted(vec![
            propn("Trump"),
            EntitySpan::new(vec![TaggedToken::new(
                "administration",
                PartOfSpeech::Noun,
                "NN",
            )]),
        ]);
        let result = service.extract("anything", "en").unwrap();
        assert_eq!(result.values, vec!["Trump"]);
    }

    #[test]
    fn test_lexicon_end_to_end_english() {
        let service = service_with(Arc::new(LexiconLoader), &["monday", "southern"]);
        let result = service
            .extract(
                "RT @news: The Trump administration on Monday announced new measures \
                 at the southern US border https://t.co/abc #immigration",
                "en",
            )
            .unwrap();
        // "US" is a stop word.
        assert_eq!(result.values, vec!["Trump"]);
    }

    #[test]
    fn test_lexicon_end_to_end_spanish_dedup() {
        let service = service_with(Arc::new(LexiconLoader), &[]);
        let result = service
            .extract(
                "Pedro Sánchez visitó Barcelona. Pedro Sánchez habló con la prensa.",
                "es",
            )
            .unwrap();
        assert_eq!(result.values, vec!["Barcelona", "Pedro Sánchez"]);
    }

    #[test]
    fn test_extract_documents_joins() {
        let service = service_with(Arc::new(LexiconLoader), &[]);
        let documents = vec!["We visited Madrid".to_string(), "then Lisbon".to_string()];
        let result = service.extract_documents(&documents, "en").unwrap();
        assert_eq!(result.values, vec!["Lisbon", "Madrid"]);
    }

    #[test]
    fn test_handle_request() {
        let service = service_with(Arc::new(LexiconLoader), &[]);
        let request = ExtractionRequest::new("Angela Merkel spoke", "");
        let result = service.handle(request).unwrap();
        assert_eq!(result.values, vec!["Angela Merkel"]);
    }
}
