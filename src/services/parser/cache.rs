//! Process-wide cache of constructed parsers, one per language.
//!
//! The whitelist is fixed when the cache is built, so the map itself is never
//! mutated: each whitelisted language owns a `OnceLock` that is filled by the
//! first caller. Concurrent first callers block on the same cell and observe
//! the same outcome. Reads after warm-up take no lock.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::models::Language;
use crate::services::error::ExtractionError;

use super::{ParserHandle, ParserLoadError, ParserLoader};

/// Construction attempts per language before it is marked unavailable.
pub const MAX_LOAD_ATTEMPTS: usize = 2;

/// Final outcome of constructing a language's parser.
enum Slot {
    Ready(ParserHandle),
    Unavailable(String),
}

/// Load state of one whitelisted language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserStatus {
    Unloaded,
    Ready,
    Unavailable,
}

pub struct ParserCache {
    loader: Arc<dyn ParserLoader>,
    slots: HashMap<Language, OnceLock<Slot>>,
}

impl ParserCache {
    /// Create a cache serving only the given languages.
    pub fn new(loader: Arc<dyn ParserLoader>, languages: &[Language]) -> Self {
        let slots = languages
            .iter()
            .map(|&lang| (lang, OnceLock::new()))
            .collect();
        Self { loader, slots }
    }

    /// Get the parser for `language`, constructing it on first use.
    ///
    /// Blocks while another caller is constructing the same language.
    pub fn get(&self, language: Language) -> Result<ParserHandle, ExtractionError> {
        let cell = self
            .slots
            .get(&language)
            .ok_or_else(|| ExtractionError::UnsupportedLanguage(language.to_string()))?;

        match cell.get_or_init(|| self.construct(language)) {
            Slot::Ready(parser) => Ok(Arc::clone(parser)),
            Slot::Unavailable(_) => Err(ExtractionError::ParserUnavailable(language)),
        }
    }

    /// Eagerly construct parsers, returning per-language failures.
    pub fn warm(&self, languages: &[Language]) -> Vec<(Language, ExtractionError)> {
        languages
            .iter()
            .filter_map(|&lang| self.get(lang).err().map(|e| (lang, e)))
            .collect()
    }

    /// Whitelisted languages, sorted.
    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<_> = self.slots.keys().copied().collect();
        languages.sort();
        languages
    }

    /// Current load state of every whitelisted language, sorted by language.
    pub fn status(&self) -> Vec<(Language, ParserStatus)> {
        self.languages()
            .into_iter()
            .map(|lang| {
                let status = match self.slots[&lang].get() {
                    None => ParserStatus::Unloaded,
                    Some(Slot::Ready(_)) => ParserStatus::Ready,
                    Some(Slot::Unavailable(_)) => ParserStatus::Unavailable,
                };
                (lang, status)
            })
            .collect()
    }

    /// Languages whose parser has been constructed successfully.
    pub fn loaded_languages(&self) -> Vec<Language> {
        self.status()
            .into_iter()
            .filter(|(_, status)| *status == ParserStatus::Ready)
            .map(|(lang, _)| lang)
            .collect()
    }

    /// Reason a language was marked unavailable, if it was.
    pub fn failure_reason(&self, language: Language) -> Option<String> {
        match self.slots.get(&language)?.get()? {
            Slot::Unavailable(reason) => Some(reason.clone()),
            Slot::Ready(_) => None,
        }
    }

    fn construct(&self, language: Language) -> Slot {
        let mut last_error = String::new();

        for attempt in 1..=MAX_LOAD_ATTEMPTS {
            info!(
                "Loading parser {} for {} (attempt {}/{})",
                language.model_name(),
                language,
                attempt,
                MAX_LOAD_ATTEMPTS
            );
            let start = Instant::now();

            match self.load_once(language) {
                Ok(parser) => {
                    info!(
                        "Loaded parser {} in {:.2}s",
                        parser.model_name(),
                        start.elapsed().as_secs_f64()
                    );
                    return Slot::Ready(parser);
                }
                Err(e) => {
                    warn!("Parser load for {} failed: {}", language, e);
                    last_error = e.to_string();
                }
            }
        }

        error!(
            "Parser for {} unavailable after {} attempts, not retrying: {}",
            language, MAX_LOAD_ATTEMPTS, last_error
        );
        Slot::Unavailable(last_error)
    }

    fn load_once(&self, language: Language) -> Result<ParserHandle, ParserLoadError> {
        panic::catch_unwind(AssertUnwindSafe(|| self.loader.load(language))).unwrap_or_else(
            |payload| {
                Err(ParserLoadError::Failed {
                    model: language.model_name().to_string(),
                    reason: panic_message(payload.as_ref()),
                })
            },
        )
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
