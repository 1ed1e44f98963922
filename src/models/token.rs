//! Tagged tokens and entity spans produced by a parser.

use serde::{Deserialize, Serialize};

/// Coarse part-of-speech categories (Universal Dependencies tag set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Adjective,
    Adposition,
    Adverb,
    Auxiliary,
    CoordinatingConjunction,
    Determiner,
    Interjection,
    Noun,
    Numeral,
    Particle,
    Pronoun,
    ProperNoun,
    Punctuation,
    SubordinatingConjunction,
    Symbol,
    Verb,
    Space,
    Other,
}

/// A single token with the annotations the entity filter relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub is_stop: bool,
    pub pos: PartOfSpeech,
    /// Fine-grained tag, e.g. "DT" or "WDT" for English determiners.
    pub tag: String,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, pos: PartOfSpeech, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_stop: false,
            pos,
            tag: tag.into(),
        }
    }

    /// Mark this token as a stop word.
    pub fn with_stop(mut self, is_stop: bool) -> Self {
        self.is_stop = is_stop;
        self
    }
}

/// A contiguous run of tokens the parser marked as a named-entity candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    tokens: Vec<TaggedToken>,
    text: String,
}

impl EntitySpan {
    /// Build a span whose surface text is its tokens joined by single spaces.
    pub fn new(tokens: Vec<TaggedToken>) -> Self {
        let text = tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self { tokens, text }
    }

    pub fn tokens(&self) -> &[TaggedToken] {
        &self.tokens
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
