//! Precision-biased filtering of parser entity candidates.
//!
//! Single-token candidates must be proper nouns that are neither stop words
//! nor excluded. Multi-token candidates are dropped if any token is
//! disqualified, where ordinary determiners ("the", "la") are tolerated
//! inside a name but adpositions never are.

use std::sync::Arc;

use crate::models::{EntitySpan, PartOfSpeech, TaggedToken};

use super::exclude_words::ExcludeWordSet;

/// Fine-grained tag of English wh-determiners ("which", "whatever").
pub const WH_DETERMINER_TAG: &str = "WDT";
/// Fine-grained tag of Spanish interrogative determiners ("qué", "cuál").
pub const INTERROGATIVE_DETERMINER_TAG: &str = "DET__PronType=Int";

#[derive(Debug, Clone)]
pub struct EntityFilter {
    exclude: Arc<ExcludeWordSet>,
}

impl EntityFilter {
    pub fn new(exclude: Arc<ExcludeWordSet>) -> Self {
        Self { exclude }
    }

    pub fn exclude_words(&self) -> &ExcludeWordSet {
        &self.exclude
    }

    /// Decide whether an entity candidate is kept.
    pub fn should_keep(&self, span: &EntitySpan) -> bool {
        match span.tokens() {
            [] => false,
            [token] => self.keep_single(token),
            tokens => !tokens.iter().any(|t| self.disqualifies(t)),
        }
    }

    fn is_excluded(&self, token: &TaggedToken) -> bool {
        token.is_stop || self.exclude.contains(&token.text)
    }

    fn keep_single(&self, token: &TaggedToken) -> bool {
        !self.is_excluded(token) && token.pos == PartOfSpeech::ProperNoun
    }

    fn disqualifies(&self, token: &TaggedToken) -> bool {
        if token.pos == PartOfSpeech::Adposition {
            return true;
        }
        self.is_excluded(token) && !is_plain_determiner(token)
    }
}

/// A determiner that is not interrogative.
fn is_plain_determiner(token: &TaggedToken) -> bool {
    token.pos == PartOfSpeech::Determiner
        && token.tag != WH_DETERMINER_TAG
        && token.tag != INTERROGATIVE_DETERMINER_TAG
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_with(words: &[&str]) -> EntityFilter {
        EntityFilter::new(Arc::new(ExcludeWordSet::from_words(words)))
    }

    fn propn(text: &str) -> TaggedToken {
        TaggedToken::new(text, PartOfSpeech::ProperNoun, "NNP")
    }

    fn span(tokens: Vec<TaggedToken>) -> EntitySpan {
        EntitySpan::new(tokens)
    }

    #[test]
    fn test_single_proper_noun_kept() {
        let filter = filter_with(&[]);
        assert!(filter.should_keep(&span(vec![propn("Madrid")])));
    }

    #[test]
    fn test_single_common_noun_discarded() {
        let filter = filter_with(&[]);
        let token = TaggedToken::new("administration", PartOfSpeech::Noun, "NN");
        assert!(!filter.should_keep(&span(vec![token])));
    }

    #[test]
    fn test_single_number_discarded() {
        let filter = filter_with(&[]);
        let token = TaggedToken::new("2018", PartOfSpeech::Numeral, "CD");
        assert!(!filter.should_keep(&span(vec![token])));
    }

    #[test]
    fn test_single_excluded_word_discarded_case_insensitively() {
        let filter = filter_with(&["monday"]);
        assert!(!filter.should_keep(&span(vec![propn("Monday")])));
        assert!(filter.should_keep(&span(vec![propn("Trump")])));
    }

    #[test]
    fn test_single_stop_word_discarded() {
        let filter = filter_with(&[]);
        let token = propn("May").with_stop(true);
        assert!(!filter.should_keep(&span(vec![token])));
    }

    #[test]
    fn test_multi_with_plain_determiner_kept() {
        let filter = filter_with(&[]);
        let the = TaggedToken::new("the", PartOfSpeech::Determiner, "DT").with_stop(true);
        assert!(filter.should_keep(&span(vec![the, propn("White"), propn("House")])));
    }

    #[test]
    fn test_multi_with_wh_determiner_discarded() {
        let filter = filter_with(&[]);
        let which = TaggedToken::new("which", PartOfSpeech::Determiner, WH_DETERMINER_TAG)
            .with_stop(true);
        assert!(!filter.should_keep(&span(vec![which, propn("House")])));
    }

    #[test]
    fn test_multi_with_interrogative_determiner_discarded() {
        let filter = filter_with(&[]);
        let que = TaggedToken::new("qué", PartOfSpeech::Determiner, INTERROGATIVE_DETERMINER_TAG)
            .with_stop(true);
        assert!(!filter.should_keep(&span(vec![que, propn("Madrid")])));
    }

    #[test]
    fn test_multi_with_adposition_always_discarded() {
        let filter = filter_with(&[]);
        // Not a stop word, still disqualifying.
        let of = TaggedToken::new("of", PartOfSpeech::Adposition, "IN");
        assert!(!filter.should_keep(&span(vec![propn("Bank"), of, propn("America")])));

        let de = TaggedToken::new("de", PartOfSpeech::Adposition, "ADP").with_stop(true);
        assert!(!filter.should_keep(&span(vec![propn("Casa"), de, propn("Papel")])));
    }

    #[test]
    fn test_multi_with_stop_word_discarded() {
        let filter = filter_with(&[]);
        let and = TaggedToken::new("and", PartOfSpeech::CoordinatingConjunction, "CC")
            .with_stop(true);
        assert!(!filter.should_keep(&span(vec![propn("Sons"), and, propn("Daughters")])));
    }

    #[test]
    fn test_multi_with_excluded_word_discarded() {
        let filter = filter_with(&["southern"]);
        let southern = TaggedToken::new("Southern", PartOfSpeech::Adjective, "JJ");
        assert!(!filter.should_keep(&span(vec![southern, propn("Border")])));
    }

    #[test]
    fn test_multi_excluded_determiner_tolerated() {
        let filter = filter_with(&["the"]);
        let the = TaggedToken::new("The", PartOfSpeech::Determiner, "DT");
        assert!(filter.should_keep(&span(vec![the, propn("Hague")])));
    }

    #[test]
    fn test_multi_common_nouns_kept() {
        // Multi-token spans are not required to be proper nouns.
        let filter = filter_with(&[]);
        let tokens = vec![
            propn("Trump"),
            TaggedToken::new("administration", PartOfSpeech::Noun, "NN"),
        ];
        assert!(filter.should_keep(&span(tokens)));
    }

    #[test]
    fn test_empty_span_discarded() {
        let filter = filter_with(&[]);
        assert!(!filter.should_keep(&span(Vec::new())));
    }
}
