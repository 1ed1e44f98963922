//! Built-in rule-based parser that needs no model files.
//!
//! Tags tokens from closed-class word lists and capitalization, then marks
//! maximal runs of proper nouns as entity candidates. Precision is modest
//! compared to a statistical model, but the output has the same shape, so
//! the entity filter applies unchanged.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::models::{EntitySpan, Language, PartOfSpeech, TaggedToken};
use crate::services::entity_filter::{INTERROGATIVE_DETERMINER_TAG, WH_DETERMINER_TAG};
use crate::services::normalize::NormalizedText;

use super::{EntityParser, ParseError, ParserHandle, ParserLoadError, ParserLoader};

/// Characters split off the front of a word.
const LEADING_PUNCT: &[char] = &['"', '\'', '(', '[', '{', '¿', '¡', '“', '‘', '«'];
/// Characters split off the end of a word. '.' is handled separately.
const TRAILING_PUNCT: &[char] = &[
    ',', ';', ':', '!', '?', '"', '\'', ')', ']', '}', '”', '’', '»',
];
/// Punctuation that ends a sentence.
const SENTENCE_END: &[&str] = &[".", "!", "?", ";", ":", "...", "¿", "¡"];

/// Fine-grained tags emitted for each coarse category.
struct TagSet {
    determiner: &'static str,
    wh_determiner: &'static str,
    adposition: &'static str,
    proper_noun: &'static str,
    noun: &'static str,
    numeral: &'static str,
    pronoun: &'static str,
    conjunction: &'static str,
    subordinator: &'static str,
    auxiliary: &'static str,
    particle: &'static str,
    punctuation: &'static str,
}

struct Lexicon {
    stop_words: HashSet<&'static str>,
    determiners: HashSet<&'static str>,
    wh_determiners: HashSet<&'static str>,
    adpositions: HashSet<&'static str>,
    pronouns: HashSet<&'static str>,
    conjunctions: HashSet<&'static str>,
    subordinators: HashSet<&'static str>,
    auxiliaries: HashSet<&'static str>,
    /// Lowercase words allowed between two proper nouns of one name.
    connectors: HashSet<&'static str>,
    tags: TagSet,
}

fn set(words: &[&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

static ENGLISH: LazyLock<Lexicon> = LazyLock::new(|| Lexicon {
    stop_words: set(&[
        "a", "about", "above", "after", "again", "against", "all", "almost", "alone", "along",
        "already", "also", "although", "always", "am", "among", "amongst", "an", "and",
        "another", "any", "anyone", "anything", "are", "around", "as", "at", "back", "be",
        "became", "because", "become", "been", "before", "being", "below", "beside", "between",
        "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing",
        "done", "down", "during", "each", "either", "else", "enough", "even", "ever", "every",
        "few", "first", "for", "former", "from", "further", "had", "has", "have", "he", "her",
        "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in",
        "into", "is", "it", "its", "itself", "just", "last", "least", "less", "made", "many",
        "may", "me", "might", "more", "most", "much", "must", "my", "myself", "neither",
        "never", "next", "no", "nobody", "none", "nor", "not", "nothing", "now", "of", "off",
        "often", "on", "once", "one", "only", "onto", "or", "other", "others", "otherwise",
        "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps", "please", "put",
        "quite", "rather", "really", "regarding", "same", "say", "see", "seem", "several",
        "she", "should", "since", "so", "some", "something", "sometimes", "still", "such",
        "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there",
        "these", "they", "third", "this", "those", "though", "through", "throughout", "thus",
        "to", "together", "too", "toward", "towards", "under", "until", "up", "upon", "us",
        "used", "using", "various", "very", "via", "was", "we", "well", "were", "what",
        "whatever", "when", "whence", "whenever", "where", "whether", "which", "while", "who",
        "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
        "would", "yet", "you", "your", "yours", "yourself", "yourselves",
    ]),
    determiners: set(&[
        "the", "a", "an", "this", "that", "these", "those", "each", "every", "some", "any",
        "no", "another", "all", "both", "either", "neither",
    ]),
    wh_determiners: set(&["which", "what", "whatever", "whichever", "whose"]),
    adpositions: set(&[
        "of", "in", "on", "at", "by", "for", "with", "about", "against", "between", "into",
        "through", "during", "before", "after", "above", "below", "to", "from", "up", "down",
        "over", "under", "amid", "among", "across", "along", "around", "behind", "beside",
        "beyond", "near", "per", "since", "toward", "towards", "upon", "via", "within",
        "without", "despite", "except", "off", "onto", "throughout", "until",
    ]),
    pronouns: set(&[
        "i", "me", "my", "mine", "you", "your", "yours", "he", "him", "his", "she", "her",
        "hers", "it", "its", "we", "us", "our", "ours", "they", "them", "their", "theirs",
        "who", "whom", "myself", "yourself", "himself", "herself", "itself", "ourselves",
        "themselves",
    ]),
    conjunctions: set(&["and", "or", "but", "nor", "yet", "so"]),
    subordinators: set(&[
        "if", "because", "although", "though", "while", "whether", "unless", "than", "as",
    ]),
    auxiliaries: set(&[
        "is", "are", "was", "were", "be", "been", "being", "am", "has", "have", "had", "do",
        "does", "did", "will", "would", "can", "could", "may", "might", "must", "shall",
        "should",
    ]),
    connectors: set(&["of"]),
    tags: TagSet {
        determiner: "DT",
        wh_determiner: WH_DETERMINER_TAG,
        adposition: "IN",
        proper_noun: "NNP",
        noun: "NN",
        numeral: "CD",
        pronoun: "PRP",
        conjunction: "CC",
        subordinator: "IN",
        auxiliary: "MD",
        particle: "POS",
        punctuation: ".",
    },
});

static SPANISH: LazyLock<Lexicon> = LazyLock::new(|| Lexicon {
    stop_words: set(&[
        "a", "al", "algo", "algunas", "algunos", "ante", "antes", "como", "con", "contra",
        "cual", "cuando", "de", "del", "desde", "donde", "durante", "e", "el", "ella", "ellas",
        "ellos", "en", "entre", "era", "es", "esa", "esas", "ese", "eso", "esos", "esta",
        "estaba", "estas", "este", "esto", "estos", "fue", "fueron", "ha", "han", "hasta",
        "hay", "la", "las", "le", "les", "lo", "los", "más", "me", "mi", "mis", "mucho", "muy",
        "nada", "ni", "no", "nos", "nosotros", "o", "otra", "otros", "para", "pero", "poco",
        "por", "porque", "que", "qué", "quien", "quién", "se", "sea", "ser", "si", "sí", "sin",
        "sobre", "son", "su", "sus", "también", "tanto", "te", "tiene", "todo", "todos", "tu",
        "tus", "un", "una", "uno", "unos", "y", "ya", "yo",
    ]),
    determiners: set(&[
        "el", "la", "los", "las", "un", "una", "unos", "unas", "este", "esta", "estos",
        "estas", "ese", "esa", "esos", "esas", "aquel", "aquella", "su", "sus", "mi", "mis",
        "todo", "toda", "todos", "todas",
    ]),
    wh_determiners: set(&[
        "qué", "cuál", "cuáles", "cuánto", "cuánta", "cuántos", "cuántas",
    ]),
    adpositions: set(&[
        "a", "al", "ante", "bajo", "con", "contra", "de", "del", "desde", "durante", "en",
        "entre", "hacia", "hasta", "mediante", "para", "por", "según", "sin", "sobre", "tras",
    ]),
    pronouns: set(&[
        "yo", "tú", "él", "ella", "nosotros", "vosotros", "ellos", "ellas", "me", "te", "se",
        "nos", "le", "les", "lo", "quien", "quién",
    ]),
    conjunctions: set(&["y", "e", "o", "u", "ni", "pero", "sino"]),
    subordinators: set(&["que", "porque", "si", "aunque", "cuando", "como", "donde"]),
    auxiliaries: set(&[
        "es", "son", "era", "fue", "fueron", "ha", "han", "había", "ser", "estar", "está",
        "están", "sea",
    ]),
    connectors: set(&["de", "del"]),
    tags: TagSet {
        determiner: "DET__PronType=Art",
        wh_determiner: INTERROGATIVE_DETERMINER_TAG,
        adposition: "ADP__AdpType=Prep",
        proper_noun: "PROPN___",
        noun: "NOUN___",
        numeral: "NUM__NumForm=Digit",
        pronoun: "PRON___",
        conjunction: "CCONJ___",
        subordinator: "SCONJ___",
        auxiliary: "AUX___",
        particle: "PART___",
        punctuation: "PUNCT___",
    },
});

fn lexicon_for(language: Language) -> &'static Lexicon {
    match language {
        Language::English => &ENGLISH,
        Language::Spanish => &SPANISH,
    }
}

/// Split normalized text into word and punctuation tokens.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();

    for chunk in text.split_whitespace() {
        let mut rest = chunk;

        while let Some(c) = rest.chars().next() {
            if !LEADING_PUNCT.contains(&c) {
                break;
            }
            tokens.push(&rest[..c.len_utf8()]);
            rest = &rest[c.len_utf8()..];
        }

        let mut trailing = Vec::new();
        while let Some(c) = rest.chars().next_back() {
            let head = &rest[..rest.len() - c.len_utf8()];
            // "U.S." keeps its final period, "Madrid." does not.
            let split = TRAILING_PUNCT.contains(&c) || (c == '.' && !head.contains('.'));
            if !split {
                break;
            }
            trailing.push(&rest[head.len()..]);
            rest = head;
        }

        // Possessive clitic: "Trump's" -> "Trump" + "'s"
        if let Some(stem) = rest
            .strip_suffix("'s")
            .or_else(|| rest.strip_suffix("’s"))
            .filter(|stem| !stem.is_empty())
        {
            tokens.push(stem);
            tokens.push(&rest[stem.len()..]);
        } else if !rest.is_empty() {
            tokens.push(rest);
        }

        tokens.extend(trailing.into_iter().rev());
    }

    tokens
}

fn is_punctuation(word: &str) -> bool {
    word.chars().all(|c| !c.is_alphanumeric())
}

fn is_number(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
        && word
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '%' | '-'))
}

/// All-caps word of two or more letters ("US", "FBI", "U.S.").
fn is_acronym(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

/// Parser backed by closed-class word lists and capitalization.
pub struct LexiconParser {
    language: Language,
    lexicon: &'static Lexicon,
}

impl LexiconParser {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            lexicon: lexicon_for(language),
        }
    }

    fn classify(&self, word: &str, lower: &str) -> (PartOfSpeech, &'static str) {
        let lex = self.lexicon;
        let tags = &lex.tags;

        if is_punctuation(word) {
            return (PartOfSpeech::Punctuation, tags.punctuation);
        }
        if is_number(word) {
            return (PartOfSpeech::Numeral, tags.numeral);
        }
        if lower == "'s" || lower == "’s" {
            return (PartOfSpeech::Particle, tags.particle);
        }
        if is_acronym(word) {
            return (PartOfSpeech::ProperNoun, tags.proper_noun);
        }
        if lex.wh_determiners.contains(lower) {
            return (PartOfSpeech::Determiner, tags.wh_determiner);
        }
        if lex.determiners.contains(lower) {
            return (PartOfSpeech::Determiner, tags.determiner);
        }
        if lex.adpositions.contains(lower) {
            return (PartOfSpeech::Adposition, tags.adposition);
        }
        if lex.pronouns.contains(lower) {
            return (PartOfSpeech::Pronoun, tags.pronoun);
        }
        if lex.conjunctions.contains(lower) {
            return (PartOfSpeech::CoordinatingConjunction, tags.conjunction);
        }
        if lex.subordinators.contains(lower) {
            return (PartOfSpeech::SubordinatingConjunction, tags.subordinator);
        }
        if lex.auxiliaries.contains(lower) {
            return (PartOfSpeech::Auxiliary, tags.auxiliary);
        }
        if is_capitalized(word) {
            return (PartOfSpeech::ProperNoun, tags.proper_noun);
        }
        (PartOfSpeech::Noun, tags.noun)
    }

    /// Tag every token of `text`.
    pub fn tag(&self, text: &str) -> Vec<TaggedToken> {
        tokenize(text)
            .into_iter()
            .map(|word| {
                let lower = word.to_lowercase();
                let (pos, tag) = self.classify(word, &lower);
                let is_stop = self.lexicon.stop_words.contains(lower.as_str());
                TaggedToken::new(word, pos, tag).with_stop(is_stop)
            })
            .collect()
    }

    fn is_connector(&self, token: &TaggedToken) -> bool {
        self.lexicon.connectors.contains(token.text.as_str())
    }

    fn is_leading_determiner(&self, token: &TaggedToken) -> bool {
        token.pos == PartOfSpeech::Determiner && token.tag != self.lexicon.tags.wh_determiner
    }

    /// Group tagged tokens into entity candidates.
    fn spans(&self, tokens: &[TaggedToken]) -> Vec<EntitySpan> {
        let sentence_start: Vec<bool> = (0..tokens.len())
            .map(|i| i == 0 || SENTENCE_END.contains(&tokens[i - 1].text.as_str()))
            .collect();
        let is_propn = |i: usize| tokens.get(i).is_some_and(|t| t.pos == PartOfSpeech::ProperNoun);

        let mut spans = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            if !is_propn(i) {
                i += 1;
                continue;
            }

            let mut start = i;
            let mut end = i + 1;
            loop {
                if is_propn(end) {
                    end += 1;
                } else if end < tokens.len() && self.is_connector(&tokens[end]) && is_propn(end + 1) {
                    end += 2;
                } else {
                    break;
                }
            }

            if start > 0
                && !sentence_start[start - 1]
                && self.is_leading_determiner(&tokens[start - 1])
            {
                start -= 1;
            }

            spans.push(EntitySpan::new(tokens[start..end].to_vec()));
            i = end;
        }

        spans
    }
}

impl EntityParser for LexiconParser {
    fn model_name(&self) -> &str {
        self.language.model_name()
    }

    fn parse(&self, text: &NormalizedText) -> Result<Vec<EntitySpan>, ParseError> {
        let tokens = self.tag(text.as_str());
        Ok(self.spans(&tokens))
    }
}

/// Loader for [`LexiconParser`]; every known language has a lexicon.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconLoader;

impl ParserLoader for LexiconLoader {
    fn load(&self, language: Language) -> Result<ParserHandle, ParserLoadError> {
        Ok(Arc::new(LexiconParser::new(language)))
    }
}
