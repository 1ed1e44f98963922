//! Languages the extractor can be configured for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A language with a known parser model.
///
/// Whether a language is actually served is decided by the configured
/// whitelist, not by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    Spanish,
}

impl Language {
    /// Every language with a known parser model.
    pub const ALL: [Language; 2] = [Language::English, Language::Spanish];

    /// Two-letter abbreviation used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
        }
    }

    /// Full lowercase language name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Spanish => "spanish",
        }
    }

    /// Identifier of the parser model serving this language.
    pub fn model_name(&self) -> &'static str {
        match self {
            Self::English => "en_core_web_md",
            Self::Spanish => "es_core_news_md",
        }
    }

    /// Look up a language by its two-letter abbreviation.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
    }

    /// Look up a language by abbreviation, full name, or parser model name.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::from_code(value).or_else(|| {
            Self::ALL.into_iter().find(|lang| {
                lang.name().eq_ignore_ascii_case(value) || lang.model_name() == value
            })
        })
    }

    /// Map a request's abbreviation onto a language, falling back to
    /// `default` when it is missing or unknown.
    pub fn resolve(abbreviation: Option<&str>, default: Language) -> Language {
        match abbreviation.map(str::trim).filter(|s| !s.is_empty()) {
            Some(abbrev) => Self::from_code(abbrev).unwrap_or_else(|| {
                tracing::warn!(
                    "Unknown or unsupported language abbreviation {:?}, using {}",
                    abbrev,
                    default
                );
                default
            }),
            None => default,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no known language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language: {0}")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("en"), Some(Language::English));
        assert_eq!(Language::from_code("ES"), Some(Language::Spanish));
        assert_eq!(Language::from_code(" es "), Some(Language::Spanish));
        assert_eq!(Language::from_code("xx"), None);
        assert_eq!(Language::from_code("english"), None);
    }

    #[test]
    fn test_parse_accepts_names_and_models() {
        assert_eq!(Language::parse("english"), Some(Language::English));
        assert_eq!(Language::parse("Spanish"), Some(Language::Spanish));
        assert_eq!(Language::parse("es_core_news_md"), Some(Language::Spanish));
        assert_eq!(Language::parse("en_core_web_md"), Some(Language::English));
        assert_eq!(Language::parse("klingon"), None);
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        assert_eq!(
            Language::resolve(Some("xx"), Language::English),
            Language::English
        );
        assert_eq!(Language::resolve(None, Language::Spanish), Language::Spanish);
        assert_eq!(Language::resolve(Some("  "), Language::English), Language::English);
        assert_eq!(
            Language::resolve(Some("es"), Language::English),
            Language::Spanish
        );
    }

    #[test]
    fn test_resolve_only_accepts_abbreviations() {
        // Requests carry two-letter codes; full names are a config-file convenience.
        assert_eq!(
            Language::resolve(Some("spanish"), Language::English),
            Language::English
        );
    }

    #[test]
    fn test_from_str_error() {
        let err = "zz".parse::<Language>().unwrap_err();
        assert_eq!(err, UnknownLanguage("zz".to_string()));
        assert_eq!("es".parse::<Language>().unwrap(), Language::Spanish);
    }

    #[test]
    fn test_display_uses_name() {
        assert_eq!(Language::Spanish.to_string(), "spanish");
    }
}
