//! Text normalization applied before every parse.
//!
//! Strips content that is irrelevant to entity recognition (retweet markers,
//! URIs, hashtags, mentions) and collapses whitespace. Rules are applied in
//! order, each as a full pass over the text.

use std::fmt;
use std::ops::Deref;
use std::sync::LazyLock;

use regex::Regex;

/// Ordered pattern/replacement rules.
///
/// Retweet markers must be removed before mentions, otherwise the mention
/// rule eats the handle and leaves a bare "RT" behind.
static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        // retweet
        (Regex::new(r"RT @\w+").unwrap(), ""),
        // uri
        (Regex::new(r"https?://\S+").unwrap(), ""),
        // hashtag
        (Regex::new(r"#\w*").unwrap(), ""),
        // mention
        (Regex::new(r"@\w*").unwrap(), ""),
        // whitespace [ \t\n\r\f\v]
        (Regex::new(r"[ \t\n\r\x0C\x0B]").unwrap(), " "),
    ]
});

/// Runs of spaces, collapsed last to catch those created by the rules above.
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"  +").unwrap());

/// Text that has been through [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for NormalizedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn apply_rules(text: &str) -> String {
    let mut text = text.to_string();
    for (regex, replacement) in RULES.iter() {
        text = regex.replace_all(&text, *replacement).into_owned();
    }
    SPACES.replace_all(&text, " ").into_owned()
}

/// Normalize text for entity recognition.
///
/// A removal can splice together a new marker (stripping the hashtag from
/// `http#x://host` yields a URI), so the rule list is re-applied until the
/// text stops changing. Every pass that changes the text either shortens it
/// or turns a whitespace character into a space, so this terminates.
pub fn normalize(text: &str) -> NormalizedText {
    let mut current = apply_rules(text);
    loop {
        let next = apply_rules(&current);
        if next == current {
            return NormalizedText(current);
        }
        current = next;
    }
}
