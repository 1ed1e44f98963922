//! Words that are never accepted as entities on their own.
//!
//! Loaded once at startup from a line-delimited list and shared read-only
//! afterwards. A missing list is a degraded state, not an error: filtering
//! just becomes less precise.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use tracing::{info, warn};

const BUNDLED_WORDS: &str = include_str!("../../resources/exclude_words.txt");

#[derive(Debug, Clone, Default)]
pub struct ExcludeWordSet {
    words: HashSet<String>,
}

impl ExcludeWordSet {
    /// An empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from in-memory words (lowercased).
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Parse a line-delimited word list.
    pub fn parse(contents: &str) -> Self {
        Self::from_words(contents.lines())
    }

    /// Load the word list at `path`.
    ///
    /// Returns an empty set (with a warning) when the file does not exist.
    /// Other I/O failures are returned to the caller.
    pub fn load(path: &Path) -> io::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let set = Self::parse(&contents);
                info!(
                    "Loaded {} exclude words from {}",
                    set.len(),
                    path.display()
                );
                Ok(set)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "Cannot find exclude word list at {}, entity filtering will be less precise",
                    path.display()
                );
                Ok(Self::empty())
            }
            Err(e) => Err(io::Error::new(
                e.kind(),
                format!(
                    "Failed to read exclude word list '{}': {}",
                    path.display(),
                    e
                ),
            )),
        }
    }

    /// The list shipped with the crate.
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_WORDS)
    }

    /// Load from an optional path; no path means the bundled list.
    pub fn load_optional(path: Option<&Path>) -> io::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let set = Self::bundled();
                info!("Using {} bundled exclude words", set.len());
                Ok(set)
            }
        }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, word: &str) -> bool {
        if self.words.contains(word) {
            return true;
        }
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
