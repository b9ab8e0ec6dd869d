use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use super::ac::AcFilter;
use super::char_trait::FilterChar;
use super::dfa::DfaFilter;
use super::error::FilterError;
use super::Filter;

/// Trait for types that can be used as a dictionary word.
///
/// Implemented for common string and sequence types so that insertion and
/// removal accept them directly without manual conversion.
pub trait IntoWord<C: FilterChar> {
    /// Collects this word into a label buffer.
    fn collect_word(self) -> SmallVec<[C; 32]>;
}

// String types → char

impl IntoWord<char> for &str {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord<char> for &&str {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord<char> for String {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord<char> for &String {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

// Generic sequence types → C

impl<C: FilterChar> IntoWord<C> for &[C] {
    fn collect_word(self) -> SmallVec<[C; 32]> {
        self.iter().copied().collect()
    }
}

impl<C: FilterChar> IntoWord<C> for Vec<C> {
    fn collect_word(self) -> SmallVec<[C; 32]> {
        self.into_iter().collect()
    }
}

impl<C: FilterChar> IntoWord<C> for &Vec<C> {
    fn collect_word(self) -> SmallVec<[C; 32]> {
        self.iter().copied().collect()
    }
}

impl<C: FilterChar, const N: usize> IntoWord<C> for [C; N] {
    fn collect_word(self) -> SmallVec<[C; 32]> {
        self.into_iter().collect()
    }
}

impl<C: FilterChar, const N: usize> IntoWord<C> for &[C; N] {
    fn collect_word(self) -> SmallVec<[C; 32]> {
        self.iter().copied().collect()
    }
}

/// The matching engine behind a filter, chosen once at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Engine {
    /// Aho-Corasick automaton: one pass over the text, fail pointers rebuilt per batch.
    #[default]
    Ac,
    /// Trie walk restarted at every offset: no rebuild, O(text × longest word) scans.
    Dfa,
}

impl Engine {
    /// The name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Engine::Ac => "ac",
            Engine::Dfa => "dfa",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Engine {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ac" | "aho-corasick" => Ok(Engine::Ac),
            "dfa" => Ok(Engine::Dfa),
            _ => Err(FilterError::UnknownEngine(s.to_string())),
        }
    }
}

/// A builder for filters whose engine is picked at runtime.
///
/// # Examples
///
/// ```
/// use libsensitive::filter::{Engine, FilterBuilder};
///
/// let engine: Engine = "dfa".parse().unwrap();
/// let filter = FilterBuilder::new()
///     .engine(engine)
///     .words(["敏感词1", "敏感词2"])
///     .build();
///
/// assert_eq!(filter.engine(), Engine::Dfa);
/// assert!(filter.is_sensitive("这是敏感词2"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct FilterBuilder {
    engine: Engine,
    words: Vec<String>,
}

impl FilterBuilder {
    /// Creates a builder for an empty Aho-Corasick filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the matching engine.
    pub fn engine(mut self, engine: Engine) -> Self {
        self.engine = engine;
        self
    }

    /// Adds words to the initial dictionary.
    pub fn words<W: Into<String>>(mut self, words: impl IntoIterator<Item = W>) -> Self {
        self.words.extend(words.into_iter().map(Into::into));
        self
    }

    /// Builds the filter. The Aho-Corasick engine computes its fail pointers here.
    pub fn build(self) -> Box<dyn Filter> {
        build_filter(self.engine, self.words)
    }
}

/// Builds a filter using `engine` over an initial dictionary.
pub fn build_filter<W>(engine: Engine, words: impl IntoIterator<Item = W>) -> Box<dyn Filter>
where
    W: IntoWord<char>,
{
    match engine {
        Engine::Ac => Box::new(AcFilter::from_words(words)),
        Engine::Dfa => Box::new(DfaFilter::from_words(words)),
    }
}
