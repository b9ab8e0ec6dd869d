//! Trie-walk engine: restarts the walk one label later after every attempt.

use super::builder::{Engine, IntoWord};
use super::char_trait::FilterChar;
use super::node_arena::NodeId;
use super::scan::{Match, Scan};
use super::sealed::Mutate;
use super::trie::Trie;
use super::Dictionary;

/// A filter that walks the dictionary trie from every start offset of the text.
///
/// Despite the name this is not a compiled automaton: for each start offset
/// the trie is walked until it mismatches or the text ends, then the walk
/// restarts one label later. A scan costs O(text length × longest word),
/// but mutations need no rebuild.
///
/// # Examples
///
/// ```
/// use libsensitive::filter::{DfaFilter, Filter};
///
/// let filter = DfaFilter::from_words(["ab", "abc", "cd"]);
/// assert_eq!(filter.find_all("abcd"), ["ab", "abc", "cd"]);
/// assert_eq!(filter.remove("xabcx"), "xcx");
/// ```
pub struct DfaFilter<C: FilterChar = char> {
    trie: Trie<C>,
}

impl<C: FilterChar> Default for DfaFilter<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FilterChar> DfaFilter<C> {
    /// Creates a filter with an empty dictionary.
    pub fn new() -> Self {
        DfaFilter { trie: Trie::new() }
    }

    /// Creates a filter from an initial dictionary.
    pub fn from_words<W: IntoWord<C>>(words: impl IntoIterator<Item = W>) -> Self {
        DfaFilter {
            trie: Trie::from_words(words),
        }
    }

    /// Adds words, returning how many of them were new.
    pub fn add_words<W: IntoWord<C>>(&mut self, words: impl IntoIterator<Item = W>) -> usize {
        words
            .into_iter()
            .map(|word| usize::from(self.trie.insert(word)))
            .sum()
    }

    /// Removes words, returning how many were present. Absent words are ignored.
    pub fn del_words<W: IntoWord<C>>(&mut self, words: impl IntoIterator<Item = W>) -> usize {
        words
            .into_iter()
            .map(|word| usize::from(self.trie.remove(word)))
            .sum()
    }

    /// The dictionary trie.
    pub fn trie(&self) -> &Trie<C> {
        &self.trie
    }

    /// Length of the shortest dictionary word starting at `text[start]`.
    fn shortest_match_at(&self, text: &[C], start: usize) -> Option<usize> {
        let mut node = self.trie.root();
        for (i, &ch) in text[start..].iter().enumerate() {
            node = self.trie.child(node, ch)?;
            if self.trie.node(node).is_word() {
                return Some(i + 1);
            }
        }
        None
    }
}

impl<C: FilterChar> Mutate<C> for DfaFilter<C> {
    fn insert_word(&mut self, word: &[C]) -> bool {
        self.trie.insert(word)
    }

    fn remove_word(&mut self, word: &[C]) -> bool {
        self.trie.remove(word)
    }

    fn commit(&mut self) {}
}

impl<C: FilterChar> Dictionary<C> for DfaFilter<C> {
    const ENGINE: Engine = Engine::Dfa;

    fn contains_word(&self, word: &[C]) -> bool {
        self.trie.contains(word)
    }

    fn word_count(&self) -> usize {
        self.trie.len()
    }
}

impl<C: FilterChar> Scan<C> for DfaFilter<C> {
    type Matches<'a> = DfaMatches<'a, C>;

    fn matches<'a>(&'a self, text: &'a [C]) -> DfaMatches<'a, C> {
        DfaMatches {
            trie: &self.trie,
            text,
            start: 0,
            pos: 0,
            node: NodeId::ROOT,
        }
    }

    /// Single forward pass: at each offset the shortest word starting there
    /// is skipped, otherwise the label is kept and the pass moves one label on.
    ///
    /// Unlike the Aho-Corasick strip, a word overlapping the tail of an
    /// already skipped word is not seen.
    fn strip(&self, text: &[C]) -> Vec<C> {
        let mut kept = Vec::with_capacity(text.len());
        let mut start = 0;
        while start < text.len() {
            match self.shortest_match_at(text, start) {
                Some(len) => start += len,
                None => {
                    kept.push(text[start]);
                    start += 1;
                }
            }
        }
        kept
    }
}

impl<C: FilterChar> std::fmt::Debug for DfaFilter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DfaFilter").field("trie", &self.trie).finish()
    }
}

/// Iterator over the matches of a [`DfaFilter`] scan.
///
/// Matches are ordered by start offset; matches starting at the same offset
/// come shortest first.
pub struct DfaMatches<'a, C: FilterChar> {
    trie: &'a Trie<C>,
    text: &'a [C],
    /// Leftmost label of the current attempt.
    start: usize,
    /// Next label to feed the walk.
    pos: usize,
    node: NodeId,
}

impl<'a, C: FilterChar> Iterator for DfaMatches<'a, C> {
    type Item = Match<'a, C>;

    fn next(&mut self) -> Option<Match<'a, C>> {
        let trie = self.trie;
        while self.start < self.text.len() {
            let next = self
                .text
                .get(self.pos)
                .and_then(|&ch| trie.child(self.node, ch));
            match next {
                Some(child) => {
                    self.node = child;
                    self.pos += 1;
                    if let Some(word) = trie.node(child).word() {
                        return Some(Match {
                            start: self.start,
                            end: self.pos,
                            word,
                        });
                    }
                }
                None => {
                    self.start += 1;
                    self.pos = self.start;
                    self.node = trie.root();
                }
            }
        }
        None
    }
}
