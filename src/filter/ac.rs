//! Aho-Corasick engine: the dictionary trie plus fail pointers.

use std::collections::VecDeque;

use log::trace;

use super::builder::{Engine, IntoWord};
use super::char_trait::FilterChar;
use super::node_arena::NodeId;
use super::scan::{Match, Scan};
use super::sealed::Mutate;
use super::trie::Trie;
use super::Dictionary;

/// A filter scanning text in one pass with an Aho-Corasick automaton.
///
/// At each text position the scan reports every dictionary word ending
/// there, longest first. Scans cost O(text length + number of matches).
///
/// Fail pointers are recomputed from scratch after each batch of mutations:
/// once per call to [`add_words`](AcFilter::add_words),
/// [`del_words`](AcFilter::del_words) or [`Filter::apply`](super::Filter::apply).
/// No public method leaves the pointers stale.
///
/// # Examples
///
/// ```
/// use libsensitive::filter::{AcFilter, Filter};
///
/// let filter = AcFilter::from_words(["he", "she", "hers"]);
/// assert_eq!(filter.find_all("ushers"), ["she", "he", "hers"]);
/// assert_eq!(filter.replace("ushers", '*'), "u*****");
/// ```
pub struct AcFilter<C: FilterChar = char> {
    trie: Trie<C>,
    /// Fail pointer of every node, indexed by [`NodeId::index`].
    fail: Vec<NodeId>,
    dirty: bool,
}

impl<C: FilterChar> Default for AcFilter<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FilterChar> AcFilter<C> {
    /// Creates a filter with an empty dictionary.
    pub fn new() -> Self {
        AcFilter {
            trie: Trie::new(),
            fail: vec![NodeId::ROOT],
            dirty: false,
        }
    }

    /// Creates a filter from an initial dictionary and builds its fail pointers.
    pub fn from_words<W: IntoWord<C>>(words: impl IntoIterator<Item = W>) -> Self {
        let mut filter = AcFilter {
            trie: Trie::from_words(words),
            fail: Vec::new(),
            dirty: true,
        };
        filter.build_fail_links();
        filter
    }

    /// Adds words and rebuilds the fail pointers once.
    ///
    /// Returns how many of the words were new.
    pub fn add_words<W: IntoWord<C>>(&mut self, words: impl IntoIterator<Item = W>) -> usize {
        let added = words
            .into_iter()
            .map(|word| usize::from(self.trie.insert(word)))
            .sum();
        self.build_fail_links();
        added
    }

    /// Removes words and rebuilds the fail pointers once.
    ///
    /// Absent words are ignored. Returns how many words were removed.
    pub fn del_words<W: IntoWord<C>>(&mut self, words: impl IntoIterator<Item = W>) -> usize {
        let removed = words
            .into_iter()
            .map(|word| usize::from(self.trie.remove(word)))
            .sum();
        self.build_fail_links();
        removed
    }

    /// The dictionary trie.
    pub fn trie(&self) -> &Trie<C> {
        &self.trie
    }

    /// The fail pointer of `id`: the node for the longest proper suffix of
    /// `id`'s prefix that is itself a prefix in the trie, or the root.
    #[inline]
    pub fn fail(&self, id: NodeId) -> NodeId {
        self.fail.get(id.index()).copied().unwrap_or(NodeId::ROOT)
    }

    /// Recomputes every fail pointer with a breadth-first pass over the trie.
    fn build_fail_links(&mut self) {
        let trie = &self.trie;
        let mut fail = vec![NodeId::ROOT; trie.capacity()];
        let mut queue = VecDeque::with_capacity(trie.node_count());

        // Children of the root fail to the root.
        queue.extend(trie.node(trie.root()).children().map(|(_, child)| child));

        while let Some(id) = queue.pop_front() {
            for (ch, child) in trie.node(id).children() {
                let mut candidate = fail[id.index()];
                fail[child.index()] = loop {
                    if let Some(next) = trie.child(candidate, ch) {
                        break next;
                    }
                    if candidate == trie.root() {
                        break trie.root();
                    }
                    candidate = fail[candidate.index()];
                };
                queue.push_back(child);
            }
        }

        trace!(
            "rebuilt fail pointers for {} words over {} nodes",
            trie.len(),
            trie.node_count()
        );
        self.fail = fail;
        self.dirty = false;
    }

    /// Advances the automaton from `node` over `ch`, following fail pointers
    /// on mismatch. Ends at the root when no suffix can be extended.
    #[inline]
    fn step(&self, mut node: NodeId, ch: C) -> NodeId {
        loop {
            if let Some(next) = self.trie.child(node, ch) {
                return next;
            }
            if node == self.trie.root() {
                return node;
            }
            node = self.fail(node);
        }
    }
}

impl<C: FilterChar> Mutate<C> for AcFilter<C> {
    fn insert_word(&mut self, word: &[C]) -> bool {
        let added = self.trie.insert(word);
        self.dirty |= added;
        added
    }

    fn remove_word(&mut self, word: &[C]) -> bool {
        let removed = self.trie.remove(word);
        self.dirty |= removed;
        removed
    }

    fn commit(&mut self) {
        if self.dirty {
            self.build_fail_links();
        }
    }
}

impl<C: FilterChar> Dictionary<C> for AcFilter<C> {
    const ENGINE: Engine = Engine::Ac;

    fn contains_word(&self, word: &[C]) -> bool {
        self.trie.contains(word)
    }

    fn word_count(&self) -> usize {
        self.trie.len()
    }
}

impl<C: FilterChar> Scan<C> for AcFilter<C> {
    type Matches<'a> = AcMatches<'a, C>;

    fn matches<'a>(&'a self, text: &'a [C]) -> AcMatches<'a, C> {
        debug_assert!(!self.dirty, "scanning before fail pointers were rebuilt");
        AcMatches {
            filter: self,
            text,
            pos: 0,
            state: NodeId::ROOT,
            output: NodeId::ROOT,
        }
    }
}

impl<C: FilterChar> std::fmt::Debug for AcFilter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcFilter").field("trie", &self.trie).finish()
    }
}

/// Iterator over the matches of an [`AcFilter`] scan.
///
/// Matches are ordered by end position; matches ending at the same
/// position come innermost (longest) first.
pub struct AcMatches<'a, C: FilterChar> {
    filter: &'a AcFilter<C>,
    text: &'a [C],
    /// Number of labels consumed so far.
    pos: usize,
    state: NodeId,
    /// Next node of the fail chain to report from; root when exhausted.
    output: NodeId,
}

impl<'a, C: FilterChar> Iterator for AcMatches<'a, C> {
    type Item = Match<'a, C>;

    fn next(&mut self) -> Option<Match<'a, C>> {
        let filter = self.filter;
        loop {
            while self.output != NodeId::ROOT {
                let node = filter.trie.node(self.output);
                self.output = filter.fail(self.output);
                if let Some(word) = node.word() {
                    debug_assert!(word.len() <= self.pos);
                    return Some(Match {
                        start: self.pos - word.len(),
                        end: self.pos,
                        word,
                    });
                }
            }
            let &ch = self.text.get(self.pos)?;
            self.state = filter.step(self.state, ch);
            self.pos += 1;
            self.output = self.state;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::filter::{Batch, Filter};

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn node(filter: &AcFilter, prefix: &str) -> NodeId {
        filter.trie().find(&chars(prefix)).unwrap()
    }

    #[test]
    fn fail_pointers_follow_longest_suffix() {
        let filter = AcFilter::from_words(["he", "she", "his", "hers"]);
        let root = filter.trie().root();
        assert_eq!(filter.fail(node(&filter, "h")), root);
        assert_eq!(filter.fail(node(&filter, "s")), root);
        assert_eq!(filter.fail(node(&filter, "sh")), node(&filter, "h"));
        assert_eq!(filter.fail(node(&filter, "she")), node(&filter, "he"));
        assert_eq!(filter.fail(node(&filter, "hers")), node(&filter, "s"));
        assert_eq!(filter.fail(node(&filter, "his")), node(&filter, "s"));
        assert_eq!(filter.fail(node(&filter, "he")), root);
    }

    #[test]
    fn matches_report_spans_innermost_first() {
        let filter = AcFilter::from_words(["he", "she", "hers"]);
        let text = chars("ushers");
        let spans: Vec<_> = filter.matches(&text).map(|m| (m.start, m.end)).collect();
        assert_eq!(spans, [(1, 4), (2, 4), (2, 6)]);
    }

    #[test]
    fn mismatch_falls_back_through_fail_chain() {
        let filter = AcFilter::from_words(["abcd", "bce"]);
        assert_eq!(filter.find_all("abce"), ["bce"]);
        assert_eq!(filter.find_one("xxabcdx").as_deref(), Some("abcd"));
    }

    #[test]
    fn rebuild_after_mutation() {
        let mut filter = AcFilter::from_words(["abc"]);
        assert!(!filter.is_sensitive("xbc"));
        assert_eq!(filter.add_words(["bc", "abc"]), 1);
        assert_eq!(filter.find_all("xabc"), ["abc", "bc"]);
        assert_eq!(filter.del_words(["abc", "zzz"]), 1);
        assert_eq!(filter.find_all("xabc"), ["bc"]);
    }

    #[test]
    fn dictionary_commit_rebuilds_once() {
        let mut filter: AcFilter = AcFilter::new();
        assert!(filter.insert_word(&chars("ab")));
        assert!(filter.insert_word(&chars("b")));
        filter.commit();
        assert_eq!(filter.find_all("ab"), ["ab", "b"]);
        assert_eq!(filter.fail(node(&filter, "ab")), node(&filter, "b"));
    }

    #[test]
    fn reused_slots_get_fresh_fail_pointers() {
        let mut filter = AcFilter::from_words(["xyz", "yz"]);
        filter.del_words(["xyz"]);
        filter.add_words(["qy"]);
        assert_eq!(filter.find_all("qyz"), ["qy", "yz"]);
        assert_eq!(filter.fail(node(&filter, "qy")), node(&filter, "y"));
    }

    #[test]
    fn batch_with_deletes_leaves_no_stale_fail_pointers() {
        let mut filter = AcFilter::from_words(["ab", "b"]);
        let mut batch = Batch::new();
        batch.delete("ab").add("xy");
        filter.apply(batch);
        assert_eq!(filter.find_all("xy"), ["xy"]);
        assert_eq!(filter.find_all("ab"), ["b"]);
    }

    #[test]
    fn reused_slots_never_report_freed_words() {
        let mut filter = AcFilter::from_words(["zzab", "ab"]);
        filter.del_words(["zzab"]);
        filter.add_words(["q", "r", "s", "t"]);
        assert_eq!(filter.find_all("t"), ["t"]);
        assert_eq!(filter.replace("t", '*'), "*");
        assert_eq!(filter.replace("zzab", '*'), "zz**");
    }

    #[test]
    fn nested_suffix_remove_is_innermost_first() {
        let filter = AcFilter::from_words(["abc", "bc"]);
        assert_eq!(filter.remove("xabcx"), "xx");
        assert_eq!(filter.remove("xbcx"), "xx");
    }

    #[test]
    fn overlapping_matches_are_all_masked() {
        let filter = AcFilter::from_words(["ab", "bcd"]);
        assert_eq!(filter.replace("abcde", '#'), "####e");
        assert_eq!(filter.remove("abcde"), "e");
    }

    #[test]
    fn generic_u8_scan() {
        let filter: AcFilter<u8> = AcFilter::from_words([b"ab".as_slice(), b"b".as_slice()]);
        let text: &[u8] = b"cabb";
        assert_eq!(
            filter.collect_words(text),
            [b"ab".as_slice(), b"b".as_slice()]
        );
        assert_eq!(filter.mask(text, b'-'), b"c---");
        assert_eq!(filter.strip(text), b"c");
    }
}
