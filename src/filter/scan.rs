//! The match stream shared by both engines and the operations built on it.

use std::ops::Range;

use hashbrown::{HashMap, HashSet};

use super::char_trait::FilterChar;

/// A dictionary word found in scanned text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match<'t, C: FilterChar> {
    /// Offset of the first matched label.
    pub start: usize,
    /// Offset one past the last matched label.
    pub end: usize,
    /// The dictionary word, as it was inserted.
    pub word: &'t [C],
}

impl<C: FilterChar> Match<'_, C> {
    /// The matched range of the scanned text.
    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Number of labels matched.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false; dictionary words are never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A scanner producing every dictionary occurrence in a text.
///
/// Implementors only provide [`matches`](Scan::matches); the order in which
/// that stream reports matches defines what the provided operations return.
/// Every operation runs a fresh scan over its whole input.
pub trait Scan<C: FilterChar> {
    /// Iterator over the matches of one scan.
    type Matches<'a>: Iterator<Item = Match<'a, C>>
    where
        Self: 'a;

    /// Scans `text` and lazily yields every match, in engine order.
    fn matches<'a>(&'a self, text: &'a [C]) -> Self::Matches<'a>;

    /// Distinct matched words, in the order they were first reported.
    fn collect_words<'a>(&'a self, text: &'a [C]) -> Vec<&'a [C]> {
        let mut seen = HashSet::new();
        self.matches(text)
            .map(|m| m.word)
            .filter(|word| seen.insert(*word))
            .collect()
    }

    /// Number of occurrences of every matched word.
    fn count_words<'a>(&'a self, text: &'a [C]) -> HashMap<&'a [C], usize> {
        let mut counts = HashMap::new();
        for m in self.matches(text) {
            *counts.entry(m.word).or_insert(0) += 1;
        }
        counts
    }

    /// The first reported match, if any.
    fn first_word<'a>(&'a self, text: &'a [C]) -> Option<&'a [C]> {
        self.matches(text).next().map(|m| m.word)
    }

    /// True if the text contains at least one dictionary word.
    fn has_match(&self, text: &[C]) -> bool {
        self.matches(text).next().is_some()
    }

    /// Returns a copy of `text` with every matched label replaced by `filler`.
    ///
    /// Spans come from a scan of the unmodified text, so overlapping and
    /// nested matches are all covered.
    fn mask(&self, text: &[C], filler: C) -> Vec<C> {
        let mut masked = text.to_vec();
        for m in self.matches(text) {
            debug_assert!(m.end <= masked.len(), "match {:?} outside text", m.span());
            masked[m.span()].fill(filler);
        }
        masked
    }

    /// Returns a copy of `text` without any matched label.
    ///
    /// Matches are applied in stream order; a match lying inside an
    /// already stripped span removes nothing further.
    fn strip(&self, text: &[C]) -> Vec<C> {
        let mut keep = vec![true; text.len()];
        let mut stripped = 0;
        for m in self.matches(text) {
            debug_assert!(m.end <= keep.len(), "match {:?} outside text", m.span());
            for slot in &mut keep[m.span()] {
                stripped += usize::from(*slot);
                *slot = false;
            }
        }
        if stripped == 0 {
            return text.to_vec();
        }
        text.iter()
            .zip(keep)
            .filter_map(|(&ch, kept)| kept.then_some(ch))
            .collect()
    }
}
