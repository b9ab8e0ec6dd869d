/// Aho-Corasick engine.
pub mod ac;
/// Ordered dictionary mutation batches.
pub mod batch;
/// Word conversion and runtime engine selection.
pub mod builder;
/// Trait for types that can serve as trie edge labels.
pub mod char_trait;
/// Trie node and children module containing the core tree structures.
pub mod children;
/// Trie-walk engine.
pub mod dfa;
/// Error types.
pub mod error;
/// Index arena backing the trie.
pub mod node_arena;
/// The match stream and the operations built on it.
pub mod scan;
/// The dictionary trie.
pub mod trie;

pub use ac::AcFilter;
pub use batch::{Batch, BatchReport, Mutation};
pub use builder::{build_filter, Engine, FilterBuilder, IntoWord};
pub use char_trait::FilterChar;
pub use dfa::DfaFilter;
pub use error::FilterError;
pub use scan::{Match, Scan};

use hashbrown::HashMap;
use log::debug;
use smallvec::SmallVec;

pub(crate) mod sealed {
    use super::FilterChar;

    /// Raw dictionary edits. Each may leave derived engine state stale until
    /// `commit` runs, so only this crate can call them.
    pub trait Mutate<C: FilterChar> {
        /// Adds a word. Returns `false` if it was already present or is empty.
        fn insert_word(&mut self, word: &[C]) -> bool;

        /// Removes a word. Returns `false` if it was not present.
        fn remove_word(&mut self, word: &[C]) -> bool;

        /// Brings derived engine state up to date after a run of edits.
        fn commit(&mut self);
    }
}

use sealed::Mutate;

/// A dictionary behind a matching engine.
///
/// This trait is sealed. Dictionaries change through [`Filter::apply`] or an
/// engine's own `add_words` / `del_words`, which always leave the engine
/// ready to scan.
///
/// ```compile_fail
/// use libsensitive::filter::{AcFilter, Dictionary};
///
/// let mut filter: AcFilter = AcFilter::new();
/// filter.insert_word(&['a']);
/// ```
pub trait Dictionary<C: FilterChar>: Mutate<C> {
    /// The engine implementing this dictionary.
    const ENGINE: Engine;

    /// True if the word is in the dictionary.
    fn contains_word(&self, word: &[C]) -> bool;

    /// Number of words in the dictionary.
    fn word_count(&self) -> usize;
}

/// The text-level matcher interface shared by both engines.
///
/// All offsets and lengths are in Unicode scalar values, never bytes.
/// Every engine implementing [`Scan<char>`] and [`Dictionary<char>`] gets
/// this trait, and it is object safe so the engine can be chosen at runtime
/// (see [`FilterBuilder`]).
///
/// # Examples
///
/// ```
/// use libsensitive::filter::{AcFilter, Batch, Filter};
///
/// let mut filter = AcFilter::from_words(["敏感词1", "敏感词2"]);
/// let text = "敏感词1,这是敏感词2,这是敏感词1";
///
/// assert_eq!(filter.find_all(text), ["敏感词1", "敏感词2"]);
/// assert_eq!(filter.find_all_count(text)["敏感词1"], 2);
/// assert_eq!(filter.replace(text, '*'), "****,这是****,这是****");
/// assert_eq!(filter.remove(text), ",这是,这是");
///
/// filter.apply(Batch::from_parts(["这是"], ["敏感词1"]));
/// assert_eq!(filter.find_one(text).as_deref(), Some("这是"));
/// ```
pub trait Filter: Send + Sync {
    /// Distinct dictionary words found in `text`, in the order first reported.
    fn find_all(&self, text: &str) -> Vec<String>;

    /// Number of occurrences of every dictionary word found in `text`.
    fn find_all_count(&self, text: &str) -> HashMap<String, usize>;

    /// The first dictionary word reported for `text`, if any.
    fn find_one(&self, text: &str) -> Option<String>;

    /// True if `text` contains any dictionary word.
    fn is_sensitive(&self, text: &str) -> bool;

    /// `text` with every character of every match replaced by `filler`.
    fn replace(&self, text: &str, filler: char) -> String;

    /// `text` with matched words deleted.
    fn remove(&self, text: &str) -> String;

    /// Applies a batch of mutations in order, then brings the engine up to date once.
    fn apply(&mut self, batch: Batch) -> BatchReport;

    /// Number of words in the dictionary.
    fn len(&self) -> usize;

    /// True if the dictionary holds no words.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The engine behind this filter.
    fn engine(&self) -> Engine;
}

fn to_chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

fn word_string(word: &[char]) -> String {
    word.iter().collect()
}

impl<T> Filter for T
where
    T: Scan<char> + Dictionary<char> + Send + Sync,
{
    fn find_all(&self, text: &str) -> Vec<String> {
        let text = to_chars(text);
        self.collect_words(&text)
            .into_iter()
            .map(word_string)
            .collect()
    }

    fn find_all_count(&self, text: &str) -> HashMap<String, usize> {
        let text = to_chars(text);
        self.count_words(&text)
            .into_iter()
            .map(|(word, count)| (word_string(word), count))
            .collect()
    }

    fn find_one(&self, text: &str) -> Option<String> {
        let text = to_chars(text);
        self.first_word(&text).map(word_string)
    }

    fn is_sensitive(&self, text: &str) -> bool {
        self.has_match(&to_chars(text))
    }

    fn replace(&self, text: &str, filler: char) -> String {
        self.mask(&to_chars(text), filler).into_iter().collect()
    }

    fn remove(&self, text: &str) -> String {
        self.strip(&to_chars(text)).into_iter().collect()
    }

    fn apply(&mut self, batch: Batch) -> BatchReport {
        let mut report = BatchReport::default();
        if batch.is_empty() {
            return report;
        }
        for mutation in &batch {
            let word: SmallVec<[char; 32]> = mutation.word().chars().collect();
            let changed = match mutation {
                Mutation::Add(_) => {
                    let added = self.insert_word(&word);
                    report.added += usize::from(added);
                    added
                }
                Mutation::Delete(_) => {
                    let removed = self.remove_word(&word);
                    report.removed += usize::from(removed);
                    removed
                }
            };
            report.ignored += usize::from(!changed);
        }
        if report.changed() {
            self.commit();
        }
        debug!(
            "{} filter applied {} events: {} added, {} removed, {} ignored",
            T::ENGINE,
            batch.len(),
            report.added,
            report.removed,
            report.ignored
        );
        report
    }

    fn len(&self) -> usize {
        self.word_count()
    }

    fn engine(&self) -> Engine {
        T::ENGINE
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const WORDS: [&str; 3] = ["敏感词1", "敏感词2", "敏感词3"];
    const TEXT: &str = "敏感词1,这是敏感词2,这是敏感词3,这是敏感词1,这里没有敏感词";

    fn engines(words: &[&str]) -> [Box<dyn Filter>; 2] {
        [
            build_filter(Engine::Ac, words),
            build_filter(Engine::Dfa, words),
        ]
    }

    #[test]
    fn find_all_keeps_first_seen_order() {
        for filter in engines(&WORDS) {
            assert_eq!(filter.find_all(TEXT), WORDS, "{}", filter.engine());
        }
    }

    #[test]
    fn find_all_count_tallies() {
        for filter in engines(&WORDS) {
            let counts = filter.find_all_count(TEXT);
            let expected: HashMap<String, usize> = [("敏感词1", 2), ("敏感词2", 1), ("敏感词3", 1)]
                .into_iter()
                .map(|(w, c)| (w.to_string(), c))
                .collect();
            assert_eq!(counts, expected, "{}", filter.engine());
        }
    }

    #[test]
    fn find_one_and_is_sensitive() {
        for filter in engines(&WORDS) {
            assert_eq!(filter.find_one(TEXT).as_deref(), Some("敏感词1"));
            assert!(filter.is_sensitive(TEXT));
            assert_eq!(filter.find_one("这里没有敏感词"), None);
            assert!(!filter.is_sensitive("这里没有敏感词"));
        }
    }

    #[test]
    fn replace_masks_each_codepoint() {
        for filter in engines(&WORDS) {
            assert_eq!(
                filter.replace(TEXT, '*'),
                "****,这是****,这是****,这是****,这里没有敏感词",
                "{}",
                filter.engine()
            );
        }
    }

    #[test]
    fn remove_strips_matches() {
        for filter in engines(&WORDS) {
            assert_eq!(
                filter.remove(TEXT),
                ",这是,这是,这是,这里没有敏感词",
                "{}",
                filter.engine()
            );
        }
    }

    #[test]
    fn repeated_word_reported_once_counted_thrice() {
        for filter in engines(&["bad"]) {
            let text = "bad, bad, bad";
            assert_eq!(filter.find_all(text), ["bad"]);
            assert_eq!(filter.find_all_count(text)["bad"], 3);
        }
    }

    #[test]
    fn empty_text_and_empty_dictionary() {
        for filter in engines(&WORDS) {
            assert!(filter.find_all("").is_empty());
            assert!(filter.find_all_count("").is_empty());
            assert_eq!(filter.find_one(""), None);
            assert_eq!(filter.replace("", '*'), "");
            assert_eq!(filter.remove(""), "");
        }
        for filter in engines(&[]) {
            assert!(filter.find_all(TEXT).is_empty());
            assert!(!filter.is_sensitive(TEXT));
            assert_eq!(filter.replace(TEXT, '*'), TEXT);
            assert_eq!(filter.remove(TEXT), TEXT);
        }
    }

    #[test]
    fn insert_then_delete_round_trip() {
        for mut filter in engines(&[]) {
            let mut batch = Batch::new();
            batch.add("敏感词");
            filter.apply(batch);
            assert!(filter.is_sensitive("敏感词"));

            let mut batch = Batch::new();
            batch.delete("敏感词");
            filter.apply(batch);
            assert!(!filter.is_sensitive("敏感词"));
        }
    }

    #[test]
    fn prefix_preservation() {
        for mut filter in engines(&["ab", "abc"]) {
            filter.apply(Batch::from_parts(Vec::<String>::new(), ["ab"]));
            assert!(filter.is_sensitive("abc"));
            assert_eq!(filter.find_all("xabcx"), ["abc"]);
        }
        for mut filter in engines(&["ab", "abc"]) {
            filter.apply(Batch::from_parts(Vec::<String>::new(), ["abc"]));
            assert!(filter.is_sensitive("ab"));
            assert_eq!(filter.find_all("xabcx"), ["ab"]);
        }
    }

    #[test]
    fn apply_reports_effects() {
        for mut filter in engines(&["a"]) {
            let mut batch = Batch::new();
            batch.add("a").add("b").add("").delete("zz").delete("a").add("c");
            let report = filter.apply(batch);
            assert_eq!(
                report,
                BatchReport {
                    added: 2,
                    removed: 1,
                    ignored: 3,
                }
            );
            assert_eq!(filter.len(), 2);
            assert_eq!(filter.find_all("abc"), ["b", "c"]);
        }
    }

    #[test]
    fn events_apply_in_order() {
        for mut filter in engines(&[]) {
            let batch: Batch = [
                Mutation::Add("x".into()),
                Mutation::Delete("x".into()),
                Mutation::Delete("y".into()),
                Mutation::Add("y".into()),
            ]
            .into_iter()
            .collect();
            filter.apply(batch);
            assert!(!filter.is_sensitive("x"));
            assert!(filter.is_sensitive("y"));
        }
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        for mut filter in engines(&WORDS) {
            assert_eq!(filter.apply(Batch::new()), BatchReport::default());
            assert_eq!(filter.len(), 3);
        }
    }
}
