//! Property-based tests run against both engines.

use hashbrown::HashMap;
use libsensitive::filter::{build_filter, Batch, Engine, Filter};
use proptest::prelude::*;

const ENGINES: [Engine; 2] = [Engine::Ac, Engine::Dfa];

/// Small words over a tiny alphabet so that overlaps are frequent.
fn dictionary_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[ab]{1,3}", 0..6)
}

/// Words that can never overlap or nest: each starts with the only `x`
/// it contains, and no word is a prefix of another.
fn disjoint_dictionary_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[abc]{1,4}", 0..8).prop_map(|tails| {
        let mut words: Vec<String> = tails.into_iter().map(|t| format!("x{t}")).collect();
        words.sort();
        words.dedup();
        let all = words.clone();
        words.retain(|w| !all.iter().any(|o| o != w && w.starts_with(o.as_str())));
        words
    })
}

fn build(engine: Engine, words: &[String]) -> Box<dyn Filter> {
    build_filter(engine, words)
}

/// Counts every occurrence of every word, overlapping ones included.
fn naive_counts(words: &[String], text: &str) -> HashMap<String, usize> {
    let text: Vec<char> = text.chars().collect();
    let mut counts = HashMap::new();
    for word in words {
        let word: Vec<char> = word.chars().collect();
        let n = text.windows(word.len()).filter(|w| *w == word.as_slice()).count();
        if n > 0 {
            counts.insert(word.iter().collect(), n);
        }
    }
    counts
}

fn dedup(words: &[String]) -> Vec<String> {
    let mut words = words.to_vec();
    words.sort();
    words.dedup();
    words
}

proptest! {
    #[test]
    fn counts_match_naive_search(words in dictionary_strategy(), text in "[abc]{0,30}") {
        let words = dedup(&words);
        let expected = naive_counts(&words, &text);
        for engine in ENGINES {
            let filter = build(engine, &words);
            prop_assert_eq!(filter.find_all_count(&text), expected.clone(), "{}", engine);
            prop_assert_eq!(filter.is_sensitive(&text), !expected.is_empty());
        }
    }

    #[test]
    fn engines_agree_without_overlaps(
        words in disjoint_dictionary_strategy(),
        text in "[abcx]{0,40}",
    ) {
        let ac = build(Engine::Ac, &words);
        let dfa = build(Engine::Dfa, &words);
        prop_assert_eq!(ac.find_all(&text), dfa.find_all(&text));
        prop_assert_eq!(ac.find_all_count(&text), dfa.find_all_count(&text));
        prop_assert_eq!(ac.find_one(&text), dfa.find_one(&text));
        prop_assert_eq!(ac.replace(&text, '*'), dfa.replace(&text, '*'));
        prop_assert_eq!(ac.remove(&text), dfa.remove(&text));
    }

    #[test]
    fn masking_is_idempotent(words in dictionary_strategy(), text in "[abc]{0,30}") {
        for engine in ENGINES {
            let filter = build(engine, &words);
            let once = filter.replace(&text, '*');
            prop_assert_eq!(once.chars().count(), text.chars().count());
            prop_assert_eq!(filter.replace(&once, '*'), once.clone(), "{}", engine);
            prop_assert!(!filter.is_sensitive(&once));
        }
    }

    #[test]
    fn removed_text_keeps_unmatched_labels(words in dictionary_strategy(), text in "[abc]{0,30}") {
        for engine in ENGINES {
            let filter = build(engine, &words);
            let masked: Vec<char> = filter.replace(&text, '*').chars().collect();
            let stripped = filter.remove(&text);
            // Both engines only ever delete labels that masking covers.
            let unmasked: String = text
                .chars()
                .zip(&masked)
                .filter(|(_, m)| **m != '*')
                .map(|(c, _)| c)
                .collect();
            prop_assert!(stripped.chars().count() >= unmasked.chars().count(), "{}", engine);
            if engine == Engine::Ac {
                prop_assert_eq!(stripped, unmasked);
            }
        }
    }

    #[test]
    fn insert_then_delete_round_trip(
        words in dictionary_strategy(),
        word in "[a-z]{1,5}",
    ) {
        for engine in ENGINES {
            let mut filter = build(engine, &words);
            filter.apply(Batch::from_parts([word.as_str()], Vec::<String>::new()));
            prop_assert!(filter.is_sensitive(&word));
            prop_assert!(filter.find_all(&word).contains(&word));

            filter.apply(Batch::from_parts(Vec::<String>::new(), [word.as_str()]));
            prop_assert!(!filter.find_all(&word).contains(&word), "{}", engine);
        }
    }

    #[test]
    fn deleting_every_word_empties_the_filter(words in dictionary_strategy(), text in "[abc]{0,30}") {
        for engine in ENGINES {
            let mut filter = build(engine, &words);
            filter.apply(Batch::from_parts(Vec::<String>::new(), words.iter()));
            prop_assert!(filter.is_empty());
            prop_assert!(!filter.is_sensitive(&text));
            prop_assert_eq!(filter.remove(&text), text.clone());
        }
    }
}
