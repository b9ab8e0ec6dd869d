//! # libsensitive
//!
//! Sensitive-word detection for Rust: find, count, mask and strip every
//! occurrence of a dictionary of words in a piece of text, while the
//! dictionary keeps changing underneath.
//!
//! The dictionary is a trie stored in an index arena. Two engines scan it:
//!
//! - [`AcFilter`](filter::AcFilter), an [Aho-Corasick](https://en.wikipedia.org/wiki/Aho%E2%80%93Corasick_algorithm)
//!   automaton that scans in one pass and rebuilds its fail pointers once per
//!   batch of mutations;
//! - [`DfaFilter`](filter::DfaFilter), a plain trie walk restarted at every
//!   offset, slower to scan but free to mutate.
//!
//! ## Features
//!
//! - **Codepoint based**: offsets, lengths and masking count Unicode scalar
//!   values, so CJK text masks one filler per character
//! - **Overlap aware**: every occurrence is reported, including nested and
//!   overlapping words
//! - **Live updates**: words are added and deleted in batches, either directly
//!   or through a [`MutationFeed`](feed::MutationFeed) channel pair
//! - **Generic over label type**: the [`Scan`](filter::Scan) API works on `&[u8]`,
//!   `&[char]` or any [`FilterChar`](filter::FilterChar) slice
//!
//! ## Quick Start
//!
//! ```
//! use libsensitive::filter::{Batch, Engine, FilterBuilder};
//!
//! let mut filter = FilterBuilder::new()
//!     .engine(Engine::Ac)
//!     .words(["敏感词1", "敏感词2", "敏感词3"])
//!     .build();
//!
//! let text = "敏感词1,这是敏感词2,这是敏感词3,这是敏感词1,这里没有敏感词";
//! assert_eq!(filter.find_all(text), ["敏感词1", "敏感词2", "敏感词3"]);
//! assert_eq!(filter.find_all_count(text)["敏感词1"], 2);
//! assert_eq!(
//!     filter.replace(text, '*'),
//!     "****,这是****,这是****,这是****,这里没有敏感词"
//! );
//!
//! filter.apply(Batch::from_parts(Vec::<String>::new(), ["敏感词1"]));
//! assert_eq!(filter.find_one(text).as_deref(), Some("敏感词2"));
//! ```
//!
//! ## Sharing
//!
//! A [`SharedFilter`](shared::SharedFilter) puts a filter behind a
//! reader-writer lock and can follow a mutation feed from a background thread:
//!
//! ```
//! use libsensitive::feed;
//! use libsensitive::filter::{Engine, FilterBuilder};
//! use libsensitive::shared::SharedFilter;
//!
//! let filter = SharedFilter::new(FilterBuilder::new().engine(Engine::Dfa).build());
//! let (tx, feed) = feed::channel();
//!
//! tx.add("bad").unwrap();
//! filter.sync(&feed);
//! assert_eq!(filter.remove("not bad at all"), "not  at all");
//! ```

#![warn(missing_docs)]

/// Channels carrying dictionary mutations.
pub mod feed;
/// Dictionary trie, matching engines and the query API.
pub mod filter;
/// A lock-protected filter shared between threads.
pub mod shared;

pub use filter::{build_filter, Batch, Engine, Filter, FilterBuilder, FilterError};
pub use shared::SharedFilter;
