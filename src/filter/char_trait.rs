use std::fmt::Debug;
use std::hash::Hash;

/// Trait for types that can serve as edge labels in the dictionary trie.
///
/// This trait is automatically implemented for any type satisfying all the
/// required bounds (`char`, `u8`, `u16`, `u32`, etc.).
///
/// - `Copy`: edges and scanned text store labels by value
/// - `Eq + Ord`: comparing and ordering edge labels
/// - `Hash`: counting matched words
/// - `Debug`: debug printing of nodes
/// - `Send + Sync + 'static`: every engine is usable as a `Box<dyn Filter>`,
///   which must be `Send + Sync` to sit behind the lock of a
///   [`SharedFilter`](crate::shared::SharedFilter) and move into its
///   listener thread; the trie stores labels inline, so the labels carry
///   those bounds too
pub trait FilterChar: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static {}

impl<T: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static> FilterChar for T {}
