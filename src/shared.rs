//! A filter shared between query threads and a dictionary updater.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use hashbrown::HashMap;
use log::trace;
use parking_lot::{RwLock, RwLockReadGuard};

use crate::feed::MutationFeed;
use crate::filter::{Batch, BatchReport, Engine, Filter};

/// A cloneable handle to a filter behind a reader-writer lock.
///
/// Queries take the read lock and may run concurrently. Applying a batch takes
/// the write lock, so a query sees the dictionary either entirely before or
/// entirely after a batch, never in between.
///
/// # Examples
///
/// ```
/// use libsensitive::feed;
/// use libsensitive::filter::{Engine, FilterBuilder};
/// use libsensitive::shared::SharedFilter;
///
/// let filter = SharedFilter::new(FilterBuilder::new().engine(Engine::Ac).build());
/// let (tx, feed) = feed::channel();
/// let listener = filter.listen(feed).unwrap();
///
/// tx.add("敏感词").unwrap();
/// drop(tx);
/// listener.join().unwrap();
///
/// assert!(filter.is_sensitive("这是敏感词"));
/// ```
#[derive(Clone)]
pub struct SharedFilter {
    inner: Arc<RwLock<Box<dyn Filter>>>,
}

impl SharedFilter {
    /// Wraps a filter for sharing.
    pub fn new(filter: Box<dyn Filter>) -> Self {
        SharedFilter {
            inner: Arc::new(RwLock::new(filter)),
        }
    }

    /// Read access to the underlying filter for several queries under one lock.
    pub fn read(&self) -> RwLockReadGuard<'_, Box<dyn Filter>> {
        self.inner.read()
    }

    /// See [`Filter::find_all`].
    pub fn find_all(&self, text: &str) -> Vec<String> {
        self.inner.read().find_all(text)
    }

    /// See [`Filter::find_all_count`].
    pub fn find_all_count(&self, text: &str) -> HashMap<String, usize> {
        self.inner.read().find_all_count(text)
    }

    /// See [`Filter::find_one`].
    pub fn find_one(&self, text: &str) -> Option<String> {
        self.inner.read().find_one(text)
    }

    /// See [`Filter::is_sensitive`].
    pub fn is_sensitive(&self, text: &str) -> bool {
        self.inner.read().is_sensitive(text)
    }

    /// See [`Filter::replace`].
    pub fn replace(&self, text: &str, filler: char) -> String {
        self.inner.read().replace(text, filler)
    }

    /// See [`Filter::remove`].
    pub fn remove(&self, text: &str) -> String {
        self.inner.read().remove(text)
    }

    /// Number of words in the dictionary.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// True if the dictionary holds no words.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// The engine behind this filter.
    pub fn engine(&self) -> Engine {
        self.inner.read().engine()
    }

    /// Applies a batch under the write lock.
    pub fn apply(&self, batch: Batch) -> BatchReport {
        self.inner.write().apply(batch)
    }

    /// Applies whatever is queued on `feed` without blocking.
    ///
    /// Returns `None` if nothing was queued.
    pub fn sync(&self, feed: &MutationFeed) -> Option<BatchReport> {
        feed.drain().map(|batch| self.apply(batch))
    }

    /// Spawns a thread that applies batches from `feed` as they arrive.
    ///
    /// The thread exits once every sender of the feed is dropped and the
    /// remaining events are applied.
    pub fn listen(&self, feed: MutationFeed) -> io::Result<JoinHandle<()>> {
        let filter = self.clone();
        thread::Builder::new()
            .name("sensitive-feed".into())
            .spawn(move || {
                trace!("feed listener started");
                while let Some(batch) = feed.recv_batch() {
                    filter.apply(batch);
                }
                trace!("feed listener stopped: senders disconnected");
            })
    }
}

impl std::fmt::Debug for SharedFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filter = self.inner.read();
        f.debug_struct("SharedFilter")
            .field("engine", &filter.engine())
            .field("len", &filter.len())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::feed;
    use crate::filter::build_filter;

    fn shared(engine: Engine, words: &[&str]) -> SharedFilter {
        SharedFilter::new(build_filter(engine, words))
    }

    #[test]
    fn queries_delegate() {
        for engine in [Engine::Ac, Engine::Dfa] {
            let filter = shared(engine, &["ab", "cd"]);
            assert_eq!(filter.engine(), engine);
            assert_eq!(filter.len(), 2);
            assert_eq!(filter.find_all("xcdab"), ["cd", "ab"]);
            assert_eq!(filter.find_all_count("abab")["ab"], 2);
            assert_eq!(filter.find_one("xab").as_deref(), Some("ab"));
            assert_eq!(filter.replace("abx", '*'), "**x");
            assert_eq!(filter.remove("abx"), "x");
        }
    }

    #[test]
    fn clones_share_one_dictionary() {
        let filter = shared(Engine::Ac, &[]);
        let other = filter.clone();
        other.apply(Batch::from_parts(["word"], Vec::<String>::new()));
        assert!(filter.is_sensitive("a word"));
    }

    #[test]
    fn sync_applies_queued_events() {
        let filter = shared(Engine::Dfa, &["old"]);
        let (tx, feed) = feed::channel();
        assert_eq!(filter.sync(&feed), None);

        tx.add("new").unwrap();
        tx.delete("old").unwrap();
        let report = filter.sync(&feed).unwrap();
        assert_eq!((report.added, report.removed), (1, 1));
        assert!(filter.is_sensitive("new"));
        assert!(!filter.is_sensitive("old"));
    }

    #[test]
    fn listener_applies_until_disconnected() {
        for engine in [Engine::Ac, Engine::Dfa] {
            let filter = shared(engine, &["a"]);
            let (tx, feed) = feed::channel();
            let listener = filter.listen(feed).unwrap();

            let producers: Vec<_> = (0..4)
                .map(|i| {
                    let tx = tx.clone();
                    thread::spawn(move || tx.add(format!("w{i}")).unwrap())
                })
                .collect();
            for producer in producers {
                producer.join().unwrap();
            }
            tx.delete("a").unwrap();
            drop(tx);
            listener.join().unwrap();

            assert_eq!(filter.len(), 4, "{engine}");
            assert!(!filter.is_sensitive("a"));
            assert_eq!(filter.find_all("w3 w0"), ["w3", "w0"]);
        }
    }

    #[test]
    fn readers_see_whole_batches() {
        let filter = shared(Engine::Ac, &[]);
        let reader = {
            let filter = filter.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    let found = filter.find_all("xy");
                    assert!(found.is_empty() || found == ["x", "y"], "{found:?}");
                }
            })
        };
        filter.apply(Batch::from_parts(["x", "y"], Vec::<String>::new()));
        reader.join().unwrap();
        assert_eq!(filter.find_all("xy"), ["x", "y"]);
    }
}
