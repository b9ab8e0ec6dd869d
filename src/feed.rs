//! Channels that carry dictionary mutations into a running filter.
//!
//! A feed is a pair of unbounded channels, one for additions and one for
//! deletions. Producers push words through a [`FeedSender`]; the consumer
//! drains whatever is queued into a single [`Batch`] so the engine is
//! brought up to date once per batch rather than once per word.

use crossbeam_channel::{unbounded, Receiver, Select, Sender, TryRecvError};

use crate::filter::{Batch, FilterError, Mutation};

/// Creates a connected sender and feed.
///
/// # Examples
///
/// ```
/// use libsensitive::feed;
///
/// let (tx, feed) = feed::channel();
/// tx.add("敏感词").unwrap();
/// tx.delete("旧词").unwrap();
///
/// let batch = feed.drain().unwrap();
/// assert_eq!(batch.len(), 2);
/// assert!(feed.drain().is_none());
/// ```
pub fn channel() -> (FeedSender, MutationFeed) {
    let (add_tx, add_rx) = unbounded();
    let (delete_tx, delete_rx) = unbounded();
    (
        FeedSender {
            add: add_tx,
            delete: delete_tx,
        },
        MutationFeed {
            add: add_rx,
            delete: delete_rx,
        },
    )
}

/// The producing side of a [`MutationFeed`]. Cheap to clone.
#[derive(Clone, Debug)]
pub struct FeedSender {
    add: Sender<String>,
    delete: Sender<String>,
}

impl FeedSender {
    /// Queues a word to be added.
    pub fn add(&self, word: impl Into<String>) -> Result<(), FilterError> {
        self.add
            .send(word.into())
            .map_err(|_| FilterError::FeedClosed)
    }

    /// Queues a word to be deleted.
    pub fn delete(&self, word: impl Into<String>) -> Result<(), FilterError> {
        self.delete
            .send(word.into())
            .map_err(|_| FilterError::FeedClosed)
    }
}

/// The consuming side of a mutation feed.
#[derive(Debug)]
pub struct MutationFeed {
    add: Receiver<String>,
    delete: Receiver<String>,
}

impl MutationFeed {
    /// Wraps channels owned by the host application.
    pub fn from_receivers(add: Receiver<String>, delete: Receiver<String>) -> Self {
        MutationFeed { add, delete }
    }

    /// Collects every queued event without blocking.
    ///
    /// Queued additions come first, then queued deletions. Returns `None` if
    /// nothing was queued.
    pub fn drain(&self) -> Option<Batch> {
        let batch = self.collect(None);
        (!batch.is_empty()).then_some(batch)
    }

    /// Blocks until at least one event arrives, then collects it together with
    /// everything else already queued.
    ///
    /// Returns `None` once both senders are gone and both queues are empty.
    /// The feed must be the only consumer of its receivers.
    pub fn recv_batch(&self) -> Option<Batch> {
        let mut add_open = true;
        let mut delete_open = true;
        loop {
            if let Some(batch) = self.drain() {
                return Some(batch);
            }
            if !add_open && !delete_open {
                return None;
            }

            let mut select = Select::new();
            let add_index = add_open.then(|| select.recv(&self.add));
            if delete_open {
                select.recv(&self.delete);
            }
            let is_add = Some(select.ready()) == add_index;
            let receiver = if is_add { &self.add } else { &self.delete };

            // `ready` may wake spuriously, so confirm with a real receive.
            match receiver.try_recv() {
                Ok(word) if is_add => return Some(self.collect(Some(Mutation::Add(word)))),
                Ok(word) => return Some(self.collect(Some(Mutation::Delete(word)))),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) if is_add => add_open = false,
                Err(TryRecvError::Disconnected) => delete_open = false,
            }
        }
    }

    /// Builds a batch from `received` and the queued events.
    ///
    /// Only deletions queued before the additions are drained are taken, so a
    /// deletion never lands in a batch ahead of an addition sent before it.
    fn collect(&self, received: Option<Mutation>) -> Batch {
        let deletes = self.delete.len();
        let mut batch = Batch::new();
        let mut received_delete = None;
        match received {
            Some(add @ Mutation::Add(_)) => batch.extend([add]),
            other => received_delete = other,
        }
        batch.extend(self.add.try_iter().map(Mutation::Add));
        batch.extend(received_delete);
        batch.extend(self.delete.try_iter().take(deletes).map(Mutation::Delete));
        batch
    }
}
