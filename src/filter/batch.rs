/// One dictionary mutation event.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mutation {
    /// Add the word to the dictionary.
    Add(String),
    /// Remove the word from the dictionary; absent words are ignored.
    Delete(String),
}

impl Mutation {
    /// The word this event is about.
    pub fn word(&self) -> &str {
        match self {
            Mutation::Add(word) | Mutation::Delete(word) => word,
        }
    }
}

/// An ordered batch of dictionary mutations, applied as one unit.
///
/// Events are applied in the order they were pushed, so a word added and then
/// deleted within one batch ends up absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Batch {
    mutations: Vec<Mutation>,
}

impl Batch {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a batch that applies every addition, then every deletion.
    pub fn from_parts<A, D>(adds: A, deletes: D) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        let mut batch = Batch::new();
        for word in adds {
            batch.add(word);
        }
        for word in deletes {
            batch.delete(word);
        }
        batch
    }

    /// Queues an addition.
    pub fn add(&mut self, word: impl Into<String>) -> &mut Self {
        self.mutations.push(Mutation::Add(word.into()));
        self
    }

    /// Queues a deletion.
    pub fn delete(&mut self, word: impl Into<String>) -> &mut Self {
        self.mutations.push(Mutation::Delete(word.into()));
        self
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    /// True if no event is queued.
    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    /// Iterates over the queued events in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Mutation> {
        self.mutations.iter()
    }
}

impl IntoIterator for Batch {
    type Item = Mutation;
    type IntoIter = std::vec::IntoIter<Mutation>;

    fn into_iter(self) -> Self::IntoIter {
        self.mutations.into_iter()
    }
}

impl<'b> IntoIterator for &'b Batch {
    type Item = &'b Mutation;
    type IntoIter = std::slice::Iter<'b, Mutation>;

    fn into_iter(self) -> Self::IntoIter {
        self.mutations.iter()
    }
}

impl FromIterator<Mutation> for Batch {
    fn from_iter<I: IntoIterator<Item = Mutation>>(iter: I) -> Self {
        Batch {
            mutations: iter.into_iter().collect(),
        }
    }
}

impl Extend<Mutation> for Batch {
    fn extend<I: IntoIterator<Item = Mutation>>(&mut self, iter: I) {
        self.mutations.extend(iter);
    }
}

/// What applying a [`Batch`] changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Words that were not in the dictionary before.
    pub added: usize,
    /// Words that were in the dictionary and are gone now.
    pub removed: usize,
    /// Events with no effect: duplicate or empty additions, deletions of absent words.
    pub ignored: usize,
}

impl BatchReport {
    /// True if the dictionary changed.
    pub fn changed(&self) -> bool {
        self.added + self.removed > 0
    }
}
