use smallvec::SmallVec;

use super::builder::IntoWord;
use super::char_trait::FilterChar;
use super::children::TrieNode;
use super::node_arena::{NodeArena, NodeId};

/// A mutable prefix tree holding the filter's dictionary.
///
/// Nodes live in an index arena, so other structures (such as the
/// Aho-Corasick fail table) can refer to them by [`NodeId`] without
/// borrowing the trie. The root is allocated once and is never terminal
/// and never removed.
///
/// # Examples
///
/// ```
/// use libsensitive::filter::trie::Trie;
///
/// let mut trie = Trie::new();
/// assert!(trie.insert("car"));
/// assert!(trie.insert("cart"));
/// assert!(!trie.insert("car")); // already present
///
/// assert!(trie.remove("car"));
/// assert!(!trie.contains("car"));
/// assert!(trie.contains("cart"));
/// ```
pub struct Trie<C: FilterChar> {
    arena: NodeArena<TrieNode<C>>,
    len: usize,
}

impl<C: FilterChar> Default for Trie<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FilterChar> Trie<C> {
    /// Creates a trie holding only the root.
    pub fn new() -> Self {
        let mut arena = NodeArena::new();
        let root = arena.alloc(TrieNode::new());
        debug_assert_eq!(root, NodeId::ROOT);
        Trie { arena, len: 0 }
    }

    /// Builds a trie from an iterator of words.
    pub fn from_words<W: IntoWord<C>>(words: impl IntoIterator<Item = W>) -> Self {
        let mut trie = Self::new();
        for word in words {
            trie.insert(word);
        }
        trie
    }

    /// Returns the id of the root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Returns the node with the given id.
    #[inline]
    pub fn node(&self, id: NodeId) -> &TrieNode<C> {
        &self.arena[id]
    }

    /// Follows `letter`'s edge out of `id`.
    #[inline]
    pub fn child(&self, id: NodeId, letter: C) -> Option<NodeId> {
        self.arena[id].get(letter)
    }

    /// Number of words in the dictionary.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the dictionary holds no words.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Upper bound (exclusive) on every [`NodeId::index`] handed out so far.
    pub(crate) fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// Adds a word to the dictionary.
    ///
    /// Returns `true` if the word was added, `false` if it was already present
    /// or is empty. Only the nodes for the missing suffix of the word's path are
    /// created; existing words sharing a prefix are untouched.
    pub fn insert(&mut self, word: impl IntoWord<C>) -> bool {
        let word = word.collect_word();
        if word.is_empty() {
            return false;
        }

        let mut current = NodeId::ROOT;
        for &ch in word.iter() {
            current = match self.arena[current].get(ch) {
                Some(child) => child,
                None => {
                    let child = self.arena.alloc(TrieNode::new());
                    self.arena[current].insert_child(ch, child);
                    child
                }
            };
        }

        let node = &mut self.arena[current];
        let added = !node.is_word();
        node.set_word(word.as_slice().into());
        if added {
            self.len += 1;
        }
        added
    }

    /// Removes a word from the dictionary.
    ///
    /// Returns `true` if the word was removed, `false` if it was not present.
    /// Only nodes owned by this word alone are pruned: the walk back up stops at
    /// the first ancestor that completes another word or leads to other words.
    pub fn remove(&mut self, word: impl IntoWord<C>) -> bool {
        let word = word.collect_word();

        // path[i] follows word[0..i].
        let mut path: SmallVec<[NodeId; 32]> = SmallVec::new();
        path.push(NodeId::ROOT);
        let mut current = NodeId::ROOT;
        for &ch in word.iter() {
            match self.arena[current].get(ch) {
                Some(child) => {
                    path.push(child);
                    current = child;
                }
                None => return false,
            }
        }

        if self.arena[current].take_word().is_none() {
            return false;
        }
        self.len -= 1;

        for level in (0..word.len()).rev() {
            let node = path[level + 1];
            if !self.arena[node].is_dead() {
                break;
            }
            self.arena[path[level]].remove_child(word[level]);
            self.arena.free(node, TrieNode::new());
        }
        true
    }

    /// Returns `true` if the given word is in the dictionary.
    pub fn contains(&self, word: impl IntoWord<C>) -> bool {
        self.find(&word.collect_word())
            .is_some_and(|id| self.arena[id].is_word())
    }

    /// Follows `path` from the root and returns the node it ends at.
    pub fn find(&self, path: &[C]) -> Option<NodeId> {
        path.iter()
            .try_fold(NodeId::ROOT, |id, &ch| self.arena[id].get(ch))
    }

    /// Returns every dictionary word, ordered by label.
    pub fn words(&self) -> Vec<Vec<C>> {
        let mut words = Vec::with_capacity(self.len);
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.arena[id];
            if let Some(word) = node.word() {
                words.push(word.to_vec());
            }
            // Reversed so the smallest label is popped first.
            let first = stack.len();
            stack.extend(node.children().map(|(_, child)| child));
            stack[first..].reverse();
        }
        words
    }

    /// Removes every word, keeping only the root.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.arena.alloc(TrieNode::new());
        self.len = 0;
    }
}

impl<C: FilterChar> std::fmt::Debug for Trie<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trie")
            .field("len", &self.len)
            .field("node_count", &self.node_count())
            .finish()
    }
}
