use super::char_trait::FilterChar;
use super::node_arena::NodeId;

/// Above this many children a node's edges are binary searched instead of scanned.
const LINEAR_SCAN_MAX: usize = 16;

/// A compact representation of the children of a [`TrieNode`] that doesn't allocate until
/// there are at least three children.
///
/// Edges are always kept sorted by label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Children<C: FilterChar> {
    /// No children.
    None,
    /// Exactly one child (letter, node).
    One((C, NodeId)),
    /// Exactly two children (letter1, node1, letter2, node2), `letter1 < letter2`.
    Two((C, NodeId, C, NodeId)),
    /// Three or more children stored in a sorted vector.
    Many(Vec<(C, NodeId)>),
}

impl<C: FilterChar> Children<C> {
    /// Gets the child at the specified index.
    ///
    /// Returns `None` if the index is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<(C, NodeId)> {
        match &self {
            Children::None => None,
            Children::One(child) => match index {
                0 => Some(*child),
                _ => None,
            },
            Children::Two((c1, n1, c2, n2)) => match index {
                0 => Some((*c1, *n1)),
                1 => Some((*c2, *n2)),
                _ => None,
            },
            Children::Many(children) => children.get(index).copied(),
        }
    }

    /// Returns the number of children.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Children::None => 0,
            Children::One(_) => 1,
            Children::Two(_) => 2,
            Children::Many(children) => children.len(),
        }
    }

    /// Returns true if there are no children.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Children::None)
    }

    /// Returns the node that `letter`'s edge leads to, or None if no such edge exists.
    #[inline]
    pub fn find(&self, letter: C) -> Option<NodeId> {
        match self {
            Children::None => None,
            Children::One((ch, node)) => (*ch == letter).then_some(*node),
            Children::Two((c1, n1, c2, n2)) => {
                if letter == *c1 {
                    Some(*n1)
                } else if letter == *c2 {
                    Some(*n2)
                } else {
                    None
                }
            }
            Children::Many(children) if children.len() > LINEAR_SCAN_MAX => children
                .binary_search_by_key(&letter, |&(c, _)| c)
                .ok()
                .map(|i| children[i].1),
            Children::Many(children) => {
                // Unrolling by 2 exposes load-level parallelism and beats binary search
                // on the small fan-outs that make up most of a dictionary trie.
                let chunks = children.chunks_exact(2);
                let remainder = chunks.remainder();
                for chunk in chunks {
                    if chunk[0].0 == letter {
                        return Some(chunk[0].1);
                    }
                    if chunk[1].0 == letter {
                        return Some(chunk[1].1);
                    }
                }
                remainder
                    .iter()
                    .find(|&&(ch, _)| ch == letter)
                    .map(|&(_, node)| node)
            }
        }
    }

    /// Adds an edge in sorted position.
    ///
    /// The caller guarantees `letter` is not present yet.
    pub(crate) fn insert(&mut self, letter: C, child: NodeId) {
        debug_assert!(self.find(letter).is_none(), "insert: letter already exists");
        *self = match std::mem::replace(self, Children::None) {
            Children::None => Children::One((letter, child)),
            Children::One((c1, n1)) => {
                if letter < c1 {
                    Children::Two((letter, child, c1, n1))
                } else {
                    Children::Two((c1, n1, letter, child))
                }
            }
            Children::Two((c1, n1, c2, n2)) => {
                let mut v = vec![(c1, n1), (c2, n2), (letter, child)];
                v.sort_by_key(|&(c, _)| c);
                Children::Many(v)
            }
            Children::Many(mut children) => {
                let pos = children.partition_point(|&(c, _)| c < letter);
                children.insert(pos, (letter, child));
                Children::Many(children)
            }
        };
    }

    /// Removes the edge labeled `letter` and returns the node it led to.
    pub(crate) fn remove(&mut self, letter: C) -> Option<NodeId> {
        let (removed, rest) = match std::mem::replace(self, Children::None) {
            Children::None => (None, Children::None),
            Children::One((c, n)) => {
                if c == letter {
                    (Some(n), Children::None)
                } else {
                    (None, Children::One((c, n)))
                }
            }
            Children::Two((c1, n1, c2, n2)) => {
                if c1 == letter {
                    (Some(n1), Children::One((c2, n2)))
                } else if c2 == letter {
                    (Some(n2), Children::One((c1, n1)))
                } else {
                    (None, Children::Two((c1, n1, c2, n2)))
                }
            }
            Children::Many(mut children) => {
                match children.binary_search_by_key(&letter, |&(c, _)| c) {
                    Ok(pos) => {
                        let (_, node) = children.remove(pos);
                        let rest = match children.len() {
                            2 => Children::Two((
                                children[0].0,
                                children[0].1,
                                children[1].0,
                                children[1].1,
                            )),
                            _ => Children::Many(children),
                        };
                        (Some(node), rest)
                    }
                    Err(_) => (None, Children::Many(children)),
                }
            }
        };
        *self = rest;
        removed
    }
}

/// An iterator over the children of a [`TrieNode`], in label order.
#[derive(Clone)]
pub struct ChildIter<'t, C: FilterChar> {
    children: &'t Children<C>,
    index: usize,
}

impl<C: FilterChar> Iterator for ChildIter<'_, C> {
    type Item = (C, NodeId);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let next_child = self.children.get(self.index)?;
        self.index += 1;
        Some(next_child)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.children.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<C: FilterChar> ExactSizeIterator for ChildIter<'_, C> {}

/// A node in the dictionary trie: one prefix of some dictionary word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrieNode<C: FilterChar> {
    children: Children<C>,
    word: Option<Box<[C]>>,
}

impl<C: FilterChar> Default for TrieNode<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FilterChar> TrieNode<C> {
    /// Creates a node with no children that completes no word.
    pub fn new() -> Self {
        TrieNode {
            children: Children::None,
            word: None,
        }
    }

    /// Returns the node that letter's edge leads to, or None if no such edge exists.
    #[inline]
    pub fn get(&self, letter: C) -> Option<NodeId> {
        self.children.find(letter)
    }

    /// True if this node corresponds to the end of a dictionary word.
    #[inline]
    pub fn is_word(&self) -> bool {
        self.word.is_some()
    }

    /// The dictionary word this node completes, if any.
    #[inline]
    pub fn word(&self) -> Option<&[C]> {
        self.word.as_deref()
    }

    /// Returns an iterator over all children of this node.
    #[inline]
    pub fn children(&self) -> ChildIter<'_, C> {
        ChildIter {
            children: &self.children,
            index: 0,
        }
    }

    /// Returns the number of children.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// True if the node has no children and completes no word, i.e. nothing needs it.
    #[inline]
    pub(crate) fn is_dead(&self) -> bool {
        self.children.is_empty() && self.word.is_none()
    }

    pub(crate) fn insert_child(&mut self, letter: C, child: NodeId) {
        self.children.insert(letter, child);
    }

    pub(crate) fn remove_child(&mut self, letter: C) -> Option<NodeId> {
        self.children.remove(letter)
    }

    pub(crate) fn set_word(&mut self, word: Box<[C]>) {
        self.word = Some(word);
    }

    pub(crate) fn take_word(&mut self) -> Option<Box<[C]>> {
        self.word.take()
    }
}
