//! An index-based arena for trie nodes.
//!
//! Nodes refer to each other by [`NodeId`] instead of by reference, so the
//! tree keeps plain ownership (parents own children by id) while fail
//! pointers are ordinary ids stored next to the arena.

use std::ops::{Index, IndexMut};

/// Index of a node inside a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The id of the first allocated node, which the trie uses as its root.
    pub const ROOT: NodeId = NodeId(0);

    /// Returns the id as a `usize`, suitable for indexing side tables.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A growable arena that hands out stable ids and recycles freed slots.
pub(crate) struct NodeArena<T> {
    slots: Vec<T>,
    free_list: Vec<NodeId>,
}

impl<T> NodeArena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        NodeArena {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Stores a value and returns its id, reusing a freed slot when one exists.
    pub fn alloc(&mut self, value: T) -> NodeId {
        if let Some(id) = self.free_list.pop() {
            self.slots[id.index()] = value;
            id
        } else {
            let id = NodeId(u32::try_from(self.slots.len()).expect("node arena exhausted"));
            self.slots.push(value);
            id
        }
    }

    /// Returns a slot to the free list, overwriting its value with `sentinel`.
    ///
    /// The caller guarantees that no live node still refers to `id`.
    pub fn free(&mut self, id: NodeId, sentinel: T) {
        self.slots[id.index()] = sentinel;
        self.free_list.push(id);
    }

    /// Number of slots ever allocated, including freed ones.
    ///
    /// Side tables indexed by [`NodeId`] must be at least this long.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Number of slots waiting to be reused.
    #[cfg(test)]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Drops every value and forgets all ids.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }
}

impl<T> Index<NodeId> for NodeArena<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: NodeId) -> &T {
        &self.slots[id.index()]
    }
}

impl<T> IndexMut<NodeId> for NodeArena<T> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.slots[id.index()]
    }
}
