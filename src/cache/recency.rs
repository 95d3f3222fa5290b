//! Recency Index Module
//!
//! Tracks key access order for LRU eviction in O(1) per operation.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::iter::FusedIterator;

/// Null link in the arena list.
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node<K> {
    /// `None` while the slot sits on the free list
    key: Option<K>,
    prev: usize,
    next: usize,
}

// == Recency Index ==
/// Access-ordered set of keys.
///
/// Keys live in a `Vec` arena linked as a doubly-linked list, with a
/// `HashMap` from key to arena slot:
/// - Front = least recently used
/// - Back = most recently used
///
/// Freed slots are recycled through a free list, so the arena never grows
/// beyond the largest number of keys held at once.
#[derive(Debug)]
pub struct RecencyIndex<K> {
    slots: HashMap<K, usize>,
    nodes: Vec<Node<K>>,
    head: usize,
    tail: usize,
    free: usize,
}

impl<K> Default for RecencyIndex<K> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
            nodes: Vec::new(),
            head: NIL,
            tail: NIL,
            free: NIL,
        }
    }
}

impl<K: Hash + Eq + Clone> RecencyIndex<K> {
    // == Constructor ==
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    // == Push Back ==
    /// Marks `key` as most recently used, inserting it if absent.
    pub fn push_back(&mut self, key: K) {
        if let Some(&idx) = self.slots.get(&key) {
            self.move_to_back(idx);
            return;
        }
        let idx = self.alloc(key.clone());
        self.link_back(idx);
        self.slots.insert(key, idx);
    }

    // == Touch ==
    /// Moves an existing key to the back.
    ///
    /// Returns false (and does nothing) if the key is not tracked.
    pub fn touch<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.slots.get(key).copied() {
            Some(idx) => {
                self.move_to_back(idx);
                true
            }
            None => false,
        }
    }

    // == Remove ==
    /// Removes a key from the index, returning whether it was tracked.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.slots.remove(key) {
            Some(idx) => {
                self.unlink(idx);
                self.release(idx);
                true
            }
            None => false,
        }
    }

    // == Pop Front ==
    /// Removes and returns the least recently used key.
    pub fn pop_front(&mut self) -> Option<K> {
        if self.head == NIL {
            return None;
        }
        let idx = self.head;
        self.unlink(idx);
        let key = self.release(idx)?;
        self.slots.remove(&key);
        Some(key)
    }

    /// Returns the least recently used key without removing it.
    pub fn peek_front(&self) -> Option<&K> {
        self.nodes.get(self.head).and_then(|node| node.key.as_ref())
    }

    /// Returns the most recently used key.
    pub fn peek_back(&self) -> Option<&K> {
        self.nodes.get(self.tail).and_then(|node| node.key.as_ref())
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drops every key and releases the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.nodes.clear();
        self.head = NIL;
        self.tail = NIL;
        self.free = NIL;
    }

    /// Iterates keys from least to most recently used.
    ///
    /// Use `.rev()` for most-recent-first order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            nodes: &self.nodes,
            front: self.head,
            back: self.tail,
            remaining: self.slots.len(),
        }
    }

    // == Arena Plumbing ==
    fn alloc(&mut self, key: K) -> usize {
        let node = Node {
            key: Some(key),
            prev: NIL,
            next: NIL,
        };
        if self.free == NIL {
            self.nodes.push(node);
            self.nodes.len() - 1
        } else {
            let idx = self.free;
            self.free = self.nodes[idx].next;
            self.nodes[idx] = node;
            idx
        }
    }

    fn release(&mut self, idx: usize) -> Option<K> {
        let node = &mut self.nodes[idx];
        let key = node.key.take();
        node.prev = NIL;
        node.next = self.free;
        self.free = idx;
        key
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = NIL;
    }

    fn link_back(&mut self, idx: usize) {
        self.nodes[idx].prev = self.tail;
        self.nodes[idx].next = NIL;
        if self.tail == NIL {
            self.head = idx;
        } else {
            self.nodes[self.tail].next = idx;
        }
        self.tail = idx;
    }

    fn move_to_back(&mut self, idx: usize) {
        if self.tail != idx {
            self.unlink(idx);
            self.link_back(idx);
        }
    }
}

// == Iterator ==
/// Borrowing iterator over an index, front (LRU) to back (MRU).
#[derive(Debug)]
pub struct Iter<'a, K> {
    nodes: &'a [Node<K>],
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        if self.remaining == 0 {
            return None;
        }
        let nodes = self.nodes;
        let node = &nodes[self.front];
        self.front = node.next;
        self.remaining -= 1;
        node.key.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let nodes = self.nodes;
        let node = &nodes[self.back];
        self.back = node.prev;
        self.remaining -= 1;
        node.key.as_ref()
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}
