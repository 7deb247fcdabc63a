//! Recency List Module
//!
//! Implements the doubly-linked recency order used for LRU eviction.

use crate::cache::entry::CacheEntry;

// == Recency List ==
/// Tracks entries by recency of use.
///
/// Entries live in an arena of slots and link to each other by slot index:
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// A slot index stays valid for as long as its entry is in the list, so the
/// cache index can hold slots instead of references. Freed slots are reused.
#[derive(Debug)]
pub(crate) struct RecencyList<K, V> {
    /// Entry storage, `None` for free slots
    slots: Vec<Option<CacheEntry<K, V>>>,
    /// Free slots available for reuse
    free: Vec<usize>,
    /// Most recently used slot
    head: Option<usize>,
    /// Least recently used slot
    tail: Option<usize>,
    /// Number of linked entries
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    // == Constructor ==
    /// Creates a new empty recency list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn head(&self) -> Option<usize> {
        self.head
    }

    #[cfg(test)]
    pub fn tail(&self) -> Option<usize> {
        self.tail
    }

    pub fn get(&self, slot: usize) -> Option<&CacheEntry<K, V>> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut CacheEntry<K, V>> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    // == Push Front ==
    /// Stores a new entry at the head of the list and returns its slot.
    pub fn push_front(&mut self, entry: CacheEntry<K, V>) -> usize {
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };
        self.len += 1;
        self.prepend(slot);
        slot
    }

    // == Touch ==
    /// Marks an entry as most recently used (moves it to the head).
    ///
    /// The check is on list position: an entry already at the head stays put.
    pub fn touch(&mut self, slot: usize) {
        if self.head == Some(slot) || self.get(slot).is_none() {
            return;
        }
        self.unlink(slot);
        self.prepend(slot);
    }

    // == Remove ==
    /// Unlinks an entry, frees its slot and returns the entry.
    pub fn remove(&mut self, slot: usize) -> Option<CacheEntry<K, V>> {
        self.get(slot)?;
        self.unlink(slot);
        let entry = self.slots[slot].take()?;
        self.free.push(slot);
        self.len -= 1;
        Some(entry)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the list is empty.
    pub fn pop_back(&mut self) -> Option<CacheEntry<K, V>> {
        let tail = self.tail?;
        self.remove(tail)
    }

    // == Clear ==
    /// Drops every entry and resets the list to empty.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    // must only be called for a linked slot
    fn unlink(&mut self, slot: usize) {
        let Some(entry) = self.get_mut(slot) else {
            return;
        };
        let prev = entry.prev.take();
        let next = entry.next.take();

        match prev {
            Some(prev) => {
                if let Some(node) = self.get_mut(prev) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(next) => {
                if let Some(node) = self.get_mut(next) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    // must only be called for an unlinked slot
    fn prepend(&mut self, slot: usize) {
        let old_head = self.head;
        if let Some(entry) = self.get_mut(slot) {
            entry.prev = None;
            entry.next = old_head;
        }
        if let Some(node) = old_head.and_then(|head| self.get_mut(head)) {
            node.prev = Some(slot);
        }
        self.head = Some(slot);
        if self.tail.is_none() {
            self.tail = Some(slot);
        }
    }

    /// Walks the list in both directions and checks every link.
    ///
    /// Returns the slots from head to tail.
    #[cfg(test)]
    pub fn assert_consistent(&self) -> Vec<usize> {
        let mut forward = Vec::new();
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let entry = self.get(slot).expect("linked slot must be occupied");
            assert_eq!(entry.prev, prev, "broken prev link at slot {}", slot);
            assert!(forward.len() < self.len, "list is longer than len (cycle?)");
            forward.push(slot);
            prev = Some(slot);
            cursor = entry.next;
        }
        assert_eq!(prev, self.tail, "walk from head must end at tail");
        assert_eq!(forward.len(), self.len);

        let mut backward = Vec::new();
        let mut cursor = self.tail;
        while let Some(slot) = cursor {
            backward.push(slot);
            cursor = self.get(slot).and_then(|entry| entry.prev);
        }
        backward.reverse();
        assert_eq!(forward, backward);

        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(occupied, self.len, "unlinked entries left in the arena");
        forward
    }
}
