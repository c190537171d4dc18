//! # Header Queue
//!
//! The unsynchronized core of the header store: an insertion-ordered
//! sequence of block numbers plus a number → header lookup table, always
//! mutated together.
//!
//! ## Invariants
//!
//! 1. The key set of `order` equals the key set of `headers`.
//! 2. A block number is queued at most once.
//! 3. Order is arrival order, not numeric order.
//!
//! Thread safety is the caller's job; `HeaderStoreMem` wraps this type in a
//! single mutex so both structures share one critical section.

use std::collections::{HashMap, VecDeque};

use shared_types::{BlockHeaderWrapper, NodeId};

use super::errors::HeaderStoreError;

/// Deduplicated FIFO of header entries keyed by block number.
#[derive(Debug, Default)]
pub struct HeaderQueue {
    order: VecDeque<u64>,
    headers: HashMap<u64, BlockHeaderWrapper>,
}

impl HeaderQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty queue pre-sized for `capacity` headers.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            headers: HashMap::with_capacity(capacity),
        }
    }

    /// Number of queued headers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` if a header with this number is queued.
    pub fn contains(&self, number: u64) -> bool {
        self.headers.contains_key(&number)
    }

    /// Queued header for `number`, if any.
    pub fn get(&self, number: u64) -> Option<&BlockHeaderWrapper> {
        self.headers.get(&number)
    }

    /// Queued block numbers in FIFO order.
    pub fn numbers(&self) -> impl Iterator<Item = u64> + '_ {
        self.order.iter().copied()
    }

    /// Number of entries in the lookup table.
    pub fn table_len(&self) -> usize {
        self.headers.len()
    }

    /// Append a header unless its number is already queued.
    ///
    /// Returns `true` if the header was inserted.
    pub fn push(&mut self, header: BlockHeaderWrapper) -> bool {
        let number = header.number();
        if self.contains(number) {
            return false;
        }
        self.headers.insert(number, header);
        self.order.push_back(number);
        true
    }

    /// Append headers in iteration order, skipping numbers already queued.
    ///
    /// A number repeated within the batch keeps its first occurrence.
    /// Returns the number of headers inserted.
    pub fn push_batch<I>(&mut self, headers: I) -> usize
    where
        I: IntoIterator<Item = BlockHeaderWrapper>,
    {
        headers
            .into_iter()
            .map(|header| self.push(header))
            .filter(|inserted| *inserted)
            .count()
    }

    /// Earliest-queued header without removing it.
    pub fn front(&self) -> Result<Option<&BlockHeaderWrapper>, HeaderStoreError> {
        let Some(&number) = self.order.front() else {
            return Ok(None);
        };
        self.headers
            .get(&number)
            .map(Some)
            .ok_or(HeaderStoreError::Desynchronized { number })
    }

    /// Remove and return the earliest-queued header.
    ///
    /// On desynchronization the dangling number has already been removed
    /// from the order structure when the error is returned.
    pub fn pop_front(&mut self) -> Result<Option<BlockHeaderWrapper>, HeaderStoreError> {
        let Some(number) = self.order.pop_front() else {
            return Ok(None);
        };
        self.headers
            .remove(&number)
            .map(Some)
            .ok_or(HeaderStoreError::Desynchronized { number })
    }

    /// Suffix eviction: find the first header (in FIFO order) sent by
    /// `node_id` and remove it together with every header queued after it.
    ///
    /// Returns the removed block numbers in FIFO order; empty if no queued
    /// header was sent by `node_id`.
    pub fn truncate_from_sender(&mut self, node_id: &NodeId) -> Vec<u64> {
        let position = self.order.iter().position(|number| {
            self.headers
                .get(number)
                .is_some_and(|header| header.sent_by(node_id))
        });

        let Some(position) = position else {
            return Vec::new();
        };

        let removed: Vec<u64> = self.order.split_off(position).into();
        for number in &removed {
            self.headers.remove(number);
        }
        removed
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.order.clear();
        self.headers.clear();
    }

    /// Drop a table entry while leaving its number queued.
    #[cfg(test)]
    pub(crate) fn corrupt_remove_entry(&mut self, number: u64) {
        self.headers.remove(&number);
    }
}
