//! # Inbound Ports
//!
//! API trait defining what the header store can do.

use shared_types::{BlockHeaderWrapper, NodeId};

/// Header store API - inbound port.
///
/// A thread-safe, deduplicated FIFO of block headers keyed by block
/// number. Every method takes `&self` so one store can be shared between
/// the message-ingest side and the sync side.
pub trait HeaderStore: Send + Sync {
    /// Lifecycle hook called when syncing starts.
    fn open(&self);

    /// Lifecycle hook called when syncing stops. Leaves contents intact.
    fn close(&self);

    /// Append a header unless a header with the same number is already
    /// queued. Returns `true` if it was inserted.
    fn add(&self, header: BlockHeaderWrapper) -> bool;

    /// Append headers in the given order, skipping numbers already queued.
    /// Returns the number of headers inserted.
    fn add_batch(&self, headers: Vec<BlockHeaderWrapper>) -> usize;

    /// Earliest-queued header, left in place.
    fn peek(&self) -> Option<BlockHeaderWrapper>;

    /// Remove and return the earliest-queued header.
    fn poll(&self) -> Option<BlockHeaderWrapper>;

    /// Remove and return up to `qty` headers in FIFO order.
    fn poll_batch(&self, qty: usize) -> Vec<BlockHeaderWrapper>;

    /// Evict the first header sent by `node_id` and everything queued after
    /// it. Returns the number of headers removed.
    fn drop_sent_by(&self, node_id: &NodeId) -> usize;

    /// Returns `true` if nothing is queued.
    fn is_empty(&self) -> bool;

    /// Number of queued headers.
    fn size(&self) -> usize;

    /// Remove everything.
    fn clear(&self);
}
