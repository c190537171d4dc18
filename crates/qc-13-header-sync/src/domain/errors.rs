//! # Domain Errors
//!
//! Error types for Header Sync.
//!
//! Running out of headers and re-adding a known header are normal outcomes
//! and never show up here. The only error is corruption of the queue itself.

use thiserror::Error;

/// Header store error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderStoreError {
    /// The order structure names a block number that has no entry in the
    /// lookup table.
    #[error("Header for index {number} is null")]
    Desynchronized {
        /// Block number found in the order structure
        number: u64,
    },
}

/// Invariant violations detected by a full consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// Order structure and lookup table hold a different number of keys.
    #[error("Order structure holds {order} keys but lookup table holds {table}")]
    LengthMismatch {
        /// Keys in the order structure
        order: usize,
        /// Keys in the lookup table
        table: usize,
    },

    /// A block number appears more than once in the order structure.
    #[error("Block number {0} is queued twice")]
    DuplicateKey(u64),

    /// A queued block number has no entry in the lookup table.
    #[error("Block number {0} is queued but has no header")]
    MissingEntry(u64),

    /// An entry is stored under a number different from its header's number.
    #[error("Entry stored under {key} carries header number {actual}")]
    KeyMismatch {
        /// Key in the lookup table
        key: u64,
        /// Number of the stored header
        actual: u64,
    },
}
