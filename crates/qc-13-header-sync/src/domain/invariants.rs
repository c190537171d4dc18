//! # Domain Invariants
//!
//! Business rules that must always hold true for a [`HeaderQueue`].
//!
//! These are full scans. The store never runs them on the hot path; they
//! back `HeaderStoreMem::check_consistency` and the tests.

use std::collections::HashSet;

use super::errors::InvariantViolation;
use super::header_queue::HeaderQueue;

/// Default number of headers pre-allocated by a new store.
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// Default batch size for `drain_batch`, matching the eth protocol's
/// per-request header cap.
pub const DEFAULT_POLL_BATCH_SIZE: usize = 192;

/// Invariant: both structures hold the same number of keys.
pub fn invariant_same_length(queue: &HeaderQueue) -> Result<(), InvariantViolation> {
    if queue.len() != queue.table_len() {
        return Err(InvariantViolation::LengthMismatch {
            order: queue.len(),
            table: queue.table_len(),
        });
    }
    Ok(())
}

/// Invariant: every queued number is unique and has a matching entry.
pub fn invariant_keys_resolve(queue: &HeaderQueue) -> Result<(), InvariantViolation> {
    let mut seen = HashSet::with_capacity(queue.len());
    for number in queue.numbers() {
        if !seen.insert(number) {
            return Err(InvariantViolation::DuplicateKey(number));
        }
        match queue.get(number) {
            None => return Err(InvariantViolation::MissingEntry(number)),
            Some(header) if header.number() != number => {
                return Err(InvariantViolation::KeyMismatch {
                    key: number,
                    actual: header.number(),
                })
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Check all invariants.
///
/// Equal lengths plus unique, resolvable keys imply the two key sets are
/// identical.
pub fn check_all_invariants(queue: &HeaderQueue) -> Result<(), InvariantViolation> {
    invariant_same_length(queue)?;
    invariant_keys_resolve(queue)
}
