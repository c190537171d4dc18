//! # Domain Module
//!
//! Core domain types for Header Sync: the unsynchronized [`HeaderQueue`],
//! its errors and its invariant checks. No locking and no I/O live here.

pub mod errors;
pub mod header_queue;
pub mod invariants;

pub use errors::*;
pub use header_queue::*;
pub use invariants::*;
