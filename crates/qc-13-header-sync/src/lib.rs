//! # QC-13 Header Sync
//!
//! In-memory queue of block headers waiting to be imported during sync.
//!
//! **Subsystem ID:** 13
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Headers arrive from many peers, out of order and with repeats. The store
//! keeps at most one header per block number, hands them out in arrival
//! order, and can evict everything a misbehaving peer contributed from its
//! first header onward.
//!
//! ## Guarantees
//!
//! | Property | Description |
//! |----------|-------------|
//! | Dedup | One resident header per block number |
//! | FIFO | Arrival order, not numeric order |
//! | Atomicity | Order and lookup table change under one lock |
//! | Suffix eviction | `drop_sent_by` removes the first match and everything after it |
//!
//! ## Module Structure
//!
//! ```text
//! qc-13-header-sync/
//! ├── domain/          # HeaderQueue, errors, invariant checks
//! ├── ports/           # HeaderStore (inbound) + PanicReporter (outbound)
//! ├── application/     # HeaderStoreMem
//! └── config.rs        # HeaderSyncConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::{HeaderStoreMem, PANIC_COMPONENT};
pub use config::HeaderSyncConfig;
pub use domain::{
    check_all_invariants, HeaderQueue, HeaderStoreError, InvariantViolation,
    DEFAULT_INITIAL_CAPACITY, DEFAULT_POLL_BATCH_SIZE,
};
pub use ports::{HeaderStore, PanicProcessor, PanicReporter};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
