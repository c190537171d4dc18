//! # Application Module
//!
//! Application services wrapping the domain queue in its synchronization.

pub mod header_store;

pub use header_store::{HeaderStoreMem, PANIC_COMPONENT};
