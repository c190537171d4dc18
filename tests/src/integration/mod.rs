//! # Integration Tests
//!
//! Wires real subsystem crates together through the adapters a node
//! runtime would provide.

pub mod sync_pipeline;
