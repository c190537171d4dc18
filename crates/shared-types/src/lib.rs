//! # Shared Types Crate
//!
//! This crate contains the chain entities exchanged between the networking
//! and synchronization subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Blocks, headers and peer identities are
//!   defined once here.
//! - **Canonical Encoding**: Every entity that crosses the wire implements
//!   `rlp::Encodable` and `rlp::Decodable`. Encoding is deterministic, so two
//!   nodes always produce identical bytes for identical values.
//! - **No Validation**: Entities are plain data. Checking that a header is
//!   well-formed belongs to consensus, not to these types.

pub mod entities;

pub use entities::*;

// Re-exported so downstream crates encode with the same RLP toolkit.
pub use rlp;
