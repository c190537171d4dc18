//! # Block Propagation Subsystem (qc-05)
//!
//! Eth wire codecs for block propagation and the ingest path that feeds the
//! header sync queue.
//!
//! ## Architecture Role
//!
//! ```text
//! [Peer] ──BLOCK_HEADERS──→ [Block Propagation (5)] ──headers──→ [Header Sync (13)]
//!        ──NEW_BLOCK─────→          │
//!                                   ├──announcements──→ [Block Import]
//!                                   └──violations─────→ [Peer Reputation]
//! ```
//!
//! ## Wire Format
//!
//! - `NEW_BLOCK` (0x07): `rlp([block, difficulty])`, difficulty as an
//!   unsigned big-endian integer of any width
//! - `BLOCK_HEADERS` (0x04): `rlp([header, ...])`
//!
//! Inbound payloads are decoded lazily and at most once.
//!
//! ## Security
//!
//! - Payloads above `max_message_size_bytes` are rejected before decoding
//! - Malformed payloads and unknown codes are reported as protocol violations

pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

pub use domain::*;
pub use events::{InboundMessage, MessageDecodeError};
pub use ports::inbound::MessageIngestApi;
pub use ports::outbound::{AnnouncementSink, HeaderSink, PeerPenalizer};
pub use service::MessageIngestService;
