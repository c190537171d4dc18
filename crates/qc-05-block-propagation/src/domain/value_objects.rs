//! Value objects for message ingest configuration and results.

use shared_types::Difficulty;

/// Default cap on an inbound eth payload.
pub const DEFAULT_MAX_MESSAGE_SIZE_BYTES: usize = 10 * 1024 * 1024; // 10 MB

/// Message ingest configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropagationConfig {
    /// Payloads larger than this are rejected before any decoding.
    pub max_message_size_bytes: usize,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            max_message_size_bytes: DEFAULT_MAX_MESSAGE_SIZE_BYTES,
        }
    }
}

impl PropagationConfig {
    /// Create a config for testing (small limit).
    pub fn for_testing() -> Self {
        Self {
            max_message_size_bytes: 64 * 1024,
        }
    }
}

/// What a successfully handled inbound message turned into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IngestOutcome {
    /// A `BLOCK_HEADERS` reply was forwarded to the header sink.
    Headers {
        /// Headers carried by the message
        received: usize,
        /// Headers the sink accepted (duplicates are not)
        queued: usize,
    },
    /// A `NEW_BLOCK` announcement was forwarded to the announcement sink.
    Announcement {
        /// Announced block number
        number: u64,
        /// Announced total difficulty
        difficulty: Difficulty,
    },
}

/// Ingest counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngestMetrics {
    /// Messages handed to the service, whatever their fate
    pub messages_received: u64,
    /// Headers decoded from `BLOCK_HEADERS` replies
    pub headers_received: u64,
    /// Headers the sink accepted
    pub headers_queued: u64,
    /// `NEW_BLOCK` announcements forwarded to the sink
    pub announcements_received: u64,
    /// Announcements built for local blocks
    pub announcements_sent: u64,
    /// Payloads that got the sender penalized
    pub protocol_violations: u64,
    /// Valid messages this subsystem does not consume
    pub unsupported_messages: u64,
}
