//! Outbound ports (SPI) for Block Propagation subsystem.

use shared_types::{Block, BlockHeaderWrapper, Difficulty, NodeId};

use crate::events::MessageDecodeError;

/// Destination for decoded headers (the header sync queue).
pub trait HeaderSink: Send + Sync {
    /// Queue headers in the given order. Returns how many were accepted.
    fn accept_headers(&self, headers: Vec<BlockHeaderWrapper>) -> usize;
}

/// Destination for block announcements received from peers.
pub trait AnnouncementSink: Send + Sync {
    /// Handle a block announced by `node_id`.
    fn on_new_block(&self, node_id: &NodeId, block: Block, difficulty: Difficulty);
}

/// Peer reputation gateway.
pub trait PeerPenalizer: Send + Sync {
    /// Report that `node_id` sent a payload violating the protocol.
    fn penalize(&self, node_id: &NodeId, reason: &MessageDecodeError);
}
