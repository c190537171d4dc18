//! Inbound ports (API) for Block Propagation subsystem.

use shared_types::{Block, Difficulty, NodeId};

use crate::domain::{IngestMetrics, IngestOutcome, NewBlockMessage};
use crate::events::MessageDecodeError;

/// Primary API for eth message ingest.
pub trait MessageIngestApi: Send + Sync {
    /// Handle one eth message received from `node_id`.
    ///
    /// # Arguments
    /// * `node_id` - Peer the payload came from
    /// * `code` - Eth message code from the wire
    /// * `payload` - RLP payload
    ///
    /// # Returns
    /// What the message was forwarded as, or the decode error. Protocol
    /// violations have already been reported to the peer penalizer.
    fn handle_message(
        &self,
        node_id: &NodeId,
        code: u8,
        payload: Vec<u8>,
    ) -> Result<IngestOutcome, MessageDecodeError>;

    /// Build the `NEW_BLOCK` announcement for a locally produced block.
    fn announce_block(&self, block: Block, difficulty: Difficulty) -> NewBlockMessage;

    /// Snapshot of the ingest counters.
    fn get_ingest_metrics(&self) -> IngestMetrics;
}
