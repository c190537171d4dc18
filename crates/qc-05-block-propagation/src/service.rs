//! # Message Ingest Service
//!
//! Glue between the eth wire and the sync pipeline.
//!
//! ## Architecture
//!
//! This service implements the inbound port [`MessageIngestApi`] and depends
//! on three outbound ports (implemented by adapters in the node runtime):
//! - [`HeaderSink`]: receives decoded headers attributed to their sender
//! - [`AnnouncementSink`]: receives blocks announced with `NEW_BLOCK`
//! - [`PeerPenalizer`]: receives protocol violations
//!
//! ## Ingest Path
//!
//! 1. Size validation (max 10MB by default), before any decoding
//! 2. Routing by wire code
//! 3. Lazy decode, forced here exactly once
//! 4. Hand-off to the matching sink
//!
//! Malformed payloads are returned to the caller and reported to the
//! penalizer. Valid codes this subsystem does not consume are returned
//! without penalty.

use parking_lot::RwLock;
use std::sync::Arc;

use quantum_telemetry::{log_block_event, log_peer_event};
use shared_types::{Block, Difficulty, NodeId};
use tracing::{debug, info};

use crate::domain::{
    check_payload_size, IngestMetrics, IngestOutcome, NewBlockMessage, PropagationConfig,
};
use crate::events::{InboundMessage, MessageDecodeError};
use crate::ports::inbound::MessageIngestApi;
use crate::ports::outbound::{AnnouncementSink, HeaderSink, PeerPenalizer};

/// Subsystem name attached to structured log events.
const SUBSYSTEM: &str = "block-propagation";

/// Message Ingest Service.
///
/// ## Thread Safety
///
/// This service is thread-safe and can be shared across peer handlers via
/// `Arc`. Counters are protected by `RwLock`; every other field is
/// immutable after construction.
pub struct MessageIngestService<H, A, P>
where
    H: HeaderSink,
    A: AnnouncementSink,
    P: PeerPenalizer,
{
    /// Service configuration.
    config: PropagationConfig,
    /// Header sync queue adapter.
    headers: Arc<H>,
    /// Block import adapter.
    announcements: Arc<A>,
    /// Peer reputation adapter.
    penalizer: Arc<P>,
    /// Ingest counters for monitoring.
    metrics: RwLock<IngestMetrics>,
}

impl<H, A, P> MessageIngestService<H, A, P>
where
    H: HeaderSink,
    A: AnnouncementSink,
    P: PeerPenalizer,
{
    /// Create a new ingest service wired to its outbound adapters.
    pub fn new(
        config: PropagationConfig,
        headers: Arc<H>,
        announcements: Arc<A>,
        penalizer: Arc<P>,
    ) -> Self {
        Self {
            config,
            headers,
            announcements,
            penalizer,
            metrics: RwLock::new(IngestMetrics::default()),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &PropagationConfig {
        &self.config
    }

    fn dispatch(
        &self,
        node_id: &NodeId,
        code: u8,
        payload: Vec<u8>,
    ) -> Result<IngestOutcome, MessageDecodeError> {
        check_payload_size(payload.len(), &self.config)?;

        match InboundMessage::route(code, payload)? {
            InboundMessage::BlockHeaders(message) => {
                let wrappers = message.into_wrappers(node_id)?;
                let received = wrappers.len();
                let queued = self.headers.accept_headers(wrappers);

                log_peer_event!(
                    debug,
                    SUBSYSTEM,
                    "Headers forwarded to sync queue",
                    node_id.short(),
                    received = received,
                    queued = queued
                );

                let mut metrics = self.metrics.write();
                metrics.headers_received += received as u64;
                metrics.headers_queued += queued as u64;
                Ok(IngestOutcome::Headers { received, queued })
            }
            InboundMessage::NewBlock(message) => {
                message.decode()?;
                debug!(peer = %node_id.short(), "Received {}", message);

                let (block, difficulty) = message.into_parts()?;
                let number = block.number();
                log_block_event!(
                    debug,
                    SUBSYSTEM,
                    "Block announced by peer",
                    number,
                    block.short_hash(),
                    peer = %node_id.short()
                );
                self.announcements
                    .on_new_block(node_id, block, difficulty.clone());

                self.metrics.write().announcements_received += 1;
                Ok(IngestOutcome::Announcement { number, difficulty })
            }
        }
    }

    fn record_failure(&self, node_id: &NodeId, code: u8, err: &MessageDecodeError) {
        if err.is_protocol_violation() {
            log_peer_event!(
                warn,
                SUBSYSTEM,
                "Protocol violation",
                node_id.short(),
                code = code,
                error = %err
            );
            self.metrics.write().protocol_violations += 1;
            self.penalizer.penalize(node_id, err);
        } else {
            debug!(peer = %node_id.short(), code, "Ignoring message: {}", err);
            self.metrics.write().unsupported_messages += 1;
        }
    }
}

impl<H, A, P> MessageIngestApi for MessageIngestService<H, A, P>
where
    H: HeaderSink,
    A: AnnouncementSink,
    P: PeerPenalizer,
{
    fn handle_message(
        &self,
        node_id: &NodeId,
        code: u8,
        payload: Vec<u8>,
    ) -> Result<IngestOutcome, MessageDecodeError> {
        self.metrics.write().messages_received += 1;

        let result = self.dispatch(node_id, code, payload);
        if let Err(err) = &result {
            self.record_failure(node_id, code, err);
        }
        result
    }

    fn announce_block(&self, block: Block, difficulty: Difficulty) -> NewBlockMessage {
        let message = NewBlockMessage::new(block, difficulty);
        info!("Announcing {}", message);
        self.metrics.write().announcements_sent += 1;
        message
    }

    fn get_ingest_metrics(&self) -> IngestMetrics {
        self.metrics.read().clone()
    }
}
