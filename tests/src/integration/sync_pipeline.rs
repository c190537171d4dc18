//! # Sync Pipeline Integration
//!
//! Block Propagation (5) decodes eth messages and hands headers to Header
//! Sync (13). The adapters below are the node-runtime glue between the two
//! subsystems' ports.
//!
//! ## Flow Tested
//!
//! 1. **BLOCK_HEADERS → queue**: decoded headers are attributed to the
//!    sending peer and queued without duplicates
//! 2. **Protocol violation → drop**: a malformed payload evicts the peer's
//!    headers from its first queued one onward
//! 3. **NEW_BLOCK**: an announcement built on one node decodes on another

use std::sync::Arc;

use parking_lot::Mutex;
use qc_05_block_propagation::{AnnouncementSink, HeaderSink, MessageDecodeError, PeerPenalizer};
use qc_13_header_sync::HeaderStore;
use shared_types::{Block, BlockHeaderWrapper, Difficulty, NodeId};

/// Header sink backed by a header store.
pub struct StoreHeaderSink<S: HeaderStore> {
    store: Arc<S>,
}

impl<S: HeaderStore> StoreHeaderSink<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: HeaderStore> HeaderSink for StoreHeaderSink<S> {
    fn accept_headers(&self, headers: Vec<BlockHeaderWrapper>) -> usize {
        self.store.add_batch(headers)
    }
}

/// Penalizer that evicts everything the offending peer contributed.
pub struct DropPeerPenalizer<S: HeaderStore> {
    store: Arc<S>,
    penalized: Mutex<Vec<(NodeId, usize)>>,
}

impl<S: HeaderStore> DropPeerPenalizer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            penalized: Mutex::new(Vec::new()),
        }
    }

    /// `(peer, headers dropped)` per penalty, in order.
    pub fn penalized(&self) -> Vec<(NodeId, usize)> {
        self.penalized.lock().clone()
    }
}

impl<S: HeaderStore> PeerPenalizer for DropPeerPenalizer<S> {
    fn penalize(&self, node_id: &NodeId, _reason: &MessageDecodeError) {
        let dropped = self.store.drop_sent_by(node_id);
        self.penalized.lock().push((node_id.clone(), dropped));
    }
}

/// Records announcements for inspection.
#[derive(Default)]
pub struct RecordingAnnouncementSink {
    announced: Mutex<Vec<(NodeId, Block, Difficulty)>>,
}

impl RecordingAnnouncementSink {
    pub fn announced(&self) -> Vec<(NodeId, Block, Difficulty)> {
        self.announced.lock().clone()
    }
}

impl AnnouncementSink for RecordingAnnouncementSink {
    fn on_new_block(&self, node_id: &NodeId, block: Block, difficulty: Difficulty) {
        self.announced
            .lock()
            .push((node_id.clone(), block, difficulty));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::thread;

    use qc_05_block_propagation::{
        BlockHeadersMessage, EthMessage, EthMessageCode, IngestOutcome, MessageIngestApi,
        MessageIngestService, PropagationConfig,
    };
    use qc_13_header_sync::{HeaderStoreMem, HeaderSyncConfig};
    use quantum_telemetry::{init_telemetry, TelemetryConfig};
    use shared_types::{BlockHeader, U256};

    type Ingest = MessageIngestService<
        StoreHeaderSink<HeaderStoreMem>,
        RecordingAnnouncementSink,
        DropPeerPenalizer<HeaderStoreMem>,
    >;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Node {
        ingest: Ingest,
        store: Arc<HeaderStoreMem>,
        announcements: Arc<RecordingAnnouncementSink>,
        penalizer: Arc<DropPeerPenalizer<HeaderStoreMem>>,
    }

    fn create_node() -> Node {
        // Only the first caller installs the subscriber.
        let _ = init_telemetry(TelemetryConfig::for_subsystem("13", "header-sync"));

        let store = Arc::new(HeaderStoreMem::new(HeaderSyncConfig::for_testing()));
        store.open();
        let announcements = Arc::new(RecordingAnnouncementSink::default());
        let penalizer = Arc::new(DropPeerPenalizer::new(Arc::clone(&store)));
        let ingest = MessageIngestService::new(
            PropagationConfig::for_testing(),
            Arc::new(StoreHeaderSink::new(Arc::clone(&store))),
            Arc::clone(&announcements),
            Arc::clone(&penalizer),
        );
        Node {
            ingest,
            store,
            announcements,
            penalizer,
        }
    }

    fn peer(byte: u8) -> NodeId {
        NodeId::new(vec![byte; 64])
    }

    fn headers_payload(numbers: impl IntoIterator<Item = u64>) -> Vec<u8> {
        let headers = numbers
            .into_iter()
            .map(|number| BlockHeader {
                number,
                timestamp: 1_600_000_000 + number,
                ..Default::default()
            })
            .collect();
        BlockHeadersMessage::new(headers).encoded().to_vec()
    }

    fn drained_numbers(store: &HeaderStoreMem) -> Vec<u64> {
        let mut numbers = Vec::new();
        loop {
            let batch = store.drain_batch();
            if batch.is_empty() {
                return numbers;
            }
            numbers.extend(batch.iter().map(|h| h.number()));
        }
    }

    // =============================================================================
    // INTEGRATION TESTS: INGEST → HEADER STORE
    // =============================================================================

    #[test]
    fn test_headers_from_peers_are_deduplicated_in_arrival_order() {
        let node = create_node();
        let code = EthMessageCode::BlockHeaders.as_u8();

        let first = node
            .ingest
            .handle_message(&peer(1), code, headers_payload([10, 11, 12]))
            .unwrap();
        let second = node
            .ingest
            .handle_message(&peer(2), code, headers_payload([12, 13, 11, 14]))
            .unwrap();

        assert_eq!(first, IngestOutcome::Headers { received: 3, queued: 3 });
        assert_eq!(second, IngestOutcome::Headers { received: 4, queued: 2 });
        assert_eq!(node.store.size(), 5);

        // 12 stays attributed to the peer that delivered it first.
        assert!(node.store.peek().unwrap().sent_by(&peer(1)));
        assert_eq!(drained_numbers(&node.store), vec![10, 11, 12, 13, 14]);
        assert!(node.store.is_empty());
    }

    #[test]
    fn test_protocol_violation_drops_peer_suffix() {
        let node = create_node();
        let code = EthMessageCode::BlockHeaders.as_u8();

        node.ingest
            .handle_message(&peer(1), code, headers_payload([1, 2]))
            .unwrap();
        node.ingest
            .handle_message(&peer(2), code, headers_payload([3, 4]))
            .unwrap();
        node.ingest
            .handle_message(&peer(1), code, headers_payload([5]))
            .unwrap();

        // Peer 2 now sends garbage.
        let err = node
            .ingest
            .handle_message(&peer(2), code, vec![0xc3, 0x01, 0x02])
            .unwrap_err();

        assert!(err.is_protocol_violation());
        assert_eq!(node.penalizer.penalized(), vec![(peer(2), 3)]);
        assert_eq!(drained_numbers(&node.store), vec![1, 2]);
        assert!(node.store.check_consistency().is_ok());
    }

    #[test]
    fn test_unsupported_message_leaves_queue_alone() {
        let node = create_node();
        node.ingest
            .handle_message(&peer(1), 0x04, headers_payload([1]))
            .unwrap();

        let err = node
            .ingest
            .handle_message(&peer(1), EthMessageCode::GetReceipts.as_u8(), vec![0xc0])
            .unwrap_err();

        assert!(!err.is_protocol_violation());
        assert!(node.penalizer.penalized().is_empty());
        assert_eq!(node.store.size(), 1);
    }

    #[test]
    fn test_announcement_travels_between_nodes() {
        let producer = create_node();
        let receiver = create_node();

        let block = Block {
            header: BlockHeader {
                number: 4_200,
                difficulty: U256::from(131_072u64),
                ..Default::default()
            },
            ..Default::default()
        };
        let total_difficulty = Difficulty::from(U256::from(1u64) << 100);

        let message = producer
            .ingest
            .announce_block(block.clone(), total_difficulty.clone());
        let outcome = receiver
            .ingest
            .handle_message(&peer(7), message.code().as_u8(), message.encoded().to_vec())
            .unwrap();

        assert_eq!(
            outcome,
            IngestOutcome::Announcement {
                number: 4_200,
                difficulty: total_difficulty.clone()
            }
        );
        assert_eq!(
            receiver.announcements.announced(),
            vec![(peer(7), block, total_difficulty)]
        );
        assert_eq!(producer.ingest.get_ingest_metrics().announcements_sent, 1);
    }

    #[test]
    fn test_concurrent_ingest_then_drain_yields_exact_union() {
        const PEERS: u64 = 8;
        const PER_PEER: u64 = 250;

        let node = create_node();

        thread::scope(|scope| {
            for index in 0..PEERS {
                let ingest = &node.ingest;
                scope.spawn(move || {
                    let start = index * PER_PEER;
                    for chunk_start in (start..start + PER_PEER).step_by(25) {
                        ingest
                            .handle_message(
                                &peer(index as u8),
                                0x04,
                                headers_payload(chunk_start..chunk_start + 25),
                            )
                            .unwrap();
                    }
                });
            }
        });

        assert_eq!(node.store.size() as u64, PEERS * PER_PEER);
        let drained = drained_numbers(&node.store);
        let distinct: BTreeSet<u64> = drained.iter().copied().collect();

        assert_eq!(drained.len(), distinct.len());
        assert_eq!(distinct, (0..PEERS * PER_PEER).collect::<BTreeSet<_>>());
        assert_eq!(node.store.panic_reporter().total_alerts(), 0);
    }
}
