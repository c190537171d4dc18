//! # Quantum-Chain Subsystem Benchmarks
//!
//! | Subsystem | Operation | Expectation |
//! |-----------|-----------|-------------|
//! | qc-13 Header Sync | add / poll | O(1) per header |
//! | qc-13 Header Sync | drop_sent_by | O(n) scan, one critical section |
//! | qc-05 Block Propagation | NEW_BLOCK encode / decode | linear in block size |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use std::time::Duration;

use qc_05_block_propagation::{EthMessage, NewBlockMessage};
use qc_13_header_sync::{HeaderStore, HeaderStoreMem, HeaderSyncConfig};
use shared_types::{
    Block, BlockHeader, BlockHeaderWrapper, Difficulty, NodeId, Transaction, U256,
};

fn wrapper(number: u64, sender: &NodeId) -> BlockHeaderWrapper {
    let header = BlockHeader {
        number,
        ..Default::default()
    };
    BlockHeaderWrapper::new(header, sender.clone())
}

fn random_peers(count: usize) -> Vec<NodeId> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let mut id = [0u8; 64];
            rng.fill(&mut id[..]);
            NodeId::new(id.to_vec())
        })
        .collect()
}

// ============================================================================
// QC-13: Header Sync Benchmarks
// ============================================================================

fn bench_header_store_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-13-header-store");
    group.measurement_time(Duration::from_secs(10));

    let peers = random_peers(16);

    for count in [192usize, 1_000, 10_000] {
        let batch: Vec<BlockHeaderWrapper> = (0..count as u64)
            .map(|n| wrapper(n, &peers[n as usize % peers.len()]))
            .collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("add_batch_then_drain", count),
            &batch,
            |b, batch| {
                b.iter(|| {
                    let store = HeaderStoreMem::new(HeaderSyncConfig::default());
                    store.add_batch(batch.clone());
                    black_box(store.poll_batch(count))
                })
            },
        );
    }

    group.bench_function("add_duplicate", |b| {
        let store = HeaderStoreMem::new(HeaderSyncConfig::default());
        store.add_batch((0..10_000).map(|n| wrapper(n, &peers[0])).collect());
        let mut rng = rand::thread_rng();

        b.iter(|| {
            let number = rng.gen_range(0..10_000);
            black_box(store.add(wrapper(number, &peers[1])))
        })
    });

    for count in [1_000u64, 10_000] {
        group.bench_with_input(
            BenchmarkId::new("drop_sent_by_late_peer", count),
            &count,
            |b, &count| {
                let late = NodeId::new(vec![0xee; 64]);
                b.iter(|| {
                    let store = HeaderStoreMem::new(HeaderSyncConfig::default());
                    store.add_batch((0..count).map(|n| wrapper(n, &peers[0])).collect());
                    store.add(wrapper(count, &late));
                    black_box(store.drop_sent_by(&late))
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// QC-05: Block Propagation Benchmarks
// ============================================================================

fn bench_new_block_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-05-new-block");
    group.measurement_time(Duration::from_secs(10));

    for tx_count in [0usize, 100, 1_000] {
        let block = Block {
            header: BlockHeader {
                number: 1_000_000,
                ..Default::default()
            },
            transactions: (0..tx_count as u64)
                .map(|nonce| Transaction {
                    nonce,
                    gas_limit: 21_000,
                    to: Some([0x42; 20]),
                    value: U256::from(nonce),
                    ..Default::default()
                })
                .collect(),
            uncles: Vec::new(),
        };
        let difficulty = Difficulty::from(17_179_869_184u64);
        let encoded = NewBlockMessage::new(block.clone(), difficulty.clone())
            .encoded()
            .to_vec();

        group.throughput(Throughput::Bytes(encoded.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("encode", tx_count),
            &block,
            |b, block| b.iter(|| black_box(NewBlockMessage::new(block.clone(), difficulty.clone()))),
        );
        group.bench_with_input(
            BenchmarkId::new("decode", tx_count),
            &encoded,
            |b, encoded| {
                b.iter(|| {
                    let message = NewBlockMessage::from_encoded(encoded.clone());
                    black_box(message.difficulty().is_ok())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_header_store_operations, bench_new_block_codec);

criterion_main!(benches);
