//! # In-Memory Header Store
//!
//! [`HeaderStoreMem`] puts a [`HeaderQueue`] behind one mutex so the order
//! structure and the lookup table always change in the same critical
//! section.
//!
//! `size` and `is_empty` read an atomic counter that is only written while
//! the lock is held. They never block, and they may lag a concurrent
//! mutation by one operation.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use quantum_telemetry::subsystem_span;
use shared_types::{BlockHeaderWrapper, NodeId};
use tracing::{debug, error, info};

use crate::config::HeaderSyncConfig;
use crate::domain::{check_all_invariants, HeaderQueue, HeaderStoreError, InvariantViolation};
use crate::ports::{HeaderStore, PanicProcessor, PanicReporter};

/// Log target shared with the block queue.
const LOG_TARGET: &str = "blockqueue";

/// Component name attached to fatal-invariant alerts.
pub const PANIC_COMPONENT: &str = "headerstore";

/// Thread-safe in-memory header store.
pub struct HeaderStoreMem<P: PanicReporter = PanicProcessor> {
    queue: Mutex<HeaderQueue>,
    /// Mirror of `queue.len()`, written under the lock.
    resident: AtomicUsize,
    panic_reporter: P,
    config: HeaderSyncConfig,
}

impl HeaderStoreMem<PanicProcessor> {
    /// Create a store that reports fatal invariants to a fresh
    /// [`PanicProcessor`].
    pub fn new(config: HeaderSyncConfig) -> Self {
        Self::with_reporter(config, PanicProcessor::new())
    }
}

impl Default for HeaderStoreMem<PanicProcessor> {
    fn default() -> Self {
        Self::new(HeaderSyncConfig::default())
    }
}

impl<P: PanicReporter> HeaderStoreMem<P> {
    /// Create a store with a custom alert sink.
    pub fn with_reporter(config: HeaderSyncConfig, panic_reporter: P) -> Self {
        Self {
            queue: Mutex::new(HeaderQueue::with_capacity(config.initial_capacity)),
            resident: AtomicUsize::new(0),
            panic_reporter,
            config,
        }
    }

    /// The alert sink.
    pub fn panic_reporter(&self) -> &P {
        &self.panic_reporter
    }

    /// Current configuration.
    pub fn config(&self) -> &HeaderSyncConfig {
        &self.config
    }

    /// Poll up to the configured `poll_batch_size` headers.
    pub fn drain_batch(&self) -> Vec<BlockHeaderWrapper> {
        let qty = self.config.poll_batch_size;
        let span = subsystem_span!("drain_batch", subsystem = "header-sync", qty = qty);
        let _entered = span.enter();
        self.poll_batch(qty)
    }

    /// Run a full consistency scan under the lock.
    pub fn check_consistency(&self) -> Result<(), InvariantViolation> {
        check_all_invariants(&self.queue.lock())
    }

    fn publish_len(&self, queue: &HeaderQueue) {
        self.resident.store(queue.len(), Ordering::Release);
    }

    fn report(&self, err: &HeaderStoreError) {
        let message = err.to_string();
        error!(target: LOG_TARGET, "{}", message);
        self.panic_reporter.panic(PANIC_COMPONENT, &message);
    }

    /// Pop one header, reporting desynchronization instead of returning it.
    fn poll_locked(&self, queue: &mut HeaderQueue) -> Option<BlockHeaderWrapper> {
        match queue.pop_front() {
            Ok(header) => header,
            Err(err) => {
                self.report(&err);
                None
            }
        }
    }

    #[cfg(test)]
    fn corrupt_remove_entry(&self, number: u64) {
        self.queue.lock().corrupt_remove_entry(number);
    }
}

impl<P: PanicReporter> HeaderStore for HeaderStoreMem<P> {
    fn open(&self) {
        info!(target: LOG_TARGET, "Header store opened");
    }

    fn close(&self) {}

    fn add(&self, header: BlockHeaderWrapper) -> bool {
        let mut queue = self.queue.lock();
        let inserted = queue.push(header);
        self.publish_len(&queue);
        inserted
    }

    fn add_batch(&self, headers: Vec<BlockHeaderWrapper>) -> usize {
        if headers.is_empty() {
            return 0;
        }
        let mut queue = self.queue.lock();
        let inserted = queue.push_batch(headers);
        self.publish_len(&queue);
        inserted
    }

    fn peek(&self) -> Option<BlockHeaderWrapper> {
        let queue = self.queue.lock();
        match queue.front() {
            Ok(header) => header.cloned(),
            Err(err) => {
                self.report(&err);
                None
            }
        }
    }

    fn poll(&self) -> Option<BlockHeaderWrapper> {
        let mut queue = self.queue.lock();
        let header = self.poll_locked(&mut queue);
        self.publish_len(&queue);
        header
    }

    fn poll_batch(&self, qty: usize) -> Vec<BlockHeaderWrapper> {
        if qty == 0 || self.is_empty() {
            return Vec::new();
        }

        let mut queue = self.queue.lock();
        let mut headers = Vec::with_capacity(qty.min(queue.len()));
        while headers.len() < qty {
            match self.poll_locked(&mut queue) {
                Some(header) => headers.push(header),
                None => break,
            }
        }
        self.publish_len(&queue);
        headers
    }

    fn drop_sent_by(&self, node_id: &NodeId) -> usize {
        let removed = {
            let mut queue = self.queue.lock();
            let removed = queue.truncate_from_sender(node_id);
            self.publish_len(&queue);
            removed
        };

        match (removed.first(), removed.last()) {
            (Some(first), Some(last)) => debug!(
                target: LOG_TARGET,
                peer = %node_id.short(),
                "{} headers [{}..{}] are dropped out",
                removed.len(),
                first,
                last
            ),
            _ => debug!(target: LOG_TARGET, "0 headers are dropped out"),
        }

        removed.len()
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn size(&self) -> usize {
        self.resident.load(Ordering::Acquire)
    }

    fn clear(&self) {
        let mut queue = self.queue.lock();
        queue.clear();
        self.publish_len(&queue);
    }
}
