//! # Header Sync Configuration
//!
//! Configuration for the in-memory header store.

use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_INITIAL_CAPACITY, DEFAULT_POLL_BATCH_SIZE};

/// Header store configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderSyncConfig {
    /// Headers to pre-allocate room for in both the order structure and the
    /// lookup table.
    pub initial_capacity: usize,

    /// Maximum headers handed out by one `drain_batch` call.
    pub poll_batch_size: usize,
}

impl Default for HeaderSyncConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            poll_batch_size: DEFAULT_POLL_BATCH_SIZE,
        }
    }
}

impl HeaderSyncConfig {
    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            initial_capacity: 16,
            poll_batch_size: 4,
        }
    }
}
