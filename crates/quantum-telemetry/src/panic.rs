//! Fatal-invariant alerting.
//!
//! Subsystems that detect corruption of their own state do not abort the
//! process. They report through a [`PanicReporter`], which logs at `error`
//! level and keeps the alert for operators, then carry on in a degraded mode.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Default number of alerts retained by [`PanicProcessor`].
pub const DEFAULT_ALERT_HISTORY: usize = 64;

/// Sink for fatal internal-consistency violations.
pub trait PanicReporter: Send + Sync {
    /// Report that `component` detected a violation described by `message`.
    fn panic(&self, component: &str, message: &str);
}

impl<T: PanicReporter + ?Sized> PanicReporter for Arc<T> {
    fn panic(&self, component: &str, message: &str) {
        (**self).panic(component, message)
    }
}

/// A single reported violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanicAlert {
    /// Component that raised the alert (e.g. `headerstore`).
    pub component: String,
    /// Human-readable description.
    pub message: String,
    /// Wall-clock time of the report, in milliseconds since the epoch.
    pub raised_at_ms: u64,
}

/// Default reporter: logs every alert and keeps the most recent ones.
pub struct PanicProcessor {
    history: Mutex<VecDeque<PanicAlert>>,
    history_limit: usize,
    total: AtomicU64,
}

impl Default for PanicProcessor {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_ALERT_HISTORY)
    }
}

impl PanicProcessor {
    /// Create a processor with [`DEFAULT_ALERT_HISTORY`] retained alerts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `history_limit` alerts; older ones are discarded.
    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            history: Mutex::new(VecDeque::with_capacity(history_limit)),
            history_limit,
            total: AtomicU64::new(0),
        }
    }

    /// Retained alerts, oldest first.
    pub fn alerts(&self) -> Vec<PanicAlert> {
        self.history.lock().iter().cloned().collect()
    }

    /// Number of alerts ever reported, including discarded ones.
    pub fn total_alerts(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

impl PanicReporter for PanicProcessor {
    fn panic(&self, component: &str, message: &str) {
        tracing::error!(target: "panic", component, "{}", message);

        self.total.fetch_add(1, Ordering::Relaxed);
        if self.history_limit == 0 {
            return;
        }

        let mut history = self.history.lock();
        if history.len() == self.history_limit {
            history.pop_front();
        }
        history.push_back(PanicAlert {
            component: component.to_string(),
            message: message.to_string(),
            raised_at_ms: Self::now_ms(),
        });
    }
}
