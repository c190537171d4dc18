//! # Outbound Ports
//!
//! The header store has a single outbound dependency: somewhere to raise
//! fatal-invariant alerts. The trait lives in `quantum-telemetry` so other
//! subsystems report through the same sink.

pub use quantum_telemetry::{PanicProcessor, PanicReporter};
