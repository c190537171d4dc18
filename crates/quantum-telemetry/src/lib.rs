//! # Quantum Telemetry
//!
//! Observability plumbing shared by Quantum-Chain subsystems.
//!
//! ## Components
//!
//! - **Logging**: a `tracing-subscriber` stack (pretty or JSON) plus
//!   structured log macros with consistent field names
//! - **Alerting**: the [`PanicReporter`] sink for fatal internal-consistency
//!   violations and its default implementation, [`PanicProcessor`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quantum_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() {
//!     let config = TelemetryConfig::for_subsystem("13", "header-sync");
//!     let _guard = init_telemetry(config).expect("Failed to init telemetry");
//!
//!     // Your application code here
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `quantum-chain` | Service name in logs |
//! | `QC_LOG_LEVEL` | `info` | Log level filter |
//! | `QC_SUBSYSTEM_ID` | `00` | Subsystem identifier |
//! | `QC_JSON_LOGS` | `false` | JSON log lines |

#![warn(missing_docs)]

mod config;
mod logging;
mod panic;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use panic::{PanicAlert, PanicProcessor, PanicReporter, DEFAULT_ALERT_HISTORY};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber is already installed, or installation failed.
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    /// The log filter directive could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for the process.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    logging::init_logging(&config)?;

    Ok(TelemetryGuard {
        service: config.full_service_name(),
    })
}

/// Guard that keeps telemetry active. Logs the shutdown on drop.
pub struct TelemetryGuard {
    service: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service, "Shutting down telemetry...");
    }
}

/// Convenience macro for creating a span with subsystem context.
///
/// # Example
///
/// ```rust,ignore
/// use quantum_telemetry::subsystem_span;
///
/// fn drain() {
///     let _span = subsystem_span!("poll_batch", subsystem = "header-sync", qty = 192);
///     // ... drain logic
/// }
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
