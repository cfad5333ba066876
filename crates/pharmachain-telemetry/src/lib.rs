//! # PharmaChain Telemetry
//!
//! Logging and metrics for the PharmaChain node.
//!
//! - **Logs**: `tracing` with an `EnvFilter`, pretty or JSON on stderr
//! - **Metrics**: Prometheus counters and histograms in a private registry
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pharmachain_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! let _guard = init_telemetry(&config)?;
//! tracing::info!(batch_id = 1, "Batch created");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};
pub use metrics::{encode_metrics, register_metrics, HistogramTimer, MetricsHandle};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to install the log subscriber
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Failed to register or encode metrics
    #[error("Failed to initialize metrics: {0}")]
    MetricsInit(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Holds telemetry state for the lifetime of the process.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
    service_name: String,
}

impl TelemetryGuard {
    /// Service name the logs were tagged with.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::debug!(service = %self.service_name, "Telemetry shut down");
    }
}

/// Initialize logging and register metrics.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    init_logging(config)?;
    let metrics = register_metrics()?;

    tracing::info!(
        service = %config.service_name,
        network = %config.network,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        _metrics: metrics,
        service_name: config.full_service_name(),
    })
}

/// Telemetry version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
