//! Structured logging.
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and either a
//! pretty or a JSON `fmt` layer. Output goes to stderr so stdout stays free
//! for the node's response stream.

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the level filter for `config`.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level).map_err(|e| TelemetryError::Config(e.to_string()))
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;

    if !config.console_output {
        tracing_subscriber::registry()
            .with(filter)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
        return Ok(());
    }

    if config.json_logs {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    tracing::info!(
        service = %config.full_service_name(),
        json = config.json_logs,
        "Logging initialized"
    );
    Ok(())
}

/// Log a journalled ledger event with its sequence number.
#[macro_export]
macro_rules! log_journal_event {
    ($level:ident, $component:expr, $msg:expr, $sequence:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            sequence = $sequence,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a batch-related event with standard fields.
#[macro_export]
macro_rules! log_batch_event {
    ($level:ident, $component:expr, $msg:expr, $batch_id:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            batch_id = $batch_id,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log an actor-related event with standard fields.
#[macro_export]
macro_rules! log_actor_event {
    ($level:ident, $component:expr, $msg:expr, $actor:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            actor = %$actor,
            $($($field)*,)?
            $msg
        )
    };
}
