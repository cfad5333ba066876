//! # PharmaChain Node
//!
//! Serves the custody ledger over newline-delimited JSON.
//!
//! Each input line is an `AuthenticatedRequest` envelope; each output line is
//! the matching `LedgerResponse`. Logs go to stderr.
//!
//! ## Configuration
//!
//! - `PC_BOOTSTRAP_ADMIN` (required), `PC_MAX_PAGE_SIZE`,
//!   `PC_STRICT_BATCH_FIELDS`, `PC_EVENT_BUS_CAPACITY`
//! - `PC_LOG_LEVEL` / `RUST_LOG`, `PC_JSON_LOGS`, `PC_CONSOLE_OUTPUT`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use node_runtime::NodeRuntime;
use pc_custody::{LedgerConfig, SystemClock};
use pharmachain_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};

/// PharmaChain custody ledger node
#[derive(Parser, Debug)]
#[command(name = "pc-node")]
#[command(about = "Permissioned custody ledger for pharmaceutical batches")]
struct Args {
    /// File of newline-delimited request envelopes (reads stdin if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Print Prometheus metrics to stderr on exit
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let telemetry_config = TelemetryConfig::from_env();
    let _telemetry = init_telemetry(&telemetry_config).context("failed to initialise telemetry")?;

    let ledger_config = LedgerConfig::from_env().context("invalid ledger configuration")?;
    let runtime = NodeRuntime::new(&ledger_config, SystemClock)?;
    let audit = runtime.start_audit();

    let stdout = tokio::io::stdout();
    let summary = match &args.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            runtime.run(BufReader::new(file), stdout).await?
        }
        None => runtime.run(BufReader::new(tokio::io::stdin()), stdout).await?,
    };

    runtime.shutdown();
    let audit_summary = audit.await.context("audit task failed")?;

    info!(
        responses = summary.responses,
        rejected = summary.rejected,
        events = audit_summary.events,
        "Node stopped"
    );

    if args.metrics {
        eprint!("{}", encode_metrics()?);
    }

    Ok(())
}
