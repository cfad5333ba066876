//! # Node Runtime
//!
//! Owns the custody service and the event bus, runs the audit subscriber and
//! serves request lines.
//!
//! ## Startup Sequence
//!
//! 1. Resolve the bootstrap Admin from configuration
//! 2. Build the ledger and the event bus
//! 3. Start the audit subscriber (before any request is served)
//! 4. Serve request lines until the input ends
//! 5. Signal shutdown; the audit task drains and exits

use crate::audit::{self, AuditSummary};
use crate::ingress::{decode_line, RequestEnvelope};
use anyhow::{Context, Result};
use pc_custody::{
    Clock, CustodyLedger, CustodyService, LedgerCommand, LedgerConfig, LedgerRequest,
    LedgerResponse,
};
use pharmachain_telemetry::metrics::{self, HistogramTimer};
use shared_bus::{EventFilter, InMemoryEventBus};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Counts for one [`NodeRuntime::run`] call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Responses written.
    pub responses: u64,
    /// Responses carrying an error.
    pub rejected: u64,
}

/// The ledger node.
pub struct NodeRuntime<C: Clock> {
    service: Arc<CustodyService<C, InMemoryEventBus>>,
    bus: Arc<InMemoryEventBus>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl<C: Clock + 'static> NodeRuntime<C> {
    /// Create a runtime from configuration.
    ///
    /// Fails if no usable bootstrap Admin is configured.
    pub fn new(config: &LedgerConfig, clock: C) -> Result<Self> {
        let admin = config
            .require_admin()
            .context("a bootstrap admin is required (set PC_BOOTSTRAP_ADMIN)")?;
        let ledger =
            CustodyLedger::with_config(admin, clock, config).context("failed to create ledger")?;
        let bus = Arc::new(InMemoryEventBus::with_capacity(config.event_bus_capacity));
        let service = Arc::new(CustodyService::new(ledger, Arc::clone(&bus)));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        info!(
            admin = %admin,
            max_page_size = config.max_page_size,
            bus_capacity = bus.capacity(),
            "Node runtime created"
        );

        Ok(Self {
            service,
            bus,
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// The custody service.
    #[must_use]
    pub fn service(&self) -> Arc<CustodyService<C, InMemoryEventBus>> {
        Arc::clone(&self.service)
    }

    /// The event bus.
    #[must_use]
    pub fn bus(&self) -> Arc<InMemoryEventBus> {
        Arc::clone(&self.bus)
    }

    /// Spawn the audit subscriber.
    ///
    /// The subscription is taken before this returns, so every event
    /// published afterwards is seen.
    pub fn start_audit(&self) -> JoinHandle<AuditSummary> {
        let subscription = self.bus.subscribe(EventFilter::all());
        let shutdown = self.shutdown_rx.clone();
        tokio::spawn(audit::run(subscription, shutdown))
    }

    /// Stamp `request` with the ledger clock's current time.
    ///
    /// Any timestamp supplied on the wire is replaced.
    pub async fn admit(&self, request: RequestEnvelope) -> RequestEnvelope {
        let now = self.service.read(|ledger| ledger.clock().now()).await;
        request.with_timestamp(now)
    }

    /// Handle one decoded request and record its metrics.
    pub async fn handle(&self, request: RequestEnvelope) -> LedgerResponse {
        let request = self.admit(request).await;
        let op = request.payload.op_name();
        let counter = match &request.payload {
            LedgerRequest::Command(LedgerCommand::CreateBatch { .. }) => {
                Some(&*metrics::BATCHES_CREATED)
            }
            LedgerRequest::Command(LedgerCommand::RecallBatch { .. }) => {
                Some(&*metrics::BATCHES_RECALLED)
            }
            _ => None,
        };

        let response = {
            let _timer = HistogramTimer::for_op(op);
            self.service.handle(request).await
        };

        let outcome = response.error_kind().map_or("ok", |kind| kind.as_str());
        metrics::record_operation(op, outcome);
        if response.is_ok() {
            if let Some(counter) = counter {
                counter.inc();
            }
        }
        let sequence = self.service.read(|ledger| ledger.last_sequence()).await;
        metrics::JOURNAL_SEQUENCE.set(sequence as f64);

        response
    }

    /// Decode and handle one input line. Blank lines yield no response.
    pub async fn process_line(&self, line: &str) -> Option<LedgerResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match decode_line(line) {
            Ok(request) => Some(self.handle(request).await),
            Err(rejection) => {
                metrics::DECODE_FAILURES.inc();
                metrics::record_operation("malformed", "invalid_argument");
                Some(rejection)
            }
        }
    }

    /// Serve newline-delimited requests from `reader`, writing one JSON
    /// response per line to `writer`, until the input ends.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<RunSummary>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut summary = RunSummary::default();

        while let Some(line) = lines
            .next_line()
            .await
            .context("failed to read request line")?
        {
            let Some(response) = self.process_line(&line).await else {
                continue;
            };
            summary.responses += 1;
            if !response.is_ok() {
                summary.rejected += 1;
            }

            let mut encoded =
                serde_json::to_string(&response).context("failed to encode response")?;
            encoded.push('\n');
            writer
                .write_all(encoded.as_bytes())
                .await
                .context("failed to write response")?;
        }
        writer.flush().await.context("failed to flush responses")?;

        info!(
            responses = summary.responses,
            rejected = summary.rejected,
            "Input exhausted"
        );
        Ok(summary)
    }

    /// Signal background tasks to stop.
    pub fn shutdown(&self) {
        info!("Initiating shutdown");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
    }
}
