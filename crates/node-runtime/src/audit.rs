//! # Audit Subscriber
//!
//! Background task that logs every ledger event published on the bus and
//! counts it in Prometheus. Runs until the shutdown signal fires, then drains
//! whatever is still buffered.

use pharmachain_telemetry::metrics;
use pharmachain_telemetry::{log_actor_event, log_batch_event, log_journal_event};
use shared_bus::{EventRecord, LedgerEvent, Subscription};
use tokio::sync::watch;
use tracing::info;

/// What the audit task saw.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuditSummary {
    /// Events logged.
    pub events: u64,
    /// Events missed because the task fell behind the bus.
    pub lagged: u64,
    /// Sequence of the last event logged.
    pub last_sequence: u64,
}

impl AuditSummary {
    fn observe(&mut self, record: &EventRecord) {
        log_record(record);
        metrics::EVENTS_PUBLISHED
            .with_label_values(&[record.event.name()])
            .inc();
        self.events += 1;
        self.last_sequence = record.sequence;
    }
}

fn log_record(record: &EventRecord) {
    let event = record.event.name();
    match &record.event {
        LedgerEvent::AdminChanged { new_admin, .. } => {
            log_actor_event!(warn, "audit", "Admin changed", new_admin, sequence = record.sequence)
        }
        LedgerEvent::RoleAssigned { actor, role } => log_actor_event!(
            info,
            "audit",
            "Ledger event",
            actor,
            sequence = record.sequence,
            event,
            role = %role
        ),
        LedgerEvent::RoleRevoked { actor } => log_actor_event!(
            info,
            "audit",
            "Ledger event",
            actor,
            sequence = record.sequence,
            event
        ),
        other => match other.batch_id() {
            Some(batch_id) => log_batch_event!(
                info,
                "audit",
                "Ledger event",
                batch_id,
                sequence = record.sequence,
                event
            ),
            None => log_journal_event!(info, "audit", "Ledger event", record.sequence, event),
        },
    }
}

/// Consume `subscription` until `shutdown` flips or the bus closes.
pub async fn run(mut subscription: Subscription, mut shutdown: watch::Receiver<bool>) -> AuditSummary {
    let mut summary = AuditSummary::default();

    loop {
        tokio::select! {
            biased;
            record = subscription.recv() => match record {
                Some(record) => summary.observe(&record),
                None => break,
            },
            _ = shutdown.changed() => {
                while let Ok(Some(record)) = subscription.try_recv() {
                    summary.observe(&record);
                }
                break;
            }
        }
    }

    summary.lagged = subscription.lagged();
    if summary.lagged > 0 {
        metrics::EVENTS_LAGGED.inc_by(summary.lagged as f64);
    }

    info!(
        events = summary.events,
        lagged = summary.lagged,
        last_sequence = summary.last_sequence,
        "Audit subscriber stopped"
    );
    summary
}
