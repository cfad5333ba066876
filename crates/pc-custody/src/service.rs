//! # Custody Service
//!
//! Async front door to the ledger. Wraps [`CustodyLedger`] in a single
//! `tokio::sync::RwLock`: commands take the write lock, queries the read lock.
//! Events journalled by a command are published to the event bus after the
//! write lock is released, in journal order.
//!
//! ## Security
//!
//! - Caller identity comes from `AuthenticatedRequest.actor` only.
//! - Envelopes with an unsupported version never reach the ledger.

use crate::domain::{CustodyError, ErrorKind};
use crate::ledger::CustodyLedger;
use crate::ports::inbound::CustodyApi;
use crate::ports::outbound::Clock;
use crate::requests::{execute, query, LedgerReply, LedgerRequest, LedgerResponse};
use shared_bus::EventPublisher;
use shared_types::entities::ActorId;
use shared_types::envelope::AuthenticatedRequest;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

/// Statistics for the Custody Service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Requests handled, including rejected ones.
    pub requests_handled: u64,
    /// Commands that committed.
    pub commands_committed: u64,
    /// Queries answered successfully.
    pub queries_answered: u64,
    /// Requests rejected by the ledger or the envelope check.
    pub rejected_requests: u64,
    /// Events handed to the bus.
    pub events_published: u64,
}

/// The main Custody Service.
pub struct CustodyService<C: Clock, P: EventPublisher> {
    ledger: Arc<RwLock<CustodyLedger<C>>>,
    publisher: Arc<P>,
    /// Taken before the write lock is released so publishing follows
    /// commit order.
    publish_order: Mutex<()>,
    stats: Arc<RwLock<ServiceStats>>,
}

impl<C: Clock, P: EventPublisher> CustodyService<C, P> {
    /// Create a new Custody Service.
    pub fn new(ledger: CustodyLedger<C>, publisher: Arc<P>) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            publisher,
            publish_order: Mutex::new(()),
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    /// Run `f` against the ledger under the read lock.
    pub async fn read<R>(&self, f: impl FnOnce(&CustodyLedger<C>) -> R) -> R {
        let ledger = self.ledger.read().await;
        f(&ledger)
    }

    /// Handle one authenticated request.
    #[instrument(
        skip(self, request),
        fields(
            correlation_id = %request.correlation_id,
            actor = %request.actor,
            accepted_at = request.timestamp,
            op = request.payload.op_name()
        )
    )]
    pub async fn handle(&self, request: AuthenticatedRequest<LedgerRequest>) -> LedgerResponse {
        let correlation_id = request.correlation_id;

        let result = if request.is_supported_version() {
            self.dispatch(request.actor, request.payload).await
        } else {
            Err(CustodyError::UnsupportedVersion {
                got: request.version,
                expected: AuthenticatedRequest::<LedgerRequest>::CURRENT_VERSION,
            })
        };

        {
            let mut stats = self.stats.write().await;
            stats.requests_handled += 1;
            if result.is_err() {
                stats.rejected_requests += 1;
            }
        }

        if let Err(e) = &result {
            match e.kind() {
                ErrorKind::Unauthorized => warn!(error = %e, "Request rejected"),
                ErrorKind::NotFound | ErrorKind::InvalidArgument => {
                    debug!(error = %e, kind = %e.kind(), "Request rejected")
                }
            }
        }

        LedgerResponse::new(correlation_id, result)
    }

    async fn dispatch(
        &self,
        caller: ActorId,
        request: LedgerRequest,
    ) -> Result<LedgerReply, CustodyError> {
        match request {
            LedgerRequest::Query(q) => {
                let result = {
                    let ledger = self.ledger.read().await;
                    query(&*ledger, &q)
                };
                if result.is_ok() {
                    self.stats.write().await.queries_answered += 1;
                }
                result
            }
            LedgerRequest::Command(command) => {
                let op = command.op_name();
                let (result, fresh, publish_guard) = {
                    let mut ledger = self.ledger.write().await;
                    let before = ledger.last_sequence();
                    let result = execute(&mut *ledger, caller, command);
                    let fresh = ledger.events_since(before);
                    let guard = self.publish_order.lock().await;
                    (result, fresh, guard)
                };

                if result.is_ok() {
                    info!(op, events = fresh.len(), "Command committed");
                }

                let published = fresh.len() as u64;
                self.publisher.publish_all(fresh).await;
                drop(publish_guard);

                let mut stats = self.stats.write().await;
                stats.events_published += published;
                if result.is_ok() {
                    stats.commands_committed += 1;
                }
                result
            }
        }
    }
}
