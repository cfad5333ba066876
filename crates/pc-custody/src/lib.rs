//! # PC Custody
//!
//! Permissioned custody ledger for pharmaceutical batches.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Track who holds each batch, where it has been and what lifecycle state it
//! is in, and enforce that only actors holding the right role may move it:
//! - Role registry administered by a single Admin
//! - Batch lifecycle (create, transfer, dispense, recall)
//! - Append-only provenance and location ledgers
//! - One journalled event per committed mutation
//!
//! ## Access Rules
//!
//! | Operation | Who may call it |
//! |-----------|-----------------|
//! | set / remove role, change admin, force metadata | Admin |
//! | create batch | Manufacturer |
//! | transfer | custodian or Transporter |
//! | update location | custodian, Regulator or Transporter |
//! | mark dispensed | Pharmacy that is the custodian |
//! | recall | Regulator |
//!
//! ## Module Structure
//!
//! ```text
//! pc-custody/
//! ├── domain/          # Batch, registry, ledgers, guard, errors
//! ├── algorithms/      # Lifecycle transition rules
//! ├── ports/           # CustodyApi, Clock
//! ├── adapters/        # SystemClock, ManualClock
//! ├── ledger.rs        # CustodyLedger engine
//! ├── requests.rs      # Dispatcher wire types
//! └── service.rs       # Async service + event publishing
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod domain;
pub mod ledger;
pub mod ports;
pub mod requests;
pub mod service;

// Re-exports
pub use adapters::{ManualClock, SystemClock};
pub use config::{ConfigError, LedgerConfig};
pub use domain::{
    Batch, CustodyError, ErrorKind, LocationRecord, NewBatch, Page, PageRequest, Participant,
};
pub use ledger::CustodyLedger;
pub use ports::{Clock, CustodyApi};
pub use requests::{
    LedgerCommand, LedgerQuery, LedgerReply, LedgerRequest, LedgerResponse, Outcome,
};
pub use service::{CustodyService, ServiceStats};

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        Batch, Clock, CustodyApi, CustodyError, CustodyLedger,
        CustodyService, ErrorKind, LedgerCommand, LedgerConfig, LedgerQuery, LedgerReply,
        LedgerRequest, LedgerResponse, ManualClock, NewBatch, PageRequest, SystemClock,
    };
    pub use shared_types::{ActorId, AuthenticatedRequest, BatchId, BatchStatus, Role};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
