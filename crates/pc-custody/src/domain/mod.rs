//! # Domain Module
//!
//! Ledger state components and the access guard.

pub mod batch_store;
pub mod entities;
pub mod errors;
pub mod guard;
pub mod history;
pub mod registry;
pub mod value_objects;

pub use batch_store::{BatchStore, FIRST_BATCH_ID};
pub use entities::*;
pub use errors::*;
pub use guard::*;
pub use history::{HistoryLedger, LocationLedger, ProvenanceLedger};
pub use registry::RoleRegistry;
pub use value_objects::*;
