//! # Outbound Ports
//!
//! Dependencies the ledger needs from its host.

use shared_types::entities::Timestamp;

/// Source of ledger time.
pub trait Clock: Send + Sync {
    /// Current Unix time in seconds.
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
