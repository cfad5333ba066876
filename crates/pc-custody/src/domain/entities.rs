//! # Domain Entities
//!
//! Records owned by the ledger state.

use serde::{Deserialize, Serialize};
use shared_types::entities::{ActorId, BatchId, BatchStatus, Role, Timestamp};

/// Authoritative record for one batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Identifier, allocated from the ledger counter.
    pub id: BatchId,
    /// Product name.
    pub name: String,
    /// Manufacturer's lot number.
    pub batch_number: String,
    /// Ledger time at creation.
    pub manufacture_date: Timestamp,
    /// Opaque pointer to off-ledger documents. Never interpreted.
    pub metadata_uri: String,
    /// Current custodian.
    pub current_owner: ActorId,
    /// Lifecycle status.
    pub status: BatchStatus,
}

impl Batch {
    /// Returns true if `actor` is the current custodian.
    #[must_use]
    pub fn is_custodian(&self, actor: &ActorId) -> bool {
        self.current_owner == *actor
    }

    /// Returns true once the batch has been recalled.
    #[must_use]
    pub fn is_recalled(&self) -> bool {
        self.status == BatchStatus::Recalled
    }
}

/// Input for batch creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBatch {
    /// Product name.
    pub name: String,
    /// Manufacturer's lot number.
    pub batch_number: String,
    /// Opaque document pointer.
    #[serde(default)]
    pub metadata_uri: String,
}

impl NewBatch {
    /// Convenience constructor.
    pub fn new(
        name: impl Into<String>,
        batch_number: impl Into<String>,
        metadata_uri: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            batch_number: batch_number.into(),
            metadata_uri: metadata_uri.into(),
        }
    }
}

/// One entry in a batch's location trail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Free-form location description.
    pub location: String,
    /// Ledger time of the update.
    pub timestamp: Timestamp,
    /// Actor who recorded it.
    pub updater: ActorId,
}

/// A registered actor and its role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Actor identifier.
    pub actor: ActorId,
    /// Current role (never `None` in listings).
    pub role: Role,
}
