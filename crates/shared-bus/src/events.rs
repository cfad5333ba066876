//! # Ledger Events
//!
//! Defines every event the custody ledger emits. Each committed mutation
//! produces exactly one `LedgerEvent`, wrapped in an `EventRecord` carrying
//! its journal sequence number.

use serde::{Deserialize, Serialize};
use shared_types::entities::{ActorId, BatchId, BatchStatus, Role, Timestamp};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    // =========================================================================
    // ROLE REGISTRY
    // =========================================================================
    /// The Admin assigned a role to an actor.
    RoleAssigned {
        /// Actor whose role changed.
        actor: ActorId,
        /// The newly assigned role.
        role: Role,
    },

    /// The Admin reset an actor's role to `None`.
    RoleRevoked {
        /// Actor whose role was removed.
        actor: ActorId,
    },

    // =========================================================================
    // CUSTODY
    // =========================================================================
    /// A manufacturer created a new batch.
    BatchCreated {
        /// Newly allocated id.
        batch_id: BatchId,
        /// Creating manufacturer, also the first custodian.
        manufacturer: ActorId,
        /// Product name.
        name: String,
        /// Manufacturer's lot number.
        batch_number: String,
    },

    /// Custody or status changed.
    ///
    /// Dispensing is reported with `from == to` and status `Dispensed`.
    BatchTransferred {
        /// Batch affected.
        batch_id: BatchId,
        /// Custodian before the change.
        from: ActorId,
        /// Custodian after the change.
        to: ActorId,
        /// Status after the change.
        status: BatchStatus,
    },

    /// A regulator recalled a batch.
    BatchRecalled {
        /// Batch affected.
        batch_id: BatchId,
        /// Recalling regulator.
        regulator: ActorId,
    },

    // =========================================================================
    // LOCATION
    // =========================================================================
    /// A location entry was appended.
    LocationUpdated {
        /// Batch affected.
        batch_id: BatchId,
        /// Free-form location description.
        location: String,
        /// Actor who recorded the entry.
        updater: ActorId,
        /// Ledger time of the entry.
        timestamp: Timestamp,
    },

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================
    /// The Admin handed over superuser privileges.
    AdminChanged {
        /// Outgoing Admin.
        previous: ActorId,
        /// Incoming Admin.
        new_admin: ActorId,
    },

    /// The Admin overwrote a batch's metadata URI.
    MetadataForced {
        /// Batch affected.
        batch_id: BatchId,
        /// New metadata URI.
        uri: String,
    },
}

impl LedgerEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::RoleAssigned { .. } | Self::RoleRevoked { .. } => EventTopic::Registry,
            Self::BatchCreated { .. }
            | Self::BatchTransferred { .. }
            | Self::BatchRecalled { .. } => EventTopic::Custody,
            Self::LocationUpdated { .. } => EventTopic::Location,
            Self::AdminChanged { .. } | Self::MetadataForced { .. } => EventTopic::Administration,
        }
    }

    /// The batch this event concerns, if any.
    #[must_use]
    pub fn batch_id(&self) -> Option<BatchId> {
        match self {
            Self::BatchCreated { batch_id, .. }
            | Self::BatchTransferred { batch_id, .. }
            | Self::BatchRecalled { batch_id, .. }
            | Self::LocationUpdated { batch_id, .. }
            | Self::MetadataForced { batch_id, .. } => Some(*batch_id),
            Self::RoleAssigned { .. } | Self::RoleRevoked { .. } | Self::AdminChanged { .. } => {
                None
            }
        }
    }

    /// Stable event name, matching the serde `type` tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoleAssigned { .. } => "role_assigned",
            Self::RoleRevoked { .. } => "role_revoked",
            Self::BatchCreated { .. } => "batch_created",
            Self::BatchTransferred { .. } => "batch_transferred",
            Self::BatchRecalled { .. } => "batch_recalled",
            Self::LocationUpdated { .. } => "location_updated",
            Self::AdminChanged { .. } => "admin_changed",
            Self::MetadataForced { .. } => "metadata_forced",
        }
    }
}

/// A journalled event with its position in the global mutation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Sequence number, starting at 1.
    pub sequence: u64,
    /// The event itself.
    pub event: LedgerEvent,
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Role assignments and removals.
    Registry,
    /// Creation, transfer, dispense and recall.
    Custody,
    /// Location trail appends.
    Location,
    /// Admin handover and forced metadata.
    Administration,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Batches to include. Empty means all batches, and events without a
    /// batch only pass when this is empty.
    pub batch_ids: Vec<BatchId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            batch_ids: Vec::new(),
        }
    }

    /// Create a filter for events about specific batches.
    #[must_use]
    pub fn for_batches(batch_ids: Vec<BatchId>) -> Self {
        Self {
            topics: Vec::new(),
            batch_ids,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let batch_match = self.batch_ids.is_empty()
            || event
                .batch_id()
                .is_some_and(|id| self.batch_ids.contains(&id));

        topic_match && batch_match
    }
}
