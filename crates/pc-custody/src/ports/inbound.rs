//! # Inbound Ports
//!
//! API trait defining what the custody ledger can do.
//!
//! Every mutating method takes the authenticated `caller` first. On error
//! the ledger is left exactly as it was and no event is journalled.

use crate::domain::{Batch, CustodyError, LocationRecord, NewBatch, Page, PageRequest, Participant};
use shared_bus::EventRecord;
use shared_types::entities::{ActorId, BatchId, BatchStatus, Role};

/// Custody ledger API - inbound port.
pub trait CustodyApi {
    // =========================================================================
    // ROLE REGISTRY
    // =========================================================================

    /// Assign `role` to `target`. Admin only.
    fn set_role(&mut self, caller: ActorId, target: ActorId, role: Role)
        -> Result<(), CustodyError>;

    /// Reset `target` to `Role::None`. Admin only; idempotent.
    fn remove_role(&mut self, caller: ActorId, target: ActorId) -> Result<(), CustodyError>;

    /// Role held by `actor`.
    fn role_of(&self, actor: &ActorId) -> Role;

    /// Every actor holding a role, sorted by identifier.
    fn participants(&self) -> Vec<Participant>;

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Create a batch owned by the calling manufacturer.
    fn create_batch(&mut self, caller: ActorId, batch: NewBatch) -> Result<BatchId, CustodyError>;

    /// Move custody to `to` and set `new_status`.
    fn transfer_batch(
        &mut self,
        caller: ActorId,
        batch_id: BatchId,
        to: ActorId,
        new_status: BatchStatus,
    ) -> Result<(), CustodyError>;

    /// Append a location entry, optionally replacing the metadata URI.
    fn update_location(
        &mut self,
        caller: ActorId,
        batch_id: BatchId,
        location: String,
        metadata_uri: Option<String>,
    ) -> Result<(), CustodyError>;

    /// Mark a batch dispensed by the pharmacy holding it.
    fn mark_dispensed(&mut self, caller: ActorId, batch_id: BatchId) -> Result<(), CustodyError>;

    /// Recall a batch. Regulator only.
    fn recall_batch(&mut self, caller: ActorId, batch_id: BatchId) -> Result<(), CustodyError>;

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    /// Hand Admin privileges to `new_admin`.
    fn change_admin(&mut self, caller: ActorId, new_admin: ActorId) -> Result<(), CustodyError>;

    /// Overwrite a batch's metadata URI unconditionally.
    fn force_set_metadata_uri(
        &mut self,
        caller: ActorId,
        batch_id: BatchId,
        uri: String,
    ) -> Result<(), CustodyError>;

    /// Current Admin.
    fn admin(&self) -> ActorId;

    // =========================================================================
    // READS
    // =========================================================================

    /// Snapshot of a batch.
    fn batch(&self, batch_id: BatchId) -> Result<Batch, CustodyError>;

    /// Full custodian history, oldest first.
    fn owners_of(&self, batch_id: BatchId) -> Result<Vec<ActorId>, CustodyError>;

    /// Full location trail, oldest first.
    fn locations_of(&self, batch_id: BatchId) -> Result<Vec<LocationRecord>, CustodyError>;

    /// One page of custodian history.
    fn owners_page(
        &self,
        batch_id: BatchId,
        request: PageRequest,
    ) -> Result<Page<ActorId>, CustodyError>;

    /// One page of the location trail.
    fn locations_page(
        &self,
        batch_id: BatchId,
        request: PageRequest,
    ) -> Result<Page<LocationRecord>, CustodyError>;

    /// Journalled events with a sequence number greater than `after`.
    fn events_since(&self, after: u64) -> Vec<EventRecord>;
}
