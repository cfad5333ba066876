//! # Batch Lifecycle
//!
//! Transition rules layered over the batch store.
//!
//! ```text
//! Created ──transfer──▶ InTransit / Received / Dispensed ──transfer──▶ ...
//!    │                         │
//!    └────────recall───────────┴──▶ Recalled (blocks transfer and location)
//! ```
//!
//! Only two rules are enforced: a transfer may not target `Created`, and a
//! recalled batch accepts no further transfer. `Dispensed` is terminal in
//! name only; a dispensed batch can still be transferred, re-dispensed or
//! recalled.

use crate::domain::{Batch, CustodyError};
use shared_types::entities::{ActorId, BatchStatus, Role};

/// Roles that may move a batch they do not hold.
pub const TRANSFER_DELEGATE_ROLES: [Role; 1] = [Role::Transporter];

/// Roles that may append location entries for a batch they do not hold.
pub const LOCATION_DELEGATE_ROLES: [Role; 2] = [Role::Regulator, Role::Transporter];

/// A transfer may set any status except `Created`.
pub fn validate_transfer_status(status: BatchStatus) -> Result<(), CustodyError> {
    if status == BatchStatus::Created {
        return Err(CustodyError::InvalidStatus(status));
    }
    Ok(())
}

/// Statuses that end a batch's working life, though nothing forbids
/// further transitions out of `Dispensed`.
#[must_use]
pub fn is_nominally_terminal(status: BatchStatus) -> bool {
    matches!(status, BatchStatus::Dispensed | BatchStatus::Recalled)
}

/// Move custody to `to` and set `status`. Returns the previous custodian.
pub fn apply_transfer(batch: &mut Batch, to: ActorId, status: BatchStatus) -> ActorId {
    let previous = batch.current_owner;
    batch.current_owner = to;
    batch.status = status;
    previous
}

/// Mark the batch dispensed. Custody is unchanged.
pub fn apply_dispense(batch: &mut Batch) {
    batch.status = BatchStatus::Dispensed;
}

/// Mark the batch recalled, from any status.
pub fn apply_recall(batch: &mut Batch) {
    batch.status = BatchStatus::Recalled;
}

/// Overwrite the metadata URI when a non-empty one is supplied.
///
/// Returns true if the URI changed.
pub fn apply_metadata_update(batch: &mut Batch, metadata_uri: Option<&str>) -> bool {
    match metadata_uri {
        Some(uri) if !uri.is_empty() => {
            batch.metadata_uri = uri.to_string();
            true
        }
        _ => false,
    }
}
