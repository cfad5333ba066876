//! # Access Guard
//!
//! Stateless predicates composed before every mutation. Each returns
//! `Ok(())` or the error the operation must fail with; none has side effects.

use super::batch_store::BatchStore;
use super::entities::Batch;
use super::errors::CustodyError;
use super::registry::RoleRegistry;
use shared_types::entities::{ActorId, BatchId, Role};

/// Caller must be the Admin.
pub fn require_admin(admin: &ActorId, caller: &ActorId) -> Result<(), CustodyError> {
    if admin != caller {
        return Err(CustodyError::NotAdmin { actor: *caller });
    }
    Ok(())
}

/// Caller must hold exactly `role`. No role implies another.
pub fn require_role(
    registry: &RoleRegistry,
    actor: &ActorId,
    role: Role,
) -> Result<(), CustodyError> {
    if !registry.has_role(actor, role) {
        return Err(CustodyError::MissingRole {
            actor: *actor,
            required: role,
        });
    }
    Ok(())
}

/// Actor must hold some role.
pub fn require_registered(registry: &RoleRegistry, actor: &ActorId) -> Result<(), CustodyError> {
    if !registry.is_registered(actor) {
        return Err(CustodyError::NotRegistered { actor: *actor });
    }
    Ok(())
}

/// `actor` must not be the null identifier. `field` names the argument.
pub fn require_non_null(actor: &ActorId, field: &'static str) -> Result<(), CustodyError> {
    if actor.is_zero() {
        return Err(CustodyError::NullActor(field));
    }
    Ok(())
}

/// Batch must exist. Returns it for further checks.
pub fn require_batch_exists(store: &BatchStore, id: BatchId) -> Result<&Batch, CustodyError> {
    store.get(id).ok_or(CustodyError::BatchNotFound(id))
}

/// Batch must not be recalled.
pub fn require_not_recalled(batch: &Batch) -> Result<(), CustodyError> {
    if batch.is_recalled() {
        return Err(CustodyError::BatchRecalled(batch.id));
    }
    Ok(())
}

/// Caller must be the custodian or hold one of `roles`.
pub fn require_custodian_or_role(
    registry: &RoleRegistry,
    actor: &ActorId,
    batch: &Batch,
    roles: &[Role],
    action: &'static str,
) -> Result<(), CustodyError> {
    if batch.is_custodian(actor) || roles.contains(&registry.role_of(actor)) {
        return Ok(());
    }
    Err(CustodyError::NotPermitted {
        actor: *actor,
        batch_id: batch.id,
        action,
    })
}

/// Caller must hold `role` and be the custodian.
pub fn require_role_and_custodian(
    registry: &RoleRegistry,
    actor: &ActorId,
    batch: &Batch,
    role: Role,
    action: &'static str,
) -> Result<(), CustodyError> {
    require_role(registry, actor, role)?;
    if !batch.is_custodian(actor) {
        return Err(CustodyError::NotPermitted {
            actor: *actor,
            batch_id: batch.id,
            action,
        });
    }
    Ok(())
}
