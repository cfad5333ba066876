//! # Role Registry
//!
//! Actor → role mapping. Writes here are unguarded; the ledger checks Admin
//! authority before calling them.

use super::entities::Participant;
use shared_types::entities::{ActorId, Role};
use std::collections::BTreeMap;

/// Actor → role table.
///
/// Removing a role stores `Role::None` rather than deleting the row, so
/// history that names the actor stays meaningful.
#[derive(Debug, Default, Clone)]
pub struct RoleRegistry {
    roles: BTreeMap<ActorId, Role>,
}

impl RoleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Role held by `actor`; `Role::None` if never assigned.
    #[must_use]
    pub fn role_of(&self, actor: &ActorId) -> Role {
        self.roles.get(actor).copied().unwrap_or_default()
    }

    /// Returns true if `actor` holds exactly `role`.
    #[must_use]
    pub fn has_role(&self, actor: &ActorId, role: Role) -> bool {
        self.role_of(actor) == role
    }

    /// Returns true if `actor` holds any role.
    #[must_use]
    pub fn is_registered(&self, actor: &ActorId) -> bool {
        self.role_of(actor).is_registered()
    }

    /// Overwrite the role of `actor`.
    pub fn assign(&mut self, actor: ActorId, role: Role) {
        self.roles.insert(actor, role);
    }

    /// Reset `actor` to `Role::None`.
    pub fn revoke(&mut self, actor: ActorId) {
        self.roles.insert(actor, Role::None);
    }

    /// All actors holding a role, ordered by identifier.
    #[must_use]
    pub fn participants(&self) -> Vec<Participant> {
        self.roles
            .iter()
            .filter(|(_, role)| role.is_registered())
            .map(|(actor, role)| Participant {
                actor: *actor,
                role: *role,
            })
            .collect()
    }
}
