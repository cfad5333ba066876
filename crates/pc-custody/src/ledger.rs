//! # Custody Ledger Engine
//!
//! The sequential state machine behind [`CustodyApi`]. Every mutation runs
//! all of its guards before the first write, so a rejected call leaves the
//! registry, batch store, both history ledgers and the event journal exactly
//! as they were.
//!
//! ## Guard order
//!
//! | Operation | Checks, in order |
//! |-----------|------------------|
//! | `set_role` | admin → target non-null → role ≠ None |
//! | `remove_role` | admin |
//! | `create_batch` | Manufacturer → fields (strict mode only) |
//! | `transfer_batch` | exists → status ≠ Created → `to` non-null → not recalled → `to` registered → custodian or Transporter |
//! | `update_location` | exists → not recalled → custodian, Regulator or Transporter |
//! | `mark_dispensed` | exists → Pharmacy → custodian |
//! | `recall_batch` | exists → Regulator |
//! | `change_admin` | admin → new admin non-null |
//! | `force_set_metadata_uri` | admin → exists |

use crate::algorithms::lifecycle::{
    apply_dispense, apply_metadata_update, apply_recall, apply_transfer, is_nominally_terminal,
    validate_transfer_status, LOCATION_DELEGATE_ROLES, TRANSFER_DELEGATE_ROLES,
};
use crate::config::LedgerConfig;
use crate::domain::{
    require_admin, require_batch_exists, require_custodian_or_role, require_non_null,
    require_not_recalled, require_registered, require_role, require_role_and_custodian, Batch,
    BatchStore, CustodyError, LocationLedger, LocationRecord, NewBatch, Page, PageRequest,
    Participant, ProvenanceLedger, RoleRegistry,
};
use crate::ports::inbound::CustodyApi;
use crate::ports::outbound::Clock;
use shared_bus::{EventRecord, LedgerEvent};
use shared_types::entities::{ActorId, BatchId, BatchStatus, Role};
use tracing::trace;

/// Ledger state: registry, batches, histories, Admin and event journal.
pub struct CustodyLedger<C: Clock> {
    clock: C,
    admin: ActorId,
    registry: RoleRegistry,
    batches: BatchStore,
    owners: ProvenanceLedger,
    locations: LocationLedger,
    journal: Vec<EventRecord>,
    max_page_size: usize,
    strict_batch_fields: bool,
}

impl<C: Clock> CustodyLedger<C> {
    /// Create a ledger with default settings. `admin` becomes the Admin and
    /// is granted Regulator.
    pub fn new(admin: ActorId, clock: C) -> Result<Self, CustodyError> {
        Self::with_config(admin, clock, &LedgerConfig::default())
    }

    /// Create a ledger using `config` for page limits and field checks.
    ///
    /// `config.bootstrap_admin` is ignored; `admin` is authoritative.
    pub fn with_config(
        admin: ActorId,
        clock: C,
        config: &LedgerConfig,
    ) -> Result<Self, CustodyError> {
        require_non_null(&admin, "admin")?;

        let mut registry = RoleRegistry::new();
        registry.assign(admin, Role::Regulator);

        Ok(Self {
            clock,
            admin,
            registry,
            batches: BatchStore::new(),
            owners: ProvenanceLedger::new(),
            locations: LocationLedger::new(),
            journal: Vec::new(),
            max_page_size: config.max_page_size.max(1),
            strict_batch_fields: config.strict_batch_fields,
        })
    }

    /// Sequence number of the newest journalled event (0 if none).
    #[must_use]
    pub fn last_sequence(&self) -> u64 {
        self.journal.len() as u64
    }

    /// Number of batches created so far.
    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// The ledger's clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn emit(&mut self, event: LedgerEvent) {
        let sequence = self.journal.len() as u64 + 1;
        trace!(sequence, event = event.name(), "journalled");
        self.journal.push(EventRecord { sequence, event });
    }

    fn existing(&self, batch_id: BatchId) -> Result<&Batch, CustodyError> {
        require_batch_exists(&self.batches, batch_id)
    }

    fn existing_mut(&mut self, batch_id: BatchId) -> Result<&mut Batch, CustodyError> {
        self.batches
            .get_mut(batch_id)
            .ok_or(CustodyError::BatchNotFound(batch_id))
    }
}

impl<C: Clock> CustodyApi for CustodyLedger<C> {
    // =========================================================================
    // ROLE REGISTRY
    // =========================================================================

    fn set_role(
        &mut self,
        caller: ActorId,
        target: ActorId,
        role: Role,
    ) -> Result<(), CustodyError> {
        require_admin(&self.admin, &caller)?;
        require_non_null(&target, "target")?;
        if !role.is_registered() {
            return Err(CustodyError::UnassignableRole);
        }

        self.registry.assign(target, role);
        self.emit(LedgerEvent::RoleAssigned {
            actor: target,
            role,
        });
        Ok(())
    }

    fn remove_role(&mut self, caller: ActorId, target: ActorId) -> Result<(), CustodyError> {
        require_admin(&self.admin, &caller)?;

        self.registry.revoke(target);
        self.emit(LedgerEvent::RoleRevoked { actor: target });
        Ok(())
    }

    fn role_of(&self, actor: &ActorId) -> Role {
        self.registry.role_of(actor)
    }

    fn participants(&self) -> Vec<Participant> {
        self.registry.participants()
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    fn create_batch(&mut self, caller: ActorId, batch: NewBatch) -> Result<BatchId, CustodyError> {
        require_role(&self.registry, &caller, Role::Manufacturer)?;
        if self.strict_batch_fields {
            if batch.name.is_empty() {
                return Err(CustodyError::EmptyField("name"));
            }
            if batch.batch_number.is_empty() {
                return Err(CustodyError::EmptyField("batch_number"));
            }
        }

        let now = self.clock.now();
        let NewBatch {
            name,
            batch_number,
            metadata_uri,
        } = batch;

        let id = self.batches.insert_with(|id| Batch {
            id,
            name: name.clone(),
            batch_number: batch_number.clone(),
            manufacture_date: now,
            metadata_uri,
            current_owner: caller,
            status: BatchStatus::Created,
        });
        self.owners.append(id, caller);

        self.emit(LedgerEvent::BatchCreated {
            batch_id: id,
            manufacturer: caller,
            name,
            batch_number,
        });
        Ok(id)
    }

    fn transfer_batch(
        &mut self,
        caller: ActorId,
        batch_id: BatchId,
        to: ActorId,
        new_status: BatchStatus,
    ) -> Result<(), CustodyError> {
        {
            let batch = self.existing(batch_id)?;
            validate_transfer_status(new_status)?;
            require_non_null(&to, "to")?;
            require_not_recalled(batch)?;
            require_registered(&self.registry, &to)?;
            require_custodian_or_role(
                &self.registry,
                &caller,
                batch,
                &TRANSFER_DELEGATE_ROLES,
                "transfer",
            )?;
        }

        let batch = self.existing_mut(batch_id)?;
        let leaving = batch.status;
        let from = apply_transfer(batch, to, new_status);
        self.owners.append(batch_id, to);

        if is_nominally_terminal(leaving) {
            trace!(batch_id, from = %leaving, to = %new_status, "transfer out of terminal status");
        }
        self.emit(LedgerEvent::BatchTransferred {
            batch_id,
            from,
            to,
            status: new_status,
        });
        Ok(())
    }

    fn update_location(
        &mut self,
        caller: ActorId,
        batch_id: BatchId,
        location: String,
        metadata_uri: Option<String>,
    ) -> Result<(), CustodyError> {
        {
            let batch = self.existing(batch_id)?;
            require_not_recalled(batch)?;
            require_custodian_or_role(
                &self.registry,
                &caller,
                batch,
                &LOCATION_DELEGATE_ROLES,
                "update location of",
            )?;
        }

        let now = self.clock.now();
        let batch = self.existing_mut(batch_id)?;
        apply_metadata_update(batch, metadata_uri.as_deref());
        self.locations.append(
            batch_id,
            LocationRecord {
                location: location.clone(),
                timestamp: now,
                updater: caller,
            },
        );

        self.emit(LedgerEvent::LocationUpdated {
            batch_id,
            location,
            updater: caller,
            timestamp: now,
        });
        Ok(())
    }

    fn mark_dispensed(&mut self, caller: ActorId, batch_id: BatchId) -> Result<(), CustodyError> {
        {
            let batch = self.existing(batch_id)?;
            require_role_and_custodian(&self.registry, &caller, batch, Role::Pharmacy, "dispense")?;
        }

        apply_dispense(self.existing_mut(batch_id)?);
        self.emit(LedgerEvent::BatchTransferred {
            batch_id,
            from: caller,
            to: caller,
            status: BatchStatus::Dispensed,
        });
        Ok(())
    }

    fn recall_batch(&mut self, caller: ActorId, batch_id: BatchId) -> Result<(), CustodyError> {
        self.existing(batch_id)?;
        require_role(&self.registry, &caller, Role::Regulator)?;

        apply_recall(self.existing_mut(batch_id)?);
        self.emit(LedgerEvent::BatchRecalled {
            batch_id,
            regulator: caller,
        });
        Ok(())
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    fn change_admin(&mut self, caller: ActorId, new_admin: ActorId) -> Result<(), CustodyError> {
        require_admin(&self.admin, &caller)?;
        require_non_null(&new_admin, "new_admin")?;

        let previous = self.admin;
        self.admin = new_admin;
        self.registry.assign(new_admin, Role::Regulator);

        self.emit(LedgerEvent::AdminChanged {
            previous,
            new_admin,
        });
        Ok(())
    }

    fn force_set_metadata_uri(
        &mut self,
        caller: ActorId,
        batch_id: BatchId,
        uri: String,
    ) -> Result<(), CustodyError> {
        require_admin(&self.admin, &caller)?;
        let batch = self.existing_mut(batch_id)?;
        batch.metadata_uri = uri.clone();

        self.emit(LedgerEvent::MetadataForced { batch_id, uri });
        Ok(())
    }

    fn admin(&self) -> ActorId {
        self.admin
    }

    // =========================================================================
    // READS
    // =========================================================================

    fn batch(&self, batch_id: BatchId) -> Result<Batch, CustodyError> {
        self.existing(batch_id).cloned()
    }

    fn owners_of(&self, batch_id: BatchId) -> Result<Vec<ActorId>, CustodyError> {
        self.existing(batch_id)?;
        Ok(self.owners.entries(batch_id).to_vec())
    }

    fn locations_of(&self, batch_id: BatchId) -> Result<Vec<LocationRecord>, CustodyError> {
        self.existing(batch_id)?;
        Ok(self.locations.entries(batch_id).to_vec())
    }

    fn owners_page(
        &self,
        batch_id: BatchId,
        request: PageRequest,
    ) -> Result<Page<ActorId>, CustodyError> {
        self.existing(batch_id)?;
        Ok(self.owners.page(batch_id, request, self.max_page_size))
    }

    fn locations_page(
        &self,
        batch_id: BatchId,
        request: PageRequest,
    ) -> Result<Page<LocationRecord>, CustodyError> {
        self.existing(batch_id)?;
        Ok(self.locations.page(batch_id, request, self.max_page_size))
    }

    fn events_since(&self, after: u64) -> Vec<EventRecord> {
        let start = usize::try_from(after).unwrap_or(usize::MAX);
        self.journal
            .get(start..)
            .map(<[EventRecord]>::to_vec)
            .unwrap_or_default()
    }
}
