//! # Request & Response Payloads
//!
//! Wire types for the request dispatcher. A request is either a
//! [`LedgerCommand`] (mutates, needs the write lock) or a [`LedgerQuery`]
//! (read-only). Both are tagged by `"op"` in snake_case, so clients send a
//! single flat JSON object:
//!
//! ```json
//! {"op": "transfer_batch", "batch_id": 1, "to": "0x…", "status": "in_transit"}
//! ```

use crate::domain::{
    Batch, CustodyError, ErrorKind, LocationRecord, NewBatch, Page, PageRequest, Participant,
};
use crate::ports::inbound::CustodyApi;
use serde::{Deserialize, Serialize};
use shared_bus::EventRecord;
use shared_types::entities::{ActorId, BatchId, BatchStatus, Role};
use uuid::Uuid;

// =============================================================================
// REQUESTS
// =============================================================================

/// Operations that change ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LedgerCommand {
    /// Assign a role.
    SetRole {
        /// Actor receiving the role.
        target: ActorId,
        /// Role to assign.
        role: Role,
    },
    /// Reset a role to `None`.
    RemoveRole {
        /// Actor losing its role.
        target: ActorId,
    },
    /// Create a batch.
    CreateBatch {
        /// Product name.
        name: String,
        /// Lot number.
        batch_number: String,
        /// Document pointer.
        #[serde(default)]
        metadata_uri: String,
    },
    /// Transfer custody.
    TransferBatch {
        /// Batch to move.
        batch_id: BatchId,
        /// Recipient.
        to: ActorId,
        /// Status after the move.
        status: BatchStatus,
    },
    /// Append a location entry.
    UpdateLocation {
        /// Batch to update.
        batch_id: BatchId,
        /// Location description.
        location: String,
        /// Replacement document pointer.
        #[serde(default)]
        metadata_uri: Option<String>,
    },
    /// Dispense a batch.
    MarkDispensed {
        /// Batch to dispense.
        batch_id: BatchId,
    },
    /// Recall a batch.
    RecallBatch {
        /// Batch to recall.
        batch_id: BatchId,
    },
    /// Hand over Admin.
    ChangeAdmin {
        /// Incoming Admin.
        new_admin: ActorId,
    },
    /// Overwrite a metadata URI.
    ForceSetMetadataUri {
        /// Batch to update.
        batch_id: BatchId,
        /// New URI.
        uri: String,
    },
}

/// Read-only operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LedgerQuery {
    /// Batch snapshot.
    GetBatch {
        /// Batch to read.
        batch_id: BatchId,
    },
    /// Full custodian history.
    GetOwnersHistory {
        /// Batch to read.
        batch_id: BatchId,
    },
    /// Full location trail.
    GetLocationsHistory {
        /// Batch to read.
        batch_id: BatchId,
    },
    /// Page of custodian history.
    GetOwnersPage {
        /// Batch to read.
        batch_id: BatchId,
        /// Window.
        #[serde(default)]
        page: PageRequest,
    },
    /// Page of the location trail.
    GetLocationsPage {
        /// Batch to read.
        batch_id: BatchId,
        /// Window.
        #[serde(default)]
        page: PageRequest,
    },
    /// Role of an actor.
    RoleOf {
        /// Actor to look up.
        actor: ActorId,
    },
    /// All registered participants.
    Participants,
    /// Current Admin.
    Admin,
    /// Journalled events after a sequence number.
    EventsSince {
        /// Exclusive lower bound; 0 returns everything.
        #[serde(default)]
        after: u64,
    },
}

/// Any request the dispatcher accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LedgerRequest {
    /// A mutation.
    Command(LedgerCommand),
    /// A read.
    Query(LedgerQuery),
}

impl From<LedgerCommand> for LedgerRequest {
    fn from(command: LedgerCommand) -> Self {
        Self::Command(command)
    }
}

impl From<LedgerQuery> for LedgerRequest {
    fn from(query: LedgerQuery) -> Self {
        Self::Query(query)
    }
}

impl LedgerCommand {
    /// Operation name, matching the `op` tag.
    #[must_use]
    pub fn op_name(&self) -> &'static str {
        match self {
            Self::SetRole { .. } => "set_role",
            Self::RemoveRole { .. } => "remove_role",
            Self::CreateBatch { .. } => "create_batch",
            Self::TransferBatch { .. } => "transfer_batch",
            Self::UpdateLocation { .. } => "update_location",
            Self::MarkDispensed { .. } => "mark_dispensed",
            Self::RecallBatch { .. } => "recall_batch",
            Self::ChangeAdmin { .. } => "change_admin",
            Self::ForceSetMetadataUri { .. } => "force_set_metadata_uri",
        }
    }
}

impl LedgerQuery {
    /// Operation name, matching the `op` tag.
    #[must_use]
    pub fn op_name(&self) -> &'static str {
        match self {
            Self::GetBatch { .. } => "get_batch",
            Self::GetOwnersHistory { .. } => "get_owners_history",
            Self::GetLocationsHistory { .. } => "get_locations_history",
            Self::GetOwnersPage { .. } => "get_owners_page",
            Self::GetLocationsPage { .. } => "get_locations_page",
            Self::RoleOf { .. } => "role_of",
            Self::Participants => "participants",
            Self::Admin => "admin",
            Self::EventsSince { .. } => "events_since",
        }
    }
}

impl LedgerRequest {
    /// Operation name, matching the `op` tag.
    #[must_use]
    pub fn op_name(&self) -> &'static str {
        match self {
            Self::Command(c) => c.op_name(),
            Self::Query(q) => q.op_name(),
        }
    }

    /// Returns true if this request changes ledger state.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::Command(_))
    }
}

// =============================================================================
// REPLIES
// =============================================================================

/// Successful result of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LedgerReply {
    /// Mutation committed with nothing to return.
    Done,
    /// Id of a newly created batch.
    BatchId(BatchId),
    /// Batch snapshot.
    Batch(Batch),
    /// Custodian history.
    Owners(Vec<ActorId>),
    /// Location trail.
    Locations(Vec<LocationRecord>),
    /// Page of custodian history.
    OwnersPage(Page<ActorId>),
    /// Page of the location trail.
    LocationsPage(Page<LocationRecord>),
    /// An actor's role.
    Role(Role),
    /// Registered participants.
    Participants(Vec<Participant>),
    /// Current Admin.
    Admin(ActorId),
    /// Journalled events.
    Events(Vec<EventRecord>),
}

/// Result carried by a [`LedgerResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The request succeeded.
    Ok {
        /// Result payload.
        reply: LedgerReply,
    },
    /// The request was rejected; state is unchanged.
    Error {
        /// Error classification.
        kind: ErrorKind,
        /// Human-readable detail.
        message: String,
    },
}

impl From<Result<LedgerReply, CustodyError>> for Outcome {
    fn from(result: Result<LedgerReply, CustodyError>) -> Self {
        match result {
            Ok(reply) => Self::Ok { reply },
            Err(e) => Self::Error {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}

/// Response to one request, echoing its correlation id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerResponse {
    /// Correlation id of the request.
    pub correlation_id: Uuid,
    /// What happened.
    pub outcome: Outcome,
}

impl LedgerResponse {
    /// Build a response from an operation result.
    pub fn new(correlation_id: Uuid, result: Result<LedgerReply, CustodyError>) -> Self {
        Self {
            correlation_id,
            outcome: result.into(),
        }
    }

    /// Returns true on success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Ok { .. })
    }

    /// Error kind, if the request failed.
    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match &self.outcome {
            Outcome::Ok { .. } => None,
            Outcome::Error { kind, .. } => Some(*kind),
        }
    }

    /// The reply, if the request succeeded.
    #[must_use]
    pub fn reply(&self) -> Option<&LedgerReply> {
        match &self.outcome {
            Outcome::Ok { reply } => Some(reply),
            Outcome::Error { .. } => None,
        }
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Apply a command on behalf of `caller`.
pub fn execute<A: CustodyApi + ?Sized>(
    api: &mut A,
    caller: ActorId,
    command: LedgerCommand,
) -> Result<LedgerReply, CustodyError> {
    match command {
        LedgerCommand::SetRole { target, role } => {
            api.set_role(caller, target, role).map(|()| LedgerReply::Done)
        }
        LedgerCommand::RemoveRole { target } => {
            api.remove_role(caller, target).map(|()| LedgerReply::Done)
        }
        LedgerCommand::CreateBatch {
            name,
            batch_number,
            metadata_uri,
        } => api
            .create_batch(caller, NewBatch::new(name, batch_number, metadata_uri))
            .map(LedgerReply::BatchId),
        LedgerCommand::TransferBatch {
            batch_id,
            to,
            status,
        } => api
            .transfer_batch(caller, batch_id, to, status)
            .map(|()| LedgerReply::Done),
        LedgerCommand::UpdateLocation {
            batch_id,
            location,
            metadata_uri,
        } => api
            .update_location(caller, batch_id, location, metadata_uri)
            .map(|()| LedgerReply::Done),
        LedgerCommand::MarkDispensed { batch_id } => {
            api.mark_dispensed(caller, batch_id).map(|()| LedgerReply::Done)
        }
        LedgerCommand::RecallBatch { batch_id } => {
            api.recall_batch(caller, batch_id).map(|()| LedgerReply::Done)
        }
        LedgerCommand::ChangeAdmin { new_admin } => {
            api.change_admin(caller, new_admin).map(|()| LedgerReply::Done)
        }
        LedgerCommand::ForceSetMetadataUri { batch_id, uri } => api
            .force_set_metadata_uri(caller, batch_id, uri)
            .map(|()| LedgerReply::Done),
    }
}

/// Answer a read-only query.
pub fn query<A: CustodyApi + ?Sized>(
    api: &A,
    request: &LedgerQuery,
) -> Result<LedgerReply, CustodyError> {
    match *request {
        LedgerQuery::GetBatch { batch_id } => api.batch(batch_id).map(LedgerReply::Batch),
        LedgerQuery::GetOwnersHistory { batch_id } => {
            api.owners_of(batch_id).map(LedgerReply::Owners)
        }
        LedgerQuery::GetLocationsHistory { batch_id } => {
            api.locations_of(batch_id).map(LedgerReply::Locations)
        }
        LedgerQuery::GetOwnersPage { batch_id, page } => {
            api.owners_page(batch_id, page).map(LedgerReply::OwnersPage)
        }
        LedgerQuery::GetLocationsPage { batch_id, page } => api
            .locations_page(batch_id, page)
            .map(LedgerReply::LocationsPage),
        LedgerQuery::RoleOf { actor } => Ok(LedgerReply::Role(api.role_of(&actor))),
        LedgerQuery::Participants => Ok(LedgerReply::Participants(api.participants())),
        LedgerQuery::Admin => Ok(LedgerReply::Admin(api.admin())),
        LedgerQuery::EventsSince { after } => Ok(LedgerReply::Events(api.events_since(after))),
    }
}
