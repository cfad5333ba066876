//! # Domain Errors
//!
//! Every rejection the custody ledger can produce. Errors are synchronous,
//! non-retryable, and leave ledger state untouched.

use serde::{Deserialize, Serialize};
use shared_types::entities::{ActorId, BatchId, BatchStatus, Role};
use std::fmt;
use thiserror::Error;

/// Coarse error classification exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Role, ownership or lifecycle violation.
    Unauthorized,
    /// Referenced batch does not exist.
    NotFound,
    /// Malformed input.
    InvalidArgument,
}

impl ErrorKind {
    /// Stable lowercase name, matching the serde form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::InvalidArgument => "invalid_argument",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Custody ledger error types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CustodyError {
    /// Caller is not the Admin.
    #[error("Caller {actor} is not the admin")]
    NotAdmin {
        /// Rejected caller
        actor: ActorId,
    },

    /// Caller lacks the exact role required.
    #[error("Caller {actor} lacks role {required}")]
    MissingRole {
        /// Rejected caller
        actor: ActorId,
        /// Role the operation requires
        required: Role,
    },

    /// Actor holds no role.
    #[error("Actor {actor} is not registered")]
    NotRegistered {
        /// Unregistered actor
        actor: ActorId,
    },

    /// Caller is neither the custodian nor holds an allowed role.
    #[error("Caller {actor} may not {action} batch {batch_id}")]
    NotPermitted {
        /// Rejected caller
        actor: ActorId,
        /// Batch the caller tried to act on
        batch_id: BatchId,
        /// Operation that was attempted
        action: &'static str,
    },

    /// Batch has been recalled and no longer accepts custody changes.
    #[error("Batch {0} has been recalled")]
    BatchRecalled(BatchId),

    /// Batch id was never allocated.
    #[error("Batch not found: {0}")]
    BatchNotFound(BatchId),

    /// The null identifier was supplied where an actor is required.
    #[error("Null actor identifier for {0}")]
    NullActor(&'static str),

    /// `Role::None` cannot be assigned; use role removal instead.
    #[error("Role none cannot be assigned")]
    UnassignableRole,

    /// Transfer target status is not allowed.
    #[error("Invalid transfer status: {0}")]
    InvalidStatus(BatchStatus),

    /// A required text field was empty.
    #[error("Field {0} must not be empty")]
    EmptyField(&'static str),

    /// Request envelope carries an unknown protocol version.
    #[error("Unsupported request version {got} (expected {expected})")]
    UnsupportedVersion {
        /// Version on the envelope
        got: u16,
        /// Version this ledger speaks
        expected: u16,
    },
}

impl CustodyError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAdmin { .. }
            | Self::MissingRole { .. }
            | Self::NotRegistered { .. }
            | Self::NotPermitted { .. }
            | Self::BatchRecalled(_) => ErrorKind::Unauthorized,
            Self::BatchNotFound(_) => ErrorKind::NotFound,
            Self::NullActor(_)
            | Self::UnassignableRole
            | Self::InvalidStatus(_)
            | Self::EmptyField(_)
            | Self::UnsupportedVersion { .. } => ErrorKind::InvalidArgument,
        }
    }
}
