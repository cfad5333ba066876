//! # `AuthenticatedRequest` Envelope
//!
//! The wrapper for every request reaching the custody ledger.
//!
//! ## Security Properties
//!
//! - **Versioning**: All requests include a `version` field for forward compatibility.
//! - **Correlation**: Responses echo the request's `correlation_id`.
//! - **Envelope Authority**: `actor` is the sole source of truth for the caller's
//!   identity. It is filled in by the authenticating dispatcher, never by the payload.

use crate::entities::{ActorId, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The request envelope for all ledger operations.
///
/// Payloads MUST NOT carry caller identity fields; `actor` is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedRequest<T> {
    /// Protocol version. Checked before the payload is dispatched.
    pub version: u16,

    /// Verified identity of the caller.
    pub actor: ActorId,

    /// Identifier echoed back in the response.
    pub correlation_id: Uuid,

    /// Unix timestamp when the dispatcher accepted the request.
    #[serde(default)]
    pub timestamp: Timestamp,

    /// The operation payload.
    pub payload: T,
}

impl<T> AuthenticatedRequest<T> {
    /// Current protocol version.
    pub const CURRENT_VERSION: u16 = 1;

    /// Wrap a payload for `actor` with a fresh correlation id.
    pub fn new(actor: ActorId, payload: T) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            actor,
            correlation_id: Uuid::new_v4(),
            timestamp: 0,
            payload,
        }
    }

    /// Set the acceptance timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Returns true if the envelope version is supported.
    #[must_use]
    pub fn is_supported_version(&self) -> bool {
        self.version == Self::CURRENT_VERSION
    }
}
