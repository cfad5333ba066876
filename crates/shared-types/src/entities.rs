//! # Core Domain Entities
//!
//! Primitives shared by every PharmaChain crate.
//!
//! ## Clusters
//!
//! - **Identity**: `ActorId`, `Role`
//! - **Custody**: `BatchId`, `BatchStatus`, `Timestamp`

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 20-byte participant address.
///
/// The all-zero address is the null identifier and is never a valid
/// participant. Serialized as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ActorId(pub [u8; 20]);

impl ActorId {
    /// The null identifier (0x0000...0000).
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an actor id from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true for the null identifier.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// `0x`-prefixed lowercase hex form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; 20]> for ActorId {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl From<ActorId> for [u8; 20] {
    fn from(actor: ActorId) -> Self {
        actor.0
    }
}

/// Error parsing an [`ActorId`] from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseActorIdError {
    /// Input was not valid hex.
    #[error("invalid hex in actor id: {0}")]
    InvalidHex(String),

    /// Decoded input had the wrong length.
    #[error("actor id must be 20 bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for ActorId {
    type Err = ParseActorIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| ParseActorIdError::InvalidHex(e.to_string()))?;
        if bytes.len() != 20 {
            return Err(ParseActorIdError::InvalidLength(bytes.len()));
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }
}

impl Serialize for ActorId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ActorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Capability tag granted to an actor by the Admin.
///
/// Comparison is exact-match: no role implies another.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Not registered (also the state after removal).
    #[default]
    None,
    /// Creates batches.
    Manufacturer,
    /// Wholesale custody.
    Distributor,
    /// Moves custody on behalf of the owner of record.
    Transporter,
    /// Dispenses to patients.
    Pharmacy,
    /// Recalls batches; the Admin is always granted this role.
    Regulator,
}

impl Role {
    /// Every role that may be assigned through the registry.
    pub const ASSIGNABLE: [Role; 5] = [
        Role::Manufacturer,
        Role::Distributor,
        Role::Transporter,
        Role::Pharmacy,
        Role::Regulator,
    ];

    /// Returns true unless this is `Role::None`.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Stable lowercase name, matching the serde form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Manufacturer => "manufacturer",
            Self::Distributor => "distributor",
            Self::Transporter => "transporter",
            Self::Pharmacy => "pharmacy",
            Self::Regulator => "regulator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CLUSTER B: CUSTODY
// =============================================================================

/// Batch identifier. Assigned from a counter starting at 1, never reused.
pub type BatchId = u64;

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Lifecycle status of a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Freshly created by a manufacturer.
    #[default]
    Created,
    /// Moving between custodians.
    InTransit,
    /// Accepted by the current custodian.
    Received,
    /// Handed out by a pharmacy.
    Dispensed,
    /// Pulled from circulation by a regulator.
    Recalled,
}

impl BatchStatus {
    /// Stable lowercase name, matching the serde form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::InTransit => "in_transit",
            Self::Received => "received",
            Self::Dispensed => "dispensed",
            Self::Recalled => "recalled",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
