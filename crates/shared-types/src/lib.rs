//! # Shared Types Crate
//!
//! Primitives and the `AuthenticatedRequest<T>` envelope shared by every
//! PharmaChain crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Cross-crate types are defined here.
//! - **Envelope Integrity**: `AuthenticatedRequest<T>` is the sole wrapper
//!   for requests entering the ledger.
//! - **No Redundant Identity**: Payloads MUST NOT contain caller fields;
//!   the envelope's `actor` is authoritative.

pub mod entities;
pub mod envelope;

pub use entities::*;
pub use envelope::AuthenticatedRequest;
