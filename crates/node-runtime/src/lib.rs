//! # Node Runtime Library
//!
//! This library exposes the internals of the `pc-node` binary for testing.
//!
//! ## Request Flow
//!
//! ```text
//! stdin / --input ──line──→ ingress::decode_line
//!                                  │
//!                                  ↓
//!                          CustodyService::handle ──events──→ InMemoryEventBus
//!                                  │                               │
//!                                  ↓                               ↓
//!                       stdout (one JSON line)              audit::run (logs + metrics)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod audit;
pub mod ingress;
pub mod runtime;

pub use audit::AuditSummary;
pub use ingress::{decode_line, RequestEnvelope};
pub use runtime::{NodeRuntime, RunSummary};
