//! # PharmaChain Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs       # Shared actors, ledgers and services
//! │   └── integration/      # Cross-crate flows
//! │       ├── scenarios.rs  # Supply-chain stories against the ledger
//! │       └── flows.rs      # Service → bus → subscriber, node pipeline
//! └── benches/
//!     └── ledger_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p pc-tests
//!
//! # By category
//! cargo test -p pc-tests integration::scenarios::
//!
//! # Benchmarks
//! cargo bench -p pc-tests
//! ```

#![allow(dead_code)]

pub mod integration;
