//! # Shared Bus - Ledger Event Bus
//!
//! Carries `LedgerEvent`s from the custody service to any number of
//! subscribers (audit log, indexers, notification relays).
//!
//! ```text
//! ┌────────────────┐   publish()    ┌──────────────┐  subscribe()  ┌────────────┐
//! │ CustodyService │ ─────────────▶ │  Event Bus   │ ────────────▶ │ Subscriber │
//! └────────────────┘                └──────────────┘               └────────────┘
//! ```
//!
//! Events reach the bus only after the mutation that produced them has
//! committed, in journal order. A consumer that replays the journal first
//! can use `subscribe_after` to pick up live delivery without duplicates.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{EventFilter, EventRecord, EventTopic, LedgerEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
