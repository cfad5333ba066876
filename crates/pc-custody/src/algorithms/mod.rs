//! # Algorithms Module
//!
//! Lifecycle transition rules.

pub mod lifecycle;

pub use lifecycle::{
    apply_dispense, apply_metadata_update, apply_recall, apply_transfer, is_nominally_terminal,
    validate_transfer_status, LOCATION_DELEGATE_ROLES, TRANSFER_DELEGATE_ROLES,
};
