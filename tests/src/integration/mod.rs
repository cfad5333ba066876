//! # Integration Tests
//!
//! - `scenarios`: supply-chain stories driven straight through `CustodyApi`
//! - `flows`: the async service, the event bus and the node pipeline together

pub mod flows;
pub mod scenarios;
