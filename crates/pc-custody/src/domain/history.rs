//! # Provenance & Location Ledgers
//!
//! Per-batch append-only sequences. There is no API to edit or remove an
//! entry once appended.

use super::entities::LocationRecord;
use super::value_objects::{Page, PageRequest};
use shared_types::entities::{ActorId, BatchId};
use std::collections::HashMap;

/// Append-only, per-batch history, oldest entry first.
///
/// A batch's sequence is created on its first append.
#[derive(Debug, Clone)]
pub struct HistoryLedger<T> {
    entries: HashMap<BatchId, Vec<T>>,
}

impl<T> Default for HistoryLedger<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Clone> HistoryLedger<T> {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` to the batch's sequence.
    pub fn append(&mut self, batch_id: BatchId, entry: T) {
        self.entries.entry(batch_id).or_default().push(entry);
    }

    /// Full sequence for a batch; empty if nothing was appended.
    #[must_use]
    pub fn entries(&self, batch_id: BatchId) -> &[T] {
        self.entries.get(&batch_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of entries recorded for a batch.
    #[must_use]
    pub fn len(&self, batch_id: BatchId) -> usize {
        self.entries(batch_id).len()
    }

    /// One page of a batch's sequence.
    #[must_use]
    pub fn page(&self, batch_id: BatchId, request: PageRequest, max_limit: usize) -> Page<T> {
        Page::slice(self.entries(batch_id), request, max_limit)
    }
}

/// Custodians per batch: the creator, then each transfer recipient.
pub type ProvenanceLedger = HistoryLedger<ActorId>;

/// Location trail per batch.
pub type LocationLedger = HistoryLedger<LocationRecord>;
