//! # Batch Store
//!
//! Authoritative batch records plus the id counter.

use super::entities::Batch;
use shared_types::entities::BatchId;
use std::collections::HashMap;

/// First id handed out by a fresh store.
pub const FIRST_BATCH_ID: BatchId = 1;

/// Batch table keyed by id.
///
/// Ids come from a single counter and are never reused. Batches are never
/// removed.
#[derive(Debug, Clone)]
pub struct BatchStore {
    batches: HashMap<BatchId, Batch>,
    next_id: BatchId,
}

impl Default for BatchStore {
    fn default() -> Self {
        Self {
            batches: HashMap::new(),
            next_id: FIRST_BATCH_ID,
        }
    }
}

impl BatchStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next insert will receive.
    #[must_use]
    pub fn next_id(&self) -> BatchId {
        self.next_id
    }

    /// Insert a batch under the next id. `build` receives that id.
    pub fn insert_with(&mut self, build: impl FnOnce(BatchId) -> Batch) -> BatchId {
        let id = self.next_id;
        self.batches.insert(id, build(id));
        self.next_id += 1;
        id
    }

    /// Look up a batch.
    #[must_use]
    pub fn get(&self, id: BatchId) -> Option<&Batch> {
        self.batches.get(&id)
    }

    /// Look up a batch for mutation.
    pub fn get_mut(&mut self, id: BatchId) -> Option<&mut Batch> {
        self.batches.get_mut(&id)
    }

    /// Returns true if `id` was ever allocated.
    #[must_use]
    pub fn contains(&self, id: BatchId) -> bool {
        self.batches.contains_key(&id)
    }

    /// Number of batches created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Returns true if no batch has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}
