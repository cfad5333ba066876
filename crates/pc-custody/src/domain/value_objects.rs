//! # Value Objects
//!
//! Pagination over the append-only ledgers.

use serde::{Deserialize, Serialize};

/// A window into an ordered sequence.
///
/// A `limit` of zero asks for the largest page the ledger allows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Index of the first entry to return.
    #[serde(default)]
    pub offset: usize,
    /// Maximum number of entries to return.
    #[serde(default)]
    pub limit: usize,
}

impl PageRequest {
    /// Create a page request.
    #[must_use]
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Effective limit after clamping to `max`.
    #[must_use]
    pub fn clamped_limit(&self, max: usize) -> usize {
        if self.limit == 0 {
            max
        } else {
            self.limit.min(max)
        }
    }
}

/// A page of results, in insertion order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Entries in this page.
    pub items: Vec<T>,
    /// Offset of the first entry.
    pub offset: usize,
    /// Length of the full sequence.
    pub total: usize,
}

impl<T: Clone> Page<T> {
    /// Slice `all` according to `request`, clamping the limit to `max_limit`.
    #[must_use]
    pub fn slice(all: &[T], request: PageRequest, max_limit: usize) -> Self {
        let total = all.len();
        let start = request.offset.min(total);
        let end = start
            .saturating_add(request.clamped_limit(max_limit))
            .min(total);
        Self {
            items: all[start..end].to_vec(),
            offset: request.offset,
            total,
        }
    }
}

impl<T> Page<T> {
    /// Returns true if entries exist beyond this page.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.offset.saturating_add(self.items.len()) < self.total
    }
}
