//! # Event Publisher
//!
//! Publishing side of the bus. Records arrive already numbered by the
//! ledger journal; the bus only fans them out and remembers the highest
//! sequence it has seen so late subscribers know where live delivery starts.

use crate::events::{EventFilter, EventRecord};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing journalled events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish one record. Returns the number of receivers it reached.
    async fn publish(&self, record: EventRecord) -> usize;

    /// Publish records in the order given. Returns total deliveries.
    async fn publish_all(&self, records: Vec<EventRecord>) -> usize {
        let mut delivered = 0;
        for record in records {
            delivered += self.publish(record).await;
        }
        delivered
    }

    /// Total records published.
    fn events_published(&self) -> u64;

    /// Highest sequence number published so far (0 if none).
    fn last_sequence(&self) -> u64;
}

/// In-memory event bus over `tokio::sync::broadcast`.
///
/// A subscriber that falls more than `capacity` records behind loses the
/// oldest ones; the ledger journal remains the durable record.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<EventRecord>,
    published: AtomicU64,
    last_sequence: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a bus with [`DEFAULT_CHANNEL_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus buffering up to `capacity` records per subscriber.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: AtomicU64::new(0),
            last_sequence: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to every future record matching `filter`.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.subscribe_after(filter, 0)
    }

    /// Subscribe, ignoring records with a sequence of `after` or lower.
    ///
    /// Lets a consumer replay the journal up to `after` and then switch to
    /// live delivery without seeing a record twice.
    #[must_use]
    pub fn subscribe_after(&self, filter: EventFilter, after: u64) -> Subscription {
        debug!(
            topics = ?filter.topics,
            batches = ?filter.batch_ids,
            after,
            "New subscription created"
        );
        Subscription::new(self.sender.subscribe(), filter, after)
    }

    /// Stream of every future record matching `filter`.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.sender.subscribe(), filter)
    }

    /// Number of live receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Per-subscriber buffer size.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, record: EventRecord) -> usize {
        let name = record.event.name();
        let sequence = record.sequence;

        let previous = self.last_sequence.fetch_max(sequence, Ordering::SeqCst);
        if sequence <= previous {
            warn!(sequence, previous, event = name, "Record published out of journal order");
        }
        self.published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(record) {
            Ok(receivers) => {
                debug!(sequence, event = name, receivers, "Event published");
                receivers
            }
            // No receivers is normal before anyone subscribes.
            Err(_) => {
                debug!(sequence, event = name, "Event published with no receivers");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    fn last_sequence(&self) -> u64 {
        self.last_sequence.load(Ordering::SeqCst)
    }
}
