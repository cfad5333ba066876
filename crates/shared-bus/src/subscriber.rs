//! # Event Subscriber
//!
//! Receiving side of the bus. Both [`Subscription`] and [`EventStream`] apply
//! an [`EventFilter`] locally and count the records they missed by falling
//! behind.

use crate::events::{EventFilter, EventRecord};
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::warn;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was dropped.
    #[error("Event bus closed")]
    Closed,
}

/// Pull-style handle on the bus.
pub struct Subscription {
    receiver: broadcast::Receiver<EventRecord>,
    filter: EventFilter,
    after: u64,
    lagged: u64,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<EventRecord>,
        filter: EventFilter,
        after: u64,
    ) -> Self {
        Self {
            receiver,
            filter,
            after,
            lagged: 0,
        }
    }

    fn wants(&self, record: &EventRecord) -> bool {
        record.sequence > self.after && self.filter.matches(&record.event)
    }

    /// Wait for the next matching record. `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<EventRecord> {
        loop {
            match self.receiver.recv().await {
                Ok(record) if self.wants(&record) => return Some(record),
                Ok(_) => {}
                Err(RecvError::Closed) => return None,
                Err(RecvError::Lagged(count)) => {
                    self.lagged += count;
                    warn!(lagged = count, "Subscriber lagged, records dropped");
                }
            }
        }
    }

    /// Next matching record if one is buffered.
    ///
    /// `Ok(None)` means nothing is waiting; `Err(Closed)` means the bus is
    /// gone and the buffer is drained.
    pub fn try_recv(&mut self) -> Result<Option<EventRecord>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(record) if self.wants(&record) => return Ok(Some(record)),
                Ok(_) => {}
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Closed) => return Err(SubscriptionError::Closed),
                Err(TryRecvError::Lagged(count)) => self.lagged += count,
            }
        }
    }

    /// The filter this subscription applies.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Records at or below this sequence are skipped.
    #[must_use]
    pub fn after(&self) -> u64 {
        self.after
    }

    /// Total records skipped because this subscriber fell behind.
    #[must_use]
    pub fn lagged(&self) -> u64 {
        self.lagged
    }
}

/// Push-style view of the bus as a [`Stream`].
pub struct EventStream {
    inner: BroadcastStream<EventRecord>,
    filter: EventFilter,
    lagged: u64,
}

impl EventStream {
    pub(crate) fn new(receiver: broadcast::Receiver<EventRecord>, filter: EventFilter) -> Self {
        Self {
            inner: BroadcastStream::new(receiver),
            filter,
            lagged: 0,
        }
    }

    /// The filter this stream applies.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Total records skipped because this stream fell behind.
    #[must_use]
    pub fn lagged(&self) -> u64 {
        self.lagged
    }
}

impl Stream for EventStream {
    type Item = EventRecord;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match ready!(Pin::new(&mut self.inner).poll_next(cx)) {
                None => return Poll::Ready(None),
                Some(Ok(record)) if self.filter.matches(&record.event) => {
                    return Poll::Ready(Some(record))
                }
                Some(Ok(_)) => {}
                Some(Err(BroadcastStreamRecvError::Lagged(count))) => self.lagged += count,
            }
        }
    }
}
