//! # Event Subscriber
//!
//! Receiving side of the bus. A [`Subscription`] applies its [`EventFilter`]
//! on receipt, so every subscriber sees the same broadcast but only yields
//! what it asked for.

use crate::events::{EventFilter, EventTopic, GapEvent};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was dropped.
    #[error("Event bus closed")]
    Closed,
}

/// Anything that hands out filtered subscriptions.
pub trait EventSubscriber: Send + Sync {
    fn subscribe(&self, filter: EventFilter) -> Subscription;
}

/// Live subscription count per topic, shared between bus and handles.
pub(crate) type SubscriptionRegistry = Arc<Mutex<HashMap<EventTopic, usize>>>;

/// A subscription handle for receiving events.
///
/// Dropping it unregisters the subscription.
pub struct Subscription {
    receiver: broadcast::Receiver<GapEvent>,
    filter: EventFilter,
    registry: SubscriptionRegistry,
    topics: Vec<EventTopic>,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<GapEvent>,
        filter: EventFilter,
        registry: SubscriptionRegistry,
        topics: Vec<EventTopic>,
    ) -> Self {
        Self {
            receiver,
            filter,
            registry,
            topics,
        }
    }

    /// Wait for the next matching event. `None` once the bus is gone.
    ///
    /// A lagging subscriber skips what it missed rather than failing.
    pub async fn recv(&mut self) -> Option<GapEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some events dropped");
                }
            }
        }
    }

    /// Non-blocking receive.
    ///
    /// `Ok(None)` when nothing matching is queued.
    pub fn try_recv(&mut self) -> Result<Option<GapEvent>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) => {}
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
            }
        }
    }

    /// Drain every matching event currently queued.
    pub fn drain(&mut self) -> Vec<GapEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.try_recv() {
            events.push(event);
        }
        events
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut registry = self.registry.lock();
        for topic in &self.topics {
            if let Some(count) = registry.get_mut(topic) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    registry.remove(topic);
                }
            }
        }
        debug!(topics = ?self.topics, "Subscription dropped");
    }
}

/// `Stream` adapter over a [`Subscription`].
pub struct EventStream {
    subscription: Subscription,
}

impl EventStream {
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        self.subscription.filter()
    }
}

impl Stream for EventStream {
    type Item = GapEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.subscription.try_recv() {
            Ok(Some(event)) => Poll::Ready(Some(event)),
            Ok(None) => {
                // broadcast::Receiver exposes no poll API; re-schedule.
                cx.waker().wake_by_ref();
                Poll::Pending
            }
            Err(SubscriptionError::Closed) => Poll::Ready(None),
        }
    }
}
