//! # Event Publisher
//!
//! Sending side of the bus plus the per-topic bookkeeping the runtime and
//! tests read back (who is listening, how much went out on each topic).

use crate::events::{EventFilter, EventTopic, GapEvent};
use crate::subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionRegistry};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Anything flows can publish to.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Broadcast `event`; returns how many receivers were attached.
    async fn publish(&self, event: GapEvent) -> usize;

    /// Events published since construction, delivered or not.
    fn events_published(&self) -> u64;
}

/// Process-local bus over `tokio::sync::broadcast`.
///
/// Every subscriber receives every event; filtering happens in
/// [`Subscription`]. A slow subscriber lags and skips rather than blocking
/// publishers.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<GapEvent>,
    /// Live subscriptions per topic. Unfiltered ones count under `All`.
    registry: SubscriptionRegistry,
    per_topic: Mutex<HashMap<EventTopic, u64>>,
    total: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            registry: Arc::new(Mutex::new(HashMap::new())),
            per_topic: Mutex::new(HashMap::new()),
            total: AtomicU64::new(0),
            capacity,
        }
    }

    /// Attach a subscriber yielding only events matching `filter`.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let topics = if filter.topics.is_empty() {
            vec![EventTopic::All]
        } else {
            filter.topics.clone()
        };
        {
            let mut registry = self.registry.lock();
            for topic in &topics {
                *registry.entry(*topic).or_insert(0) += 1;
            }
        }
        debug!(topics = ?topics, operations = ?filter.operations, "Subscriber attached");

        Subscription::new(
            self.sender.subscribe(),
            filter,
            Arc::clone(&self.registry),
            topics,
        )
    }

    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.subscribe(filter))
    }

    /// Receivers currently attached, whatever their filter.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Subscriptions whose filter lets `topic` through.
    #[must_use]
    pub fn listeners(&self, topic: EventTopic) -> usize {
        let registry = self.registry.lock();
        let direct = registry.get(&topic).copied().unwrap_or(0);
        if topic == EventTopic::All {
            return direct;
        }
        direct + registry.get(&EventTopic::All).copied().unwrap_or(0)
    }

    /// Events published on `topic` so far.
    #[must_use]
    pub fn published_on(&self, topic: EventTopic) -> u64 {
        self.per_topic.lock().get(&topic).copied().unwrap_or(0)
    }

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

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        InMemoryEventBus::subscribe(self, filter)
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: GapEvent) -> usize {
        let topic = event.topic();
        self.total.fetch_add(1, Ordering::Relaxed);
        *self.per_topic.lock().entry(topic).or_insert(0) += 1;

        // No receivers is normal for headless runs.
        let receivers = self.sender.send(event).unwrap_or(0);
        trace!(topic = ?topic, receivers, "Event published");
        receivers
    }

    fn events_published(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}
