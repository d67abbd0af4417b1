//! # Shared Bus - In-Process Event Bus
//!
//! Mutation flows never talk to presentation code directly. They publish
//! [`GapEvent`]s (stepper transitions, toasts, error reports, review status
//! changes) and whatever shell is attached subscribes.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Reconciler   │                    │  UI shell /  │
//! │ Revoke       │    publish()       │  logger /    │
//! │ Review       │ ──────┐            │  test probe  │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, GapEvent, NotificationLevel, ReconcileVerdict};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(DEFAULT_CHANNEL_CAPACITY, 1000);
    }
}
