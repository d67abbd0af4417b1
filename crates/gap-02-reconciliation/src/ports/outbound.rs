//! # Outbound Ports
//!
//! The write being confirmed, the read path polled for it, and the user
//! feedback channels.

use async_trait::async_trait;
use shared_bus::NotificationLevel;
use shared_types::{ReadError, TxReceipt, WriteError};

use crate::domain::StepReporter;

/// A write that produces a transaction receipt.
///
/// Implementations may push intermediate steps (e.g. `Pending` once the
/// wallet signed) through `steps`.
#[async_trait]
pub trait WriteAction: Send + Sync {
    async fn submit(&self, steps: &StepReporter) -> Result<TxReceipt, WriteError>;
}

/// Latest aggregate state from the read indexer.
#[async_trait]
pub trait AggregateSource<T: Send>: Send + Sync {
    async fn fetch(&self) -> Result<T, ReadError>;
}

/// Best-effort refresh of cached aggregate state.
#[async_trait]
pub trait BackgroundRefresh: Send + Sync {
    async fn refresh(&self) -> Result<(), ReadError>;
}

/// User-facing toasts.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, level: NotificationLevel, message: &str);
}

/// Central error tracker.
#[async_trait]
pub trait ErrorReporter: Send + Sync {
    async fn report(&self, context: &str, message: &str);
}
