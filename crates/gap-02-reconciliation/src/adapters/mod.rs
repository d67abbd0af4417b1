//! # Adapters
//!
//! Bus-backed feedback channels plus scripted test doubles.

pub mod memory;
pub mod notify;

pub use memory::{
    CountingRefresh, MockWriteAction, RecordingErrorReporter, RecordingNotifier, ScriptedSource,
};
pub use notify::{BusNotifier, TracingErrorReporter};
