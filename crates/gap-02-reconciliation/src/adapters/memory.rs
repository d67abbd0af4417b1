//! Scripted and recording doubles for the outbound ports.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_bus::NotificationLevel;
use shared_types::{ReadError, StepStatus, TxReceipt, WriteError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::StepReporter;
use crate::ports::{AggregateSource, BackgroundRefresh, ErrorReporter, Notifier, WriteAction};

/// Keeps every toast in order.
#[derive(Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<(NotificationLevel, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<(NotificationLevel, String)> {
        self.toasts.lock().clone()
    }

    pub fn count(&self, level: NotificationLevel) -> usize {
        self.toasts.lock().iter().filter(|(l, _)| *l == level).count()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, level: NotificationLevel, message: &str) {
        self.toasts.lock().push((level, message.to_string()));
    }
}

/// Keeps every error report in order.
#[derive(Default)]
pub struct RecordingErrorReporter {
    reports: Mutex<Vec<(String, String)>>,
}

impl RecordingErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().clone()
    }
}

#[async_trait]
impl ErrorReporter for RecordingErrorReporter {
    async fn report(&self, context: &str, message: &str) {
        self.reports
            .lock()
            .push((context.to_string(), message.to_string()));
    }
}

/// Replays a fixed list of fetch results; the last one repeats forever.
pub struct ScriptedSource<T> {
    script: Mutex<VecDeque<Result<T, ReadError>>>,
    last: Mutex<Option<Result<T, ReadError>>>,
    calls: AtomicUsize,
}

impl<T: Clone + Send> ScriptedSource<T> {
    pub fn new(script: Vec<Result<T, ReadError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// `not_yet` for the first `n` calls, then `visible`.
    pub fn visible_after(n: usize, not_yet: T, visible: T) -> Self {
        let mut script: Vec<_> = (0..n).map(|_| Ok(not_yet.clone())).collect();
        script.push(Ok(visible));
        Self::new(script)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Clone + Send> AggregateSource<T> for ScriptedSource<T> {
    async fn fetch(&self) -> Result<T, ReadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().pop_front();
        let mut last = self.last.lock();
        match next {
            Some(result) => {
                *last = Some(result.clone());
                result
            }
            None => last
                .clone()
                .unwrap_or_else(|| Err(ReadError::NotFound("empty script".into()))),
        }
    }
}

/// Write that moves the stepper to `Pending` and returns a fixed result.
pub struct MockWriteAction {
    result: Result<TxReceipt, WriteError>,
    calls: AtomicUsize,
}

impl MockWriteAction {
    pub fn succeeding(receipt: TxReceipt) -> Self {
        Self {
            result: Ok(receipt),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: WriteError) -> Self {
        Self {
            result: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WriteAction for MockWriteAction {
    async fn submit(&self, steps: &StepReporter) -> Result<TxReceipt, WriteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.result.is_ok() {
            steps.set(StepStatus::Pending).await;
        }
        self.result.clone()
    }
}

/// Counts refresh calls.
#[derive(Default)]
pub struct CountingRefresh {
    calls: AtomicUsize,
}

impl CountingRefresh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackgroundRefresh for CountingRefresh {
    async fn refresh(&self) -> Result<(), ReadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
