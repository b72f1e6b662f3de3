//! Debounced exposure checks for interactive input.
//!
//! Every keystroke submits the whole candidate value; dispatching a range
//! lookup per keystroke would leak a prefix per intermediate value and hammer
//! the endpoint. Each input identity (field, session, whatever the caller
//! keys on) owns at most one scheduled check: a new submission aborts the
//! pending one, so only the latest value's result is ever observed.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use super::hibp::{ExposureChecker, ExposureResult};

/// Result of the most recent completed check for one input identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckOutcome {
    /// The password value the result belongs to.
    pub password: String,
    pub result: ExposureResult,
}

struct PendingCheck {
    handle: Option<JoinHandle<()>>,
    outcome: Arc<watch::Sender<Option<CheckOutcome>>>,
}

/// Scheduler holding one cancellable delayed check per input identity.
pub struct DebouncedChecker {
    checker: ExposureChecker,
    delay: Duration,
    pending: Mutex<HashMap<String, PendingCheck>>,
}

impl DebouncedChecker {
    #[must_use]
    pub fn new(checker: ExposureChecker, delay: Duration) -> Self {
        Self {
            checker,
            delay,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Schedule a check for `password` under `key`, superseding any pending
    /// check for the same key.
    ///
    /// The returned receiver observes outcomes for this key; superseded
    /// submissions never publish, so the receiver only ever sees the latest
    /// value's result.
    pub async fn submit(&self, key: &str, password: String) -> watch::Receiver<Option<CheckOutcome>> {
        let mut pending = self.pending.lock().await;
        let entry = pending
            .entry(key.to_string())
            .or_insert_with(|| PendingCheck {
                handle: None,
                outcome: Arc::new(watch::channel(None).0),
            });

        // A newer value makes the scheduled check stale; abort before it dispatches.
        if let Some(handle) = entry.handle.take() {
            handle.abort();
        }

        let receiver = entry.outcome.subscribe();
        let publish = Arc::clone(&entry.outcome);
        let checker = self.checker.clone();
        let delay = self.delay;

        entry.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = checker.check(&password).await;
            let _ = publish.send(Some(CheckOutcome { password, result }));
        }));

        receiver
    }

    /// Drop any pending check for `key` without observing a result.
    pub async fn cancel(&self, key: &str) {
        let mut pending = self.pending.lock().await;
        if let Some(mut entry) = pending.remove(key) {
            if let Some(handle) = entry.handle.take() {
                handle.abort();
            }
        }
    }
}
