//! Challenge store abstraction.
//!
//! The manager owns all state transitions; the store is a plain keyed
//! record holder so tests and deployments can swap backends. Challenges are
//! short-lived (seconds), so the default backend is in-memory: a restart
//! merely forces a resend.

use std::collections::HashMap;
use std::sync::Mutex;

use super::challenge::Challenge;

/// Per-email account state tracked by the verification flow.
///
/// `challenge` is `None` before signup completes a store round-trip and
/// again after consumption; a consumed challenge is cleared, never kept.
#[derive(Clone, Debug, Default)]
pub struct AccountRecord {
    pub verified: bool,
    pub challenge: Option<Challenge>,
}

/// Keyed record storage for verification state.
pub trait ChallengeStore: Send + Sync {
    fn load(&self, email: &str) -> Option<AccountRecord>;
    fn save(&self, email: &str, record: AccountRecord);
}

/// Process-local store used by default and in tests.
#[derive(Debug, Default)]
pub struct MemoryChallengeStore {
    records: Mutex<HashMap<String, AccountRecord>>,
}

impl MemoryChallengeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChallengeStore for MemoryChallengeStore {
    fn load(&self, email: &str) -> Option<AccountRecord> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(email)
            .cloned()
    }

    fn save(&self, email: &str, record: AccountRecord) {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(email.to_string(), record);
    }
}
