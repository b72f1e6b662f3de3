//! One-time verification code lifecycle.
//!
//! Per email the flow is a small state machine: `NONE → ISSUED → VERIFIED`,
//! where `ISSUED` may be replaced by a fresh `ISSUED` on resend. Issuing
//! always invalidates the previous code, verification consumes a code
//! exactly once, and every state transition commits before any delivery
//! side effect runs.
//!
//! Error ordering on verify is fixed and observable: a malformed code fails
//! validation before any state is read, a mismatched code is reported before
//! expiry is considered, and a correct-but-late code reports expiry. A
//! verify that lost the race against a resend therefore fails with
//! [`CodeError::CodeMismatch`] instead of validating the superseded code.

mod challenge;
mod store;

pub use challenge::CODE_LEN;
pub use store::{AccountRecord, ChallengeStore, MemoryChallengeStore};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::api::email::{CodeMessage, CodeSender};
use challenge::{generate_code, valid_code_format, Challenge};

/// Default validity window for a verification code.
pub const DEFAULT_CODE_TTL_SECONDS: i64 = 60;

/// Verification flow errors, in the taxonomy callers map to HTTP statuses.
#[derive(Debug, Error)]
pub enum CodeError {
    /// Malformed input, reported before any state check.
    #[error("{0}")]
    Validation(String),
    /// No account (or no live challenge) for this email.
    #[error("no account found for this email")]
    NotFound,
    /// Signup for an email that already has an account.
    #[error("an account already exists for this email")]
    Conflict,
    /// The account is verified; codes can no longer be issued or consumed.
    #[error("account is already verified")]
    AlreadyVerified,
    /// The submitted code does not equal the stored one.
    #[error("verification code mismatch")]
    CodeMismatch,
    /// The code was correct but its validity window has closed.
    #[error("verification code expired")]
    Expired,
    /// The challenge was stored but the code could not be delivered.
    #[error("failed to dispatch verification code: {0}")]
    Dispatch(String),
}

/// A freshly issued code and its expiry, returned to the issuing flow.
#[derive(Clone, Debug)]
pub struct IssuedCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

/// Successful verification outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedUser {
    pub email: String,
    pub verified_at: DateTime<Utc>,
}

/// Issues, validates, and consumes one-time codes bound to an email.
pub struct CodeManager {
    store: Arc<dyn ChallengeStore>,
    sender: Arc<dyn CodeSender>,
    ttl_seconds: i64,
    // All read-modify-write windows go through this lock, so issue/resend/
    // verify for one email are serialized (last writer wins; a verify that
    // reads a superseded code mismatches). Dispatch runs outside the lock.
    transitions: Mutex<()>,
}

impl CodeManager {
    #[must_use]
    pub fn new(store: Arc<dyn ChallengeStore>, sender: Arc<dyn CodeSender>) -> Self {
        Self {
            store,
            sender,
            ttl_seconds: DEFAULT_CODE_TTL_SECONDS,
            transitions: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn with_ttl_seconds(mut self, ttl_seconds: i64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Create the account record for `email` and issue its first code.
    ///
    /// # Errors
    ///
    /// `Conflict` when an account already exists. `Dispatch` when the
    /// challenge was stored but delivery failed; the challenge stays live
    /// and a resend recovers.
    pub async fn signup(&self, email: &str) -> Result<IssuedCode, CodeError> {
        let issued = {
            let _guard = self.transitions.lock().await;

            if self.store.load(email).is_some() {
                return Err(CodeError::Conflict);
            }
            self.issue_locked(email)
        };

        info!(email = %email, "account created, verification code issued");
        self.dispatch(email, issued)
    }

    /// Replace the current challenge with a fresh code.
    ///
    /// # Errors
    ///
    /// `NotFound` without an account, `AlreadyVerified` after verification,
    /// `Dispatch` when the new challenge was stored but delivery failed.
    pub async fn resend(&self, email: &str) -> Result<IssuedCode, CodeError> {
        let issued = {
            let _guard = self.transitions.lock().await;

            let record = self.store.load(email).ok_or(CodeError::NotFound)?;
            if record.verified {
                return Err(CodeError::AlreadyVerified);
            }
            self.issue_locked(email)
        };

        info!(email = %email, "verification code reissued");
        self.dispatch(email, issued)
    }

    /// Validate a submitted code and consume it on success.
    ///
    /// Exactly-once: success clears the code and marks the account verified,
    /// so a repeat attempt fails with `AlreadyVerified`.
    ///
    /// # Errors
    ///
    /// In order: `Validation` (shape), `NotFound`, `AlreadyVerified`,
    /// `CodeMismatch`, `Expired`.
    pub async fn verify(&self, email: &str, submitted: &str) -> Result<VerifiedUser, CodeError> {
        // Shape check precedes every state check.
        if !valid_code_format(submitted) {
            return Err(CodeError::Validation(format!(
                "verification code must be {CODE_LEN} ASCII digits"
            )));
        }

        let _guard = self.transitions.lock().await;

        let record = self.store.load(email).ok_or(CodeError::NotFound)?;
        if record.verified {
            return Err(CodeError::AlreadyVerified);
        }
        let challenge = record.challenge.as_ref().ok_or(CodeError::NotFound)?;

        // Mismatch is reported before expiry: a stale guess after the window
        // closes reads as a wrong code, not as a hint that a code existed.
        if !challenge.matches(submitted) {
            return Err(CodeError::CodeMismatch);
        }
        if challenge.expired(Utc::now()) {
            warn!(
                email = %email,
                issued_at = %challenge.issued_at(),
                "correct code submitted after expiry"
            );
            return Err(CodeError::Expired);
        }

        // Consume: clear the code, flip the account to verified.
        self.store.save(
            email,
            AccountRecord {
                verified: true,
                challenge: None,
            },
        );

        info!(email = %email, "email verified");
        Ok(VerifiedUser {
            email: email.to_string(),
            verified_at: Utc::now(),
        })
    }

    /// Store a fresh, unverified challenge for `email`. Caller holds the
    /// transition lock.
    fn issue_locked(&self, email: &str) -> IssuedCode {
        let code = generate_code();
        let challenge = Challenge::issue(&code, Utc::now(), self.ttl_seconds);
        let expires_at = challenge.expires_at();

        self.store.save(
            email,
            AccountRecord {
                verified: false,
                challenge: Some(challenge),
            },
        );

        IssuedCode { code, expires_at }
    }

    /// Hand the issued code to the out-of-band sender.
    ///
    /// The challenge is already committed; a delivery failure is reported
    /// without reverting it.
    fn dispatch(&self, email: &str, issued: IssuedCode) -> Result<IssuedCode, CodeError> {
        let message = CodeMessage {
            to_email: email.to_string(),
            code: issued.code.clone(),
        };

        match self.sender.send(&message) {
            Ok(()) => Ok(issued),
            Err(err) => {
                warn!(email = %email, "code dispatch failed: {err}");
                Err(CodeError::Dispatch(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::Mutex as StdMutex;

    /// Records every message; optionally fails while still recording, the
    /// way a real sender can fail after the challenge is committed.
    struct RecordingSender {
        sent: StdMutex<Vec<CodeMessage>>,
        fail: bool,
    }

    impl RecordingSender {
        fn new() -> Self {
            Self {
                sent: StdMutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                sent: StdMutex::new(Vec::new()),
                fail: true,
            }
        }

        fn last_code(&self) -> String {
            self.sent
                .lock()
                .expect("sender lock")
                .last()
                .expect("a message was sent")
                .code
                .clone()
        }
    }

    impl CodeSender for RecordingSender {
        fn send(&self, message: &CodeMessage) -> anyhow::Result<()> {
            self.sent.lock().expect("sender lock").push(message.clone());
            if self.fail {
                return Err(anyhow!("smtp unreachable"));
            }
            Ok(())
        }
    }

    fn manager_with(sender: Arc<RecordingSender>, ttl_seconds: i64) -> CodeManager {
        CodeManager::new(Arc::new(MemoryChallengeStore::new()), sender)
            .with_ttl_seconds(ttl_seconds)
    }

    const EMAIL: &str = "alice@example.com";

    #[tokio::test]
    async fn signup_then_verify_succeeds_exactly_once() {
        let sender = Arc::new(RecordingSender::new());
        let manager = manager_with(sender.clone(), 60);

        let issued = manager.signup(EMAIL).await.expect("signup");
        assert_eq!(issued.code.len(), CODE_LEN);
        assert_eq!(sender.last_code(), issued.code);

        let verified = manager.verify(EMAIL, &issued.code).await.expect("verify");
        assert_eq!(verified.email, EMAIL);

        // The code was consumed; replaying it cannot re-validate.
        let replay = manager.verify(EMAIL, &issued.code).await;
        assert!(matches!(replay, Err(CodeError::AlreadyVerified)));
    }

    #[tokio::test]
    async fn duplicate_signup_conflicts() {
        let manager = manager_with(Arc::new(RecordingSender::new()), 60);

        manager.signup(EMAIL).await.expect("signup");
        let second = manager.signup(EMAIL).await;
        assert!(matches!(second, Err(CodeError::Conflict)));
    }

    #[tokio::test]
    async fn resend_invalidates_the_prior_code() {
        let manager = manager_with(Arc::new(RecordingSender::new()), 60);

        let first = manager.signup(EMAIL).await.expect("signup");
        let mut fresh = manager.resend(EMAIL).await.expect("resend");
        while fresh.code == first.code {
            fresh = manager.resend(EMAIL).await.expect("resend");
        }

        let stale = manager.verify(EMAIL, &first.code).await;
        assert!(matches!(stale, Err(CodeError::CodeMismatch)));

        manager
            .verify(EMAIL, &fresh.code)
            .await
            .expect("fresh code verifies");
    }

    #[tokio::test]
    async fn verify_unknown_email_is_not_found() {
        let manager = manager_with(Arc::new(RecordingSender::new()), 60);
        let result = manager.verify(EMAIL, "123456").await;
        assert!(matches!(result, Err(CodeError::NotFound)));
    }

    #[tokio::test]
    async fn resend_unknown_email_is_not_found() {
        let manager = manager_with(Arc::new(RecordingSender::new()), 60);
        let result = manager.resend(EMAIL).await;
        assert!(matches!(result, Err(CodeError::NotFound)));
    }

    #[tokio::test]
    async fn resend_after_verification_is_already_verified() {
        let manager = manager_with(Arc::new(RecordingSender::new()), 60);

        let issued = manager.signup(EMAIL).await.expect("signup");
        manager.verify(EMAIL, &issued.code).await.expect("verify");

        let result = manager.resend(EMAIL).await;
        assert!(matches!(result, Err(CodeError::AlreadyVerified)));
    }

    #[tokio::test]
    async fn malformed_codes_fail_before_any_state_check() {
        let manager = manager_with(Arc::new(RecordingSender::new()), 60);

        // No account exists, yet the shape error wins over NotFound.
        for bad in ["", "12345", "1234567", "12a456", "12 456"] {
            let result = manager.verify(EMAIL, bad).await;
            assert!(
                matches!(result, Err(CodeError::Validation(_))),
                "expected validation error for {bad:?}"
            );
        }
    }

    #[tokio::test]
    async fn correct_code_after_expiry_fails_expired() {
        let manager = manager_with(Arc::new(RecordingSender::new()), 0);

        let issued = manager.signup(EMAIL).await.expect("signup");
        let result = manager.verify(EMAIL, &issued.code).await;
        assert!(matches!(result, Err(CodeError::Expired)));
    }

    #[tokio::test]
    async fn expired_code_still_mismatches_first() {
        let manager = manager_with(Arc::new(RecordingSender::new()), 0);

        let issued = manager.signup(EMAIL).await.expect("signup");
        // Flip one digit so the guess is wrong as well as late.
        let wrong: String = issued
            .code
            .chars()
            .enumerate()
            .map(|(i, c)| if i == 0 { if c == '9' { '0' } else { '9' } } else { c })
            .collect();

        let result = manager.verify(EMAIL, &wrong).await;
        assert!(matches!(result, Err(CodeError::CodeMismatch)));
    }

    #[tokio::test]
    async fn dispatch_failure_keeps_the_stored_challenge() {
        let sender = Arc::new(RecordingSender::failing());
        let manager = manager_with(sender.clone(), 60);

        let result = manager.signup(EMAIL).await;
        assert!(matches!(result, Err(CodeError::Dispatch(_))));

        // The sender saw the code before failing; the challenge is intact
        // and the code still verifies.
        let code = sender.last_code();
        manager
            .verify(EMAIL, &code)
            .await
            .expect("challenge survived the dispatch failure");
    }

    #[tokio::test]
    async fn dispatch_failure_on_resend_reports_but_replaces() {
        let sender = Arc::new(RecordingSender::failing());
        let manager = manager_with(sender.clone(), 60);

        let _ = manager.signup(EMAIL).await;
        let first_code = sender.last_code();

        let result = manager.resend(EMAIL).await;
        assert!(matches!(result, Err(CodeError::Dispatch(_))));
        let mut fresh_code = sender.last_code();
        while fresh_code == first_code {
            let _ = manager.resend(EMAIL).await;
            fresh_code = sender.last_code();
        }

        // Last writer wins: the resent code is live, the original is stale.
        let stale = manager.verify(EMAIL, &first_code).await;
        assert!(matches!(stale, Err(CodeError::CodeMismatch)));
        manager
            .verify(EMAIL, &fresh_code)
            .await
            .expect("resent code verifies");
    }
}
