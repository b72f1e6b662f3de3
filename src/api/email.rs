//! Out-of-band delivery of verification codes.
//!
//! The verification flow stores a challenge first and dispatches the code
//! second; delivery is fire-and-forget with error reporting. A failed
//! dispatch surfaces to the caller but never rolls the stored challenge
//! back — the user resends instead. Senders own their transport and its
//! timeout (SMTP, delivery API, ...); the default sender logs for local dev.

use anyhow::Result;
use tracing::info;

/// A verification code addressed to one recipient.
#[derive(Clone, Debug)]
pub struct CodeMessage {
    pub to_email: String,
    pub code: String,
}

/// Delivery abstraction for verification codes.
pub trait CodeSender: Send + Sync {
    /// Deliver a message or return an error to report the dispatch failure.
    fn send(&self, message: &CodeMessage) -> Result<()>;
}

/// Local dev sender that logs the code instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogCodeSender;

impl CodeSender for LogCodeSender {
    fn send(&self, message: &CodeMessage) -> Result<()> {
        info!(
            to_email = %message.to_email,
            code = %message.code,
            "verification code send stub"
        );
        Ok(())
    }
}
