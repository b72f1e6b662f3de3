//! One-time verification codes and their stored form.

use chrono::{DateTime, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Verification codes are exactly 6 ASCII digits, leading zeros included.
pub const CODE_LEN: usize = 6;

/// Generate a code uniformly over `000000..=999999`.
pub(crate) fn generate_code() -> String {
    let value: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{value:06}")
}

/// Check the submitted code shape before touching any account state.
pub(crate) fn valid_code_format(code: &str) -> bool {
    code.len() == CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}

/// Digest a code for storage; raw codes never sit in the challenge store.
fn hash_code(code: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hasher.finalize().into()
}

/// The live challenge for one email: a code digest and its validity window.
#[derive(Clone, Debug)]
pub struct Challenge {
    code_hash: [u8; 32],
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Challenge {
    pub(crate) fn issue(code: &str, now: DateTime<Utc>, ttl_seconds: i64) -> Self {
        Self {
            code_hash: hash_code(code),
            issued_at: now,
            expires_at: now + chrono::Duration::seconds(ttl_seconds),
        }
    }

    /// Fixed-time comparison of a submitted code against the stored digest.
    ///
    /// Comparing 32-byte digests keeps the cost independent of where the
    /// guess diverges from the real code.
    pub(crate) fn matches(&self, submitted: &str) -> bool {
        bool::from(hash_code(submitted).ct_eq(&self.code_hash))
    }

    /// A challenge is dead the instant `now` reaches `expires_at`.
    pub(crate) fn expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub(crate) fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub(crate) fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}
