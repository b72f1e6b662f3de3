//! # Fortify (Password Safety & Account Verification)
//!
//! `fortify` authenticates claimed email addresses with time-bounded one-time
//! codes and evaluates candidate passwords against a breach corpus without
//! ever disclosing the password, or its full hash, to any external party.
//!
//! ## Verification codes
//!
//! Signup issues a 6-digit code bound to the email address and dispatches it
//! out-of-band. A code is valid for a configurable TTL (60 seconds by
//! default), is replaced atomically on resend, and is consumed exactly once.
//! Stored challenges keep only a SHA-256 digest of the code; submissions are
//! compared in fixed time.
//!
//! ## Exposure checks (k-anonymity)
//!
//! Password exposure lookups send only the first 5 hex characters of the
//! SHA-1 digest to the range endpoint and match the remaining 35 characters
//! locally. A failed lookup is reported as a sentinel, never as "zero
//! breaches".
//!
//! ## Breach lookups & credential vault
//!
//! Account breach lookups treat upstream 404 as a confirmed-empty result.
//! Saved credentials are Argon2id-hashed before they reach any store; the
//! plaintext is never persisted.

pub mod api;
pub mod breach;
pub mod cli;
pub mod risk;
pub mod vault;
pub mod verification;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
