//! Account verification handlers.
//!
//! Signup creates the account record and issues its first code; verify
//! consumes a code exactly once; resend replaces the live code. The
//! endpoints normalize and validate the email before touching any state,
//! and a dispatch failure reports `502` while leaving the stored challenge
//! usable for a resend.

pub(crate) mod types;
mod utils;
pub(crate) mod verification;

pub(crate) use utils::{normalize_email, valid_email};
