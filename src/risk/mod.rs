//! Password risk evaluation.
//!
//! Three cooperating pieces:
//!
//! - [`strength`] scores a password 0–100 from four independent criteria.
//! - [`hibp`] checks exposure against a breach corpus using the k-anonymity
//!   range protocol: only the first 5 hex characters of the SHA-1 digest are
//!   sent over the wire, the remaining 35 are matched locally.
//! - [`suggest`] derives stronger candidates from a seed password and
//!   exposure-checks each one before it is presented.
//!
//! Interactive callers type while checks are in flight; [`debounce`] keeps a
//! cancellable pending check per input so only the latest value is observed.

pub mod debounce;
pub mod hibp;
pub mod strength;
pub mod suggest;

pub use debounce::DebouncedChecker;
pub use hibp::{ExposureChecker, ExposureResult};
pub use suggest::{generate_candidates, Suggestion};
