//! Stronger-password suggestions derived from a seed.

use futures::{stream, StreamExt};
use rand::Rng;

use super::hibp::{ExposureChecker, ExposureResult};

/// Number of candidates produced per seed.
pub const CANDIDATE_COUNT: usize = 5;

/// Maximum number of concurrent exposure checks for one batch.
const MAX_CONCURRENT_CHECKS: usize = 5;

const WORDS: [&str; 7] = ["Nova", "Byte", "Pulse", "Flux", "Echo", "Cipher", "Blaze"];
const SPECIALS: &[u8] = b"!@#$%^&*?";

/// A candidate password together with its exposure-check outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    pub password: String,
    pub exposure: ExposureResult,
}

/// Derive [`CANDIDATE_COUNT`] candidate passwords from a seed.
///
/// Each candidate keeps the first 3 alphanumeric characters of the seed and
/// appends a vocabulary word, a 4-digit number, and one special character.
/// The appended segments are always present, so a short or fully-symbolic
/// seed still yields non-empty candidates. Randomness is not cryptographic;
/// a candidate only becomes a secret once the caller saves it.
#[must_use]
pub fn generate_candidates(seed: &str) -> Vec<String> {
    let base: String = seed
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(3)
        .collect();

    let mut rng = rand::thread_rng();
    (0..CANDIDATE_COUNT)
        .map(|_| {
            let word = WORDS[rng.gen_range(0..WORDS.len())];
            let number = rng.gen_range(1000..10_000);
            let special = SPECIALS[rng.gen_range(0..SPECIALS.len())] as char;
            format!("{base}{word}{number}{special}")
        })
        .collect()
}

/// Generate candidates and exposure-check each one before presenting it.
///
/// Checks run concurrently; per-candidate lookup failures surface as
/// [`ExposureResult::Unavailable`] on that candidate without failing the
/// batch. Order of the returned suggestions matches generation order.
pub async fn generate_checked(checker: &ExposureChecker, seed: &str) -> Vec<Suggestion> {
    let candidates = generate_candidates(seed);

    stream::iter(candidates)
        .map(|password| async move {
            let exposure = checker.check(&password).await;
            Suggestion { password, exposure }
        })
        .buffered(MAX_CONCURRENT_CHECKS)
        .collect()
        .await
}
