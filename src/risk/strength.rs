//! Criteria-based password strength scoring.

const CRITERION_POINTS: u8 = 25;
const MIN_LENGTH: usize = 8;

/// Score a password from 0 to 100, 25 points per satisfied criterion:
/// length of at least 8, an ASCII uppercase letter, an ASCII digit, and a
/// non-alphanumeric character.
///
/// Pure and deterministic; criteria are independent and order-irrelevant.
#[must_use]
pub fn score(password: &str) -> u8 {
    if password.is_empty() {
        return 0;
    }

    let mut total = 0;
    if password.chars().count() >= MIN_LENGTH {
        total += CRITERION_POINTS;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        total += CRITERION_POINTS;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        total += CRITERION_POINTS;
    }
    if password.chars().any(|c| !c.is_alphanumeric()) {
        total += CRITERION_POINTS;
    }
    total
}
