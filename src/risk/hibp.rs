//! k-anonymity exposure checks against a Pwned-Passwords-style range API.
//!
//! The password is SHA-1 hashed locally and split into a 5-character prefix
//! and a 35-character suffix. Only the prefix is sent; the response lists
//! every known `SUFFIX:COUNT` pair sharing that prefix and the match happens
//! locally. Neither the plaintext nor hash characters 6–40 ever leave the
//! process.

use sha1::{Digest, Sha1};
use tracing::{debug, warn};

/// Default base URL for the Pwned Passwords range API.
pub const DEFAULT_RANGE_BASE_URL: &str = "https://api.pwnedpasswords.com";

/// Length of the hex prefix disclosed to the range endpoint.
const PREFIX_LEN: usize = 5;

/// Outcome of an exposure check.
///
/// `Found(0)` means the corpus confirmed the password absent; `Unavailable`
/// means the lookup itself failed and nothing can be concluded. The two must
/// never be conflated, so the wire representation of `Unavailable` is the
/// reserved sentinel count `-1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExposureResult {
    /// Number of breach corpus entries matching the password.
    Found(u32),
    /// The range lookup failed (network, status, or decoding).
    Unavailable(String),
}

impl ExposureResult {
    /// Sentinel-aware count: the real count, or `-1` when unavailable.
    #[must_use]
    pub fn sentinel_count(&self) -> i64 {
        match self {
            Self::Found(count) => i64::from(*count),
            Self::Unavailable(_) => -1,
        }
    }

    /// True when the corpus confirmed the password absent.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Found(0))
    }
}

/// Client for the range endpoint. Cheap to clone; shares the underlying
/// `reqwest` connection pool.
#[derive(Clone, Debug)]
pub struct ExposureChecker {
    http: reqwest::Client,
    base_url: String,
}

impl ExposureChecker {
    #[must_use]
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Check how many times a password appears in the breach corpus.
    ///
    /// Failures are captured per-check as [`ExposureResult::Unavailable`]
    /// rather than propagated, so batch callers keep their partial results.
    pub async fn check(&self, password: &str) -> ExposureResult {
        let (prefix, suffix) = hash_password(password);

        let url = format!("{}/range/{}", self.base_url, prefix);
        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                let err = err.without_url();
                warn!("range lookup failed: {err}");
                return ExposureResult::Unavailable(err.to_string());
            }
        };

        let body = match response.error_for_status() {
            Ok(response) => match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    let err = err.without_url();
                    warn!("range response unreadable: {err}");
                    return ExposureResult::Unavailable(err.to_string());
                }
            },
            Err(err) => {
                let err = err.without_url();
                warn!("range lookup rejected: {err}");
                return ExposureResult::Unavailable(err.to_string());
            }
        };

        let count = parse_range_response(&body, &suffix);
        debug!(prefix = %prefix, count, "range lookup complete");
        ExposureResult::Found(count)
    }
}

/// SHA-1 the password and split the uppercase hex digest into
/// `(prefix: 5 chars, suffix: 35 chars)`.
fn hash_password(password: &str) -> (String, String) {
    let digest = Sha1::digest(password.as_bytes());
    let hex = format!("{digest:X}");
    let (prefix, suffix) = hex.split_at(PREFIX_LEN);
    (prefix.to_string(), suffix.to_string())
}

/// Scan a newline-delimited `SUFFIX:COUNT` body for the local suffix.
///
/// Matching is case-insensitive. A missing suffix or an unparseable count
/// both read as 0, matching the endpoint's "absent" semantics.
fn parse_range_response(body: &str, target_suffix: &str) -> u32 {
    body.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(suffix, _)| suffix.trim().eq_ignore_ascii_case(target_suffix))
        .and_then(|(_, count)| count.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // SHA-1("password") = 5BAA61E4C9B93F3F0682250B6CF8331B7EE68FD8
    const PASSWORD_PREFIX: &str = "5BAA6";
    const PASSWORD_SUFFIX: &str = "1E4C9B93F3F0682250B6CF8331B7EE68FD8";

    #[test]
    fn hash_splits_into_prefix_and_suffix() {
        let (prefix, suffix) = hash_password("password");
        assert_eq!(prefix, PASSWORD_PREFIX);
        assert_eq!(suffix, PASSWORD_SUFFIX);
        assert_eq!(prefix.len(), 5);
        assert_eq!(suffix.len(), 35);
    }

    #[test]
    fn parse_finds_matching_suffix() {
        let body = "1E4C9B93F3F0682250B6CF8331B7EE68FD8:3730330\r\n\
                    0018A45C4D1DEF81644B54AB7F969B88D65:3\r\n";
        assert_eq!(parse_range_response(body, PASSWORD_SUFFIX), 3_730_330);
    }

    #[test]
    fn parse_missing_suffix_reads_zero() {
        let body = "0018A45C4D1DEF81644B54AB7F969B88D65:3\r\n";
        assert_eq!(parse_range_response(body, PASSWORD_SUFFIX), 0);
    }

    #[test]
    fn parse_is_case_insensitive() {
        let body = "1E4C9B93F3F0682250B6CF8331B7EE68FD8:42\r\n";
        let lower = PASSWORD_SUFFIX.to_lowercase();
        assert_eq!(parse_range_response(body, &lower), 42);
    }

    #[test]
    fn parse_malformed_count_reads_zero() {
        let body = "1E4C9B93F3F0682250B6CF8331B7EE68FD8:not-a-number\r\n";
        assert_eq!(parse_range_response(body, PASSWORD_SUFFIX), 0);
    }

    #[test]
    fn parse_empty_body_reads_zero() {
        assert_eq!(parse_range_response("", PASSWORD_SUFFIX), 0);
    }

    #[test]
    fn sentinel_count_is_distinct_from_zero() {
        assert_eq!(ExposureResult::Found(0).sentinel_count(), 0);
        assert_eq!(
            ExposureResult::Unavailable("boom".to_string()).sentinel_count(),
            -1
        );
        assert!(ExposureResult::Found(0).is_clear());
        assert!(!ExposureResult::Unavailable("boom".to_string()).is_clear());
    }

    #[tokio::test]
    async fn check_returns_corpus_count() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/range/5BAA6"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "0018A45C4D1DEF81644B54AB7F969B88D65:3\r\n\
                 1E4C9B93F3F0682250B6CF8331B7EE68FD8:3730330\r\n",
            ))
            .mount(&server)
            .await;

        let checker = ExposureChecker::new(reqwest::Client::new(), server.uri());
        assert_eq!(
            checker.check("password").await,
            ExposureResult::Found(3_730_330)
        );
    }

    #[tokio::test]
    async fn check_returns_zero_when_absent() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/range/5BAA6"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("0018A45C4D1DEF81644B54AB7F969B88D65:3\r\n"),
            )
            .mount(&server)
            .await;

        let checker = ExposureChecker::new(reqwest::Client::new(), server.uri());
        assert_eq!(checker.check("password").await, ExposureResult::Found(0));
    }

    #[tokio::test]
    async fn check_reports_unavailable_on_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/range/5BAA6"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let checker = ExposureChecker::new(reqwest::Client::new(), server.uri());
        let result = checker.check("password").await;
        assert!(matches!(result, ExposureResult::Unavailable(_)));
        assert_eq!(result.sentinel_count(), -1);
    }

    #[tokio::test]
    async fn check_discloses_only_the_prefix() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let checker = ExposureChecker::new(reqwest::Client::new(), server.uri());
        checker.check("password").await;

        let requests = server
            .received_requests()
            .await
            .expect("mock server records requests");
        assert_eq!(requests.len(), 1);

        let url = requests[0].url.as_str();
        assert!(url.ends_with("/range/5BAA6"));
        // Hash characters 6-40 and the plaintext must stay local.
        assert!(!url.contains(PASSWORD_SUFFIX));
        assert!(!url.to_uppercase().contains(PASSWORD_SUFFIX));
        assert!(!url.contains("password"));
    }
}
