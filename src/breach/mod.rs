//! Breached-account lookups against a Have-I-Been-Pwned-style service.
//!
//! The upstream uses HTTP-not-found semantics for "no records": a 404 is a
//! confirmed-empty result, not a failure. Callers can always tell "zero
//! breaches" apart from "the lookup itself failed".

use chrono::NaiveDate;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use utoipa::ToSchema;

/// Default base URL for the breached-account API.
pub const DEFAULT_BREACH_BASE_URL: &str = "https://haveibeenpwned.com/api/v3";

/// Header carrying the subscription key required by the upstream service.
const API_KEY_HEADER: &str = "hibp-api-key";

/// One breach incident associated with an account.
///
/// Field names follow the upstream wire format.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct BreachRecord {
    pub name: String,
    pub title: String,
    pub domain: String,
    pub breach_date: NaiveDate,
    #[serde(default)]
    pub data_classes: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// Lookup failures, distinct from the confirmed-empty result.
#[derive(Debug, Error)]
pub enum BreachError {
    #[error("breach lookup failed: {0}")]
    Transport(String),
    #[error("breach service rejected the lookup with status {0}")]
    Status(StatusCode),
    #[error("breach service returned an unreadable response: {0}")]
    Decode(String),
}

/// Client for the breached-account endpoint.
#[derive(Clone, Debug)]
pub struct BreachClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl BreachClient {
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<SecretString>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Fetch the breach records for an email address.
    ///
    /// Returns `Ok(vec![])` when the upstream confirms zero breaches (404).
    ///
    /// # Errors
    ///
    /// Transport failures and non-404 error statuses (including an
    /// unauthorized key) are reported as [`BreachError`] so callers can
    /// retry or degrade instead of mistaking them for a clean account.
    pub async fn lookup(&self, email: &str) -> Result<Vec<BreachRecord>, BreachError> {
        let url = format!("{}/breachedaccount/{}", self.base_url, email);

        let mut request = self.http.get(&url);
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key.expose_secret());
        }

        let response = request.send().await.map_err(|err| {
            let err = err.without_url();
            warn!("breach lookup failed: {err}");
            BreachError::Transport(err.to_string())
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                // Upstream "no records": a valid empty result.
                debug!(email = %email, "no breach records");
                Ok(Vec::new())
            }
            status if status.is_success() => {
                let records: Vec<BreachRecord> = response.json().await.map_err(|err| {
                    let err = err.without_url();
                    warn!("breach response unreadable: {err}");
                    BreachError::Decode(err.to_string())
                })?;
                debug!(email = %email, count = records.len(), "breach records found");
                Ok(records)
            }
            status => {
                warn!(email = %email, %status, "breach lookup rejected");
                Err(BreachError::Status(status))
            }
        }
    }
}
