//! Password strengthening endpoints: strength score, exposure check,
//! suggestions.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::risk::{self, ExposureChecker};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct PasswordRequest {
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct StrengthResponse {
    /// 0–100 in steps of 25.
    pub score: u8,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ExposureResponse {
    /// Breach corpus occurrences; `-1` is the reserved sentinel for "the
    /// lookup failed", distinct from the confirmed-absent `0`.
    pub count: i64,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SuggestionResponse {
    pub password: String,
    pub count: i64,
}

/// Score a password against the four strength criteria.
#[utoipa::path(
    post,
    path = "/v1/fortify/strength",
    request_body = PasswordRequest,
    responses(
        (status = 200, description = "Strength score", body = StrengthResponse),
        (status = 400, description = "Missing payload", body = String)
    ),
    tag = "fortify"
)]
pub async fn strength(payload: Option<Json<PasswordRequest>>) -> impl IntoResponse {
    let request: PasswordRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    Json(StrengthResponse {
        score: risk::strength::score(&request.password),
    })
    .into_response()
}

/// Check password exposure via the k-anonymity range protocol.
#[utoipa::path(
    post,
    path = "/v1/fortify/exposure",
    request_body = PasswordRequest,
    responses(
        (status = 200, description = "Exposure count, -1 when the lookup failed", body = ExposureResponse),
        (status = 400, description = "Missing or empty password", body = String)
    ),
    tag = "fortify"
)]
pub async fn exposure(
    checker: Extension<Arc<ExposureChecker>>,
    payload: Option<Json<PasswordRequest>>,
) -> impl IntoResponse {
    let request: PasswordRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    if request.password.is_empty() {
        return (StatusCode::BAD_REQUEST, "Password is required".to_string()).into_response();
    }

    let result = checker.check(&request.password).await;
    Json(ExposureResponse {
        count: result.sentinel_count(),
    })
    .into_response()
}

/// Derive five stronger candidates from a seed, each exposure-checked.
#[utoipa::path(
    post,
    path = "/v1/fortify/suggestions",
    request_body = PasswordRequest,
    responses(
        (status = 200, description = "Checked candidates", body = [SuggestionResponse]),
        (status = 400, description = "Missing or empty seed password", body = String)
    ),
    tag = "fortify"
)]
pub async fn suggestions(
    checker: Extension<Arc<ExposureChecker>>,
    payload: Option<Json<PasswordRequest>>,
) -> impl IntoResponse {
    let request: PasswordRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    if request.password.is_empty() {
        return (StatusCode::BAD_REQUEST, "Password is required".to_string()).into_response();
    }

    let suggestions = risk::suggest::generate_checked(&checker, &request.password).await;
    let body: Vec<SuggestionResponse> = suggestions
        .into_iter()
        .map(|suggestion| SuggestionResponse {
            count: suggestion.exposure.sentinel_count(),
            password: suggestion.password,
        })
        .collect();

    Json(body).into_response()
}
