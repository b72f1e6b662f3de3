//! Breached-account lookup endpoint.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::error;

use crate::breach::{BreachClient, BreachRecord};

use super::auth::{normalize_email, valid_email};

/// Look up breach records for an email address.
///
/// An empty list is a confirmed-clean result; an upstream failure is `502`,
/// never an empty list.
#[utoipa::path(
    get,
    path = "/v1/breaches/{email}",
    params(("email" = String, Path, description = "Account email")),
    responses(
        (status = 200, description = "Breach records, empty when confirmed clean", body = [BreachRecord]),
        (status = 400, description = "Invalid email", body = String),
        (status = 502, description = "Upstream lookup failed", body = String)
    ),
    tag = "breaches"
)]
pub async fn lookup_breaches(
    client: Extension<Arc<BreachClient>>,
    Path(email): Path<String>,
) -> impl IntoResponse {
    let email = normalize_email(&email);
    if !valid_email(&email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }

    match client.lookup(&email).await {
        Ok(records) => Json(records).into_response(),
        Err(err) => {
            error!("breach lookup failed: {err}");
            (
                StatusCode::BAD_GATEWAY,
                "Failed to check breaches".to_string(),
            )
                .into_response()
        }
    }
}
