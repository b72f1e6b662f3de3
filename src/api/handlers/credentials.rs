//! Credential vault endpoints: save, list, delete.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::vault::{CredentialVault, StoredCredential, VaultError};

use super::auth::{normalize_email, valid_email};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SaveCredentialRequest {
    pub email: String,
    pub password: String,
}

/// A saved credential as exposed to callers. The hash stays server-side.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct CredentialResponse {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<StoredCredential> for CredentialResponse {
    fn from(credential: StoredCredential) -> Self {
        Self {
            id: credential.id,
            email: credential.email,
            created_at: credential.created_at,
        }
    }
}

fn vault_error_response(err: &VaultError) -> (StatusCode, String) {
    match err {
        VaultError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        VaultError::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
        VaultError::Hash(_) | VaultError::Store(_) => {
            error!("credential vault failure: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Credential store failure".to_string(),
            )
        }
    }
}

/// Hash and save a generated password for an email.
#[utoipa::path(
    post,
    path = "/v1/fortify/credentials",
    request_body = SaveCredentialRequest,
    responses(
        (status = 201, description = "Credential saved", body = CredentialResponse),
        (status = 400, description = "Missing or invalid email/password", body = String),
        (status = 500, description = "Store failure", body = String)
    ),
    tag = "fortify"
)]
pub async fn save_credential(
    vault: Extension<Arc<CredentialVault>>,
    payload: Option<Json<SaveCredentialRequest>>,
) -> impl IntoResponse {
    let request: SaveCredentialRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }

    match vault.save(&email, &request.password).await {
        Ok(saved) => {
            (StatusCode::CREATED, Json(CredentialResponse::from(saved))).into_response()
        }
        Err(err) => vault_error_response(&err).into_response(),
    }
}

/// List saved credentials for an email, newest first.
#[utoipa::path(
    get,
    path = "/v1/fortify/credentials/user/{email}",
    params(("email" = String, Path, description = "Account email")),
    responses(
        (status = 200, description = "Saved credentials, newest first", body = [CredentialResponse]),
        (status = 400, description = "Invalid email", body = String),
        (status = 500, description = "Store failure", body = String)
    ),
    tag = "fortify"
)]
pub async fn list_credentials(
    vault: Extension<Arc<CredentialVault>>,
    Path(email): Path<String>,
) -> impl IntoResponse {
    let email = normalize_email(&email);
    if !valid_email(&email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }

    match vault.list(&email).await {
        Ok(credentials) => {
            let body: Vec<CredentialResponse> = credentials
                .into_iter()
                .map(CredentialResponse::from)
                .collect();
            Json(body).into_response()
        }
        Err(err) => vault_error_response(&err).into_response(),
    }
}

/// Delete one saved credential by id.
#[utoipa::path(
    delete,
    path = "/v1/fortify/credentials/{id}",
    params(("id" = Uuid, Path, description = "Credential id")),
    responses(
        (status = 204, description = "Credential deleted"),
        (status = 404, description = "No credential with this id", body = String),
        (status = 500, description = "Store failure", body = String)
    ),
    tag = "fortify"
)]
pub async fn delete_credential(
    vault: Extension<Arc<CredentialVault>>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match vault.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => vault_error_response(&err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::CredentialStore;
    use axum::body::to_bytes;

    fn vault() -> Extension<Arc<CredentialVault>> {
        Extension(Arc::new(CredentialVault::new(CredentialStore::memory())))
    }

    #[tokio::test]
    async fn save_missing_payload_is_bad_request() {
        let response = save_credential(vault(), None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn save_never_returns_the_hash_or_plaintext() {
        let response = save_credential(
            vault(),
            Some(Json(SaveCredentialRequest {
                email: "alice@example.com".to_string(),
                password: "hunNova1234!".to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let raw = String::from_utf8(bytes.to_vec()).expect("utf8");
        assert!(!raw.contains("hunNova1234!"));
        assert!(!raw.contains("argon2"));

        let decoded: CredentialResponse = serde_json::from_str(&raw).expect("json");
        assert_eq!(decoded.email, "alice@example.com");
    }

    #[tokio::test]
    async fn list_orders_newest_first() {
        let vault = vault();
        for password in ["one", "two", "three"] {
            save_credential(
                vault.clone(),
                Some(Json(SaveCredentialRequest {
                    email: "alice@example.com".to_string(),
                    password: password.to_string(),
                })),
            )
            .await
            .into_response();
        }

        let response = list_credentials(vault, Path("Alice@Example.com".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let decoded: Vec<CredentialResponse> = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(decoded.len(), 3);
        assert!(decoded.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn delete_then_repeat_delete_is_not_found() {
        let vault = vault();
        let response = save_credential(
            vault.clone(),
            Some(Json(SaveCredentialRequest {
                email: "alice@example.com".to_string(),
                password: "secret".to_string(),
            })),
        )
        .await
        .into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let saved: CredentialResponse = serde_json::from_slice(&bytes).expect("json");

        let first = delete_credential(vault.clone(), Path(saved.id))
            .await
            .into_response();
        assert_eq!(first.status(), StatusCode::NO_CONTENT);

        let repeat = delete_credential(vault, Path(saved.id)).await.into_response();
        assert_eq!(repeat.status(), StatusCode::NOT_FOUND);
    }
}
