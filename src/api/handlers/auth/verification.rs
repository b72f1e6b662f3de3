//! Verification-code endpoints: signup, verify, resend.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::verification::{CodeError, CodeManager};

use super::types::{AccountResponse, ResendCodeRequest, SignupRequest, VerifiedResponse, VerifyCodeRequest};
use super::utils::{normalize_email, valid_email};

/// Map a verification error to the HTTP status its caller acts on.
fn code_error_response(err: &CodeError) -> (StatusCode, String) {
    let status = match err {
        CodeError::Validation(_) | CodeError::CodeMismatch | CodeError::Expired => {
            StatusCode::BAD_REQUEST
        }
        CodeError::NotFound => StatusCode::NOT_FOUND,
        CodeError::Conflict | CodeError::AlreadyVerified => StatusCode::CONFLICT,
        CodeError::Dispatch(_) => StatusCode::BAD_GATEWAY,
    };
    (status, err.to_string())
}

/// Create an account and dispatch its first verification code.
#[utoipa::path(
    post,
    path = "/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created, code dispatched", body = AccountResponse),
        (status = 400, description = "Missing or invalid email", body = String),
        (status = 409, description = "Account already exists", body = String),
        (status = 502, description = "Code stored but dispatch failed", body = String)
    ),
    tag = "auth"
)]
pub async fn signup(
    manager: Extension<Arc<CodeManager>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    let request: SignupRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }

    match manager.signup(&email).await {
        Ok(_issued) => (
            StatusCode::CREATED,
            Json(AccountResponse {
                email,
                verified: false,
                message: "Check your email for the verification code".to_string(),
            }),
        )
            .into_response(),
        Err(err) => code_error_response(&err).into_response(),
    }
}

/// Consume a submitted code and mark the account verified.
#[utoipa::path(
    post,
    path = "/v1/auth/verify-code",
    request_body = VerifyCodeRequest,
    responses(
        (status = 200, description = "Email verified", body = VerifiedResponse),
        (status = 400, description = "Malformed, mismatched, or expired code", body = String),
        (status = 404, description = "No account for this email", body = String),
        (status = 409, description = "Account already verified", body = String)
    ),
    tag = "auth"
)]
pub async fn verify_code(
    manager: Extension<Arc<CodeManager>>,
    payload: Option<Json<VerifyCodeRequest>>,
) -> impl IntoResponse {
    let request: VerifyCodeRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }

    match manager.verify(&email, request.code.trim()).await {
        Ok(verified) => Json(VerifiedResponse {
            email: verified.email,
            verified: true,
            verified_at: verified.verified_at,
        })
        .into_response(),
        Err(err) => code_error_response(&err).into_response(),
    }
}

/// Replace the live code with a fresh one and dispatch it.
#[utoipa::path(
    post,
    path = "/v1/auth/resend-code",
    request_body = ResendCodeRequest,
    responses(
        (status = 202, description = "New code dispatched", body = AccountResponse),
        (status = 400, description = "Missing or invalid email", body = String),
        (status = 404, description = "No account for this email", body = String),
        (status = 409, description = "Account already verified", body = String),
        (status = 502, description = "Code stored but dispatch failed", body = String)
    ),
    tag = "auth"
)]
pub async fn resend_code(
    manager: Extension<Arc<CodeManager>>,
    payload: Option<Json<ResendCodeRequest>>,
) -> impl IntoResponse {
    let request: ResendCodeRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string()).into_response();
    }

    match manager.resend(&email).await {
        Ok(_issued) => (
            StatusCode::ACCEPTED,
            Json(AccountResponse {
                email,
                verified: false,
                message: "A new verification code has been sent to your email".to_string(),
            }),
        )
            .into_response(),
        Err(err) => code_error_response(&err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::email::LogCodeSender;
    use crate::verification::MemoryChallengeStore;
    use axum::response::IntoResponse;

    fn manager() -> Extension<Arc<CodeManager>> {
        Extension(Arc::new(CodeManager::new(
            Arc::new(MemoryChallengeStore::new()),
            Arc::new(LogCodeSender),
        )))
    }

    #[tokio::test]
    async fn signup_missing_payload_is_bad_request() {
        let response = signup(manager(), None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signup_invalid_email_is_bad_request() {
        let response = signup(
            manager(),
            Some(Json(SignupRequest {
                email: "not-an-email".to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signup_then_duplicate_signup_conflicts() {
        let manager = manager();
        let first = signup(
            manager.clone(),
            Some(Json(SignupRequest {
                email: "alice@example.com".to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = signup(
            manager,
            Some(Json(SignupRequest {
                email: "Alice@Example.com".to_string(),
            })),
        )
        .await
        .into_response();
        // Same account after normalization.
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn verify_unknown_email_is_not_found() {
        let response = verify_code(
            manager(),
            Some(Json(VerifyCodeRequest {
                email: "nobody@example.com".to_string(),
                code: "123456".to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn verify_malformed_code_is_bad_request() {
        let response = verify_code(
            manager(),
            Some(Json(VerifyCodeRequest {
                email: "nobody@example.com".to_string(),
                code: "12ab".to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn resend_without_account_is_not_found() {
        let response = resend_code(
            manager(),
            Some(Json(ResendCodeRequest {
                email: "nobody@example.com".to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn resend_after_signup_is_accepted() {
        let manager = manager();
        signup(
            manager.clone(),
            Some(Json(SignupRequest {
                email: "alice@example.com".to_string(),
            })),
        )
        .await
        .into_response();

        let response = resend_code(
            manager,
            Some(Json(ResendCodeRequest {
                email: "alice@example.com".to_string(),
            })),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}
