use axum::response::IntoResponse;

/// Undocumented banner route; the real surface lives under `/v1`.
pub async fn root() -> impl IntoResponse {
    concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"))
}
