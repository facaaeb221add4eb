use crate::error::QuotidianError;
use crate::server::router::QuotidianState;
use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use subtle::ConstantTimeEq;

fn extract_header_token(headers: &axum::http::HeaderMap) -> Option<String> {
    if let Some(k) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        return Some(k.to_string());
    }
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

/// Guard for the mutating quote routes: the `x-api-key` header (or a bearer
/// token) must match the configured admin key. Comparison is constant-time.
/// Missing and wrong keys are deliberately indistinguishable to the client.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdminKey;

impl FromRequestParts<QuotidianState> for RequireAdminKey {
    type Rejection = QuotidianError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &QuotidianState,
    ) -> Result<Self, Self::Rejection> {
        match extract_header_token(&parts.headers) {
            Some(key) => {
                let expected = state.admin_key.as_ref();
                if key.as_bytes().ct_eq(expected.as_bytes()).into() {
                    Ok(RequireAdminKey)
                } else {
                    Err(QuotidianError::Unauthorized)
                }
            }
            None => Err(QuotidianError::Unauthorized),
        }
    }
}
