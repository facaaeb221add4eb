use axum::{
    Json,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Fixed API version reported in every response's `meta`.
pub const API_VERSION: &str = "v1";

/// The uniform wrapper every endpoint responds with, error paths included.
/// `data` and `message` serialize as JSON `null` when absent.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Meta,
}

#[derive(Debug, Serialize)]
pub struct Meta {
    /// Response generation time, RFC 3339 UTC.
    pub generated_at: DateTime<Utc>,
    pub version: &'static str,
}

impl Meta {
    fn now() -> Self {
        Self {
            generated_at: Utc::now(),
            version: API_VERSION,
        }
    }
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: Meta::now(),
        }
    }
}

impl Envelope<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            meta: Meta::now(),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
