use crate::server::envelope::Envelope;
use crate::server::router::QuotidianState;
use axum::{Router, response::IntoResponse, routing::get};
use serde_json::json;

pub fn router() -> Router<QuotidianState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
}

/// Root endpoint: a small map of the API surface.
async fn index_handler() -> impl IntoResponse {
    Envelope::ok(json!({
        "message": "Welcome to the Daily Quotes API",
        "endpoints": {
            "health": "/health",
            "random_quote": "/api/v1/quote",
            "quote_of_the_day": "/api/v1/qotd",
            "list_quotes": "/api/v1/quotes"
        }
    }))
}

/// Liveness check.
async fn health_handler() -> impl IntoResponse {
    Envelope::ok(json!({ "status": "ok" }))
}
