use crate::db::{QuoteCreate, QuotePatch};
use crate::error::QuotidianError;
use crate::selector;
use crate::server::envelope::Envelope;
use crate::server::guards::auth::RequireAdminKey;
use crate::server::router::QuotidianState;
use axum::{
    Json, Router,
    extract::{FromRequest, FromRequestParts, Path, Request, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const DEFAULT_LIMIT: i64 = 10;
const MAX_AUTHOR_LEN: usize = 255;

pub fn router() -> Router<QuotidianState> {
    Router::new()
        .route("/quote", get(random_quote_handler))
        .route("/qotd", get(qotd_handler))
        .route("/quotes", get(list_quotes_handler).post(create_quote_handler))
        .route(
            "/quotes/{id}",
            put(update_quote_handler).delete(delete_quote_handler),
        )
}

fn no_quotes() -> QuotidianError {
    QuotidianError::NotFound("No quotes found".to_string())
}

fn quote_not_found() -> QuotidianError {
    QuotidianError::NotFound("Quote not found".to_string())
}

/// Pagination query parameters. Both must parse as integers; anything else is
/// a 400 in the standard envelope.
pub(super) struct Pagination {
    limit: i64,
    offset: i64,
}

impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = QuotidianError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut limit = DEFAULT_LIMIT;
        let mut offset = 0i64;

        if let Some(query) = parts.uri.query() {
            for (k, v) in url::form_urlencoded::parse(query.as_bytes()) {
                let slot = match k.as_ref() {
                    "limit" => &mut limit,
                    "offset" => &mut offset,
                    _ => continue,
                };
                *slot = v.parse().map_err(|_| {
                    QuotidianError::Validation("limit and offset must be integers".to_string())
                })?;
            }
        }

        Ok(Self { limit, offset })
    }
}

/// Optional `text`/`author` fields shared by create and update payloads.
/// Create validates presence; update treats absent fields as "leave alone".
#[derive(Debug, Deserialize)]
pub(super) struct QuoteFields {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    author: Option<String>,
}

pub(super) struct QuoteBody(pub(super) QuoteFields);

impl<S> FromRequest<S> for QuoteBody
where
    S: Send + Sync,
{
    type Rejection = QuotidianError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let Json(fields) = Json::<QuoteFields>::from_request(req, &())
            .await
            .map_err(|rejection| {
                debug!(error = %rejection, "rejected quote payload");
                QuotidianError::Validation("request body must be a JSON object".to_string())
            })?;
        Ok(Self(fields))
    }
}

fn validate_author_len(author: &str) -> Result<(), QuotidianError> {
    if author.chars().count() > MAX_AUTHOR_LEN {
        return Err(QuotidianError::Validation(format!(
            "author must be at most {MAX_AUTHOR_LEN} characters"
        )));
    }
    Ok(())
}

/// GET /api/v1/quote — one quote chosen uniformly at random from the full
/// store snapshot.
async fn random_quote_handler(
    State(state): State<QuotidianState>,
) -> Result<Response, QuotidianError> {
    let quotes = state.repo.list_all().await?;
    let quote = selector::random_quote(&quotes).ok_or_else(no_quotes)?;
    Ok(Envelope::ok(quote).into_response())
}

/// GET /api/v1/qotd — the deterministic quote of the day for the current UTC
/// date.
async fn qotd_handler(State(state): State<QuotidianState>) -> Result<Response, QuotidianError> {
    let quotes = state.repo.list_all().await?;
    let today = Utc::now().date_naive();
    let quote = selector::quote_of_the_day(&quotes, today).ok_or_else(no_quotes)?;
    Ok(Envelope::ok(quote).into_response())
}

/// GET /api/v1/quotes — paginated list in stable id order.
async fn list_quotes_handler(
    State(state): State<QuotidianState>,
    page: Pagination,
) -> Result<Response, QuotidianError> {
    let quotes = state.repo.list(page.offset, page.limit).await?;
    Ok(Envelope::ok(quotes).into_response())
}

/// POST /api/v1/quotes — admin create. Requires non-empty `text` and
/// `author`.
async fn create_quote_handler(
    _auth: RequireAdminKey,
    State(state): State<QuotidianState>,
    QuoteBody(fields): QuoteBody,
) -> Result<Response, QuotidianError> {
    let required = || QuotidianError::Validation("text and author are required".to_string());
    let text = fields.text.filter(|t| !t.is_empty()).ok_or_else(required)?;
    let author = fields
        .author
        .filter(|a| !a.is_empty())
        .ok_or_else(required)?;
    validate_author_len(&author)?;

    let quote = state.repo.insert(QuoteCreate { text, author }).await?;
    Ok((StatusCode::CREATED, Envelope::ok(quote)).into_response())
}

/// PUT /api/v1/quotes/{id} — admin partial update; only supplied non-empty
/// fields overwrite existing ones.
async fn update_quote_handler(
    _auth: RequireAdminKey,
    State(state): State<QuotidianState>,
    Path(id): Path<String>,
    QuoteBody(fields): QuoteBody,
) -> Result<Response, QuotidianError> {
    let id = parse_quote_id(&id)?;
    let patch = QuotePatch::new(fields.text, fields.author);
    if let Some(author) = patch.author.as_deref() {
        validate_author_len(author)?;
    }

    let quote = state
        .repo
        .update(id, patch)
        .await?
        .ok_or_else(quote_not_found)?;
    Ok(Envelope::ok(quote).into_response())
}

/// DELETE /api/v1/quotes/{id} — admin delete.
async fn delete_quote_handler(
    _auth: RequireAdminKey,
    State(state): State<QuotidianState>,
    Path(id): Path<String>,
) -> Result<Response, QuotidianError> {
    let id = parse_quote_id(&id)?;
    let quote = state.repo.delete(id).await?.ok_or_else(quote_not_found)?;
    Ok(Envelope::ok(json!({ "id": quote.id, "message": "Quote deleted" })).into_response())
}

/// A non-integer id segment means the resource path cannot exist.
fn parse_quote_id(raw: &str) -> Result<i64, QuotidianError> {
    raw.parse()
        .map_err(|_| QuotidianError::NotFound("Resource not found".to_string()))
}
