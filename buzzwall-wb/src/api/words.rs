//! Word submission, listing, and session reset API
//!
//! The boundary owns input validation and rate limiting; the store trusts
//! length-validated input and only re-applies normalization. Duplicate
//! submissions and rate-limit refusals are ordinary response values here,
//! never store errors.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::info;

use buzzwall_common::api::types::{ClearResponse, SubmitRequest, SubmitResponse, WordListResponse};

use crate::AppState;

/// Response header carrying the client's remaining request budget
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// GET /api/words
///
/// Live words in insertion order, for the polling display.
pub async fn list_words(State(state): State<AppState>) -> Json<WordListResponse> {
    Json(WordListResponse {
        words: state.words.list().await,
    })
}

/// POST /api/words
///
/// Accepts `{ "word": "..." }` for a single submission or
/// `{ "words": ["...", ...] }` for a batch. Rate limited per client
/// before the store is consulted.
pub async fn submit_words(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SubmitRequest>,
) -> Result<Response, WordsError> {
    let client = client_ip(&headers);
    let decision = state.rate_limiter.check(&client).await;
    if !decision.allowed {
        return Err(WordsError::RateLimited);
    }

    // Stale window entries self-correct on the next check; sweep on a
    // fraction of requests to bound memory between busy periods
    if rand::random::<f64>() < 0.1 {
        state.rate_limiter.sweep().await;
    }

    // Batch submission
    if let Some(texts) = request.words {
        let mut valid: Vec<String> = texts
            .iter()
            .map(|text| text.trim())
            .filter(|text| !text.is_empty() && text.chars().count() <= state.config.max_word_len)
            .map(str::to_string)
            .collect();

        if valid.is_empty() {
            return Err(WordsError::NoValidWords);
        }

        valid.truncate(state.config.max_batch_size);
        let added = state.words.add_batch(&valid).await;

        let response = SubmitResponse::batch(added);
        return Ok((
            [(RATE_LIMIT_REMAINING, decision.remaining.to_string())],
            Json(response),
        )
            .into_response());
    }

    // Single word submission
    let Some(word) = request.word else {
        return Err(WordsError::MissingWord);
    };

    let trimmed = word.trim();
    if trimmed.is_empty() || trimmed.chars().count() > state.config.max_word_len {
        return Err(WordsError::InvalidLength(state.config.max_word_len));
    }

    let response = match state.words.add(trimmed).await {
        Some(created) => SubmitResponse::created(created),
        None => SubmitResponse::duplicate(),
    };

    Ok((
        [(RATE_LIMIT_REMAINING, decision.remaining.to_string())],
        Json(response),
    )
        .into_response())
}

/// DELETE /api/words
///
/// Session reset between performances. Requires the configured admin
/// bearer token; with no token configured the route is open (demo mode).
pub async fn clear_words(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ClearResponse>, WordsError> {
    if let Some(expected) = &state.config.admin_token {
        let authorized = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value == format!("Bearer {}", expected))
            .unwrap_or(false);

        if !authorized {
            return Err(WordsError::Unauthorized);
        }
    }

    state.words.clear().await;
    info!("Word store cleared (session reset)");
    Ok(Json(ClearResponse { success: true }))
}

/// Best-effort client identifier for rate limiting
///
/// Proxy headers first; behind no proxy all clients collapse to
/// "unknown", which only tightens the limit.
fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|value| value.to_str().ok()) {
        return real_ip.to_string();
    }

    "unknown".to_string()
}

/// Handler-level errors for the words routes
#[derive(Debug)]
pub enum WordsError {
    /// Neither `word` nor `words` present in the request body
    MissingWord,
    /// Single word empty or over the length limit after trimming
    InvalidLength(usize),
    /// Batch contained no valid entries after filtering
    NoValidWords,
    /// Client exhausted its window budget
    RateLimited,
    /// Session reset without a valid admin token
    Unauthorized,
}

impl IntoResponse for WordsError {
    fn into_response(self) -> Response {
        if let WordsError::RateLimited = self {
            return (
                StatusCode::TOO_MANY_REQUESTS,
                [
                    (RATE_LIMIT_REMAINING, "0"),
                    (header::RETRY_AFTER.as_str(), "60"),
                ],
                Json(json!({
                    "error": "Rate limit exceeded. Try again in a minute.",
                })),
            )
                .into_response();
        }

        let (status, message) = match self {
            WordsError::MissingWord => (StatusCode::BAD_REQUEST, "Word is required".to_string()),
            WordsError::InvalidLength(max) => (
                StatusCode::BAD_REQUEST,
                format!("Word must be 1-{} characters", max),
            ),
            WordsError::NoValidWords => {
                (StatusCode::BAD_REQUEST, "No valid words provided".to_string())
            }
            WordsError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            WordsError::RateLimited => unreachable!("handled above"),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
