//! Shared API request/response types
//!
//! Wire types exchanged between attendee phones, the shared display, and
//! the Word Board service. The display polls `GET /api/words` on an
//! interval; phones submit through `POST /api/words`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A live buzzword on the board.
///
/// Words are immutable once created; the store replaces them wholesale on
/// eviction or expiry rather than updating them in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// Unique identifier, generated at insertion, never reused
    pub id: Uuid,

    /// Normalized display text (trimmed, upper-cased)
    pub text: String,

    /// Creation time; governs both insertion order and TTL expiry
    pub timestamp: DateTime<Utc>,
}

/// Response body for `GET /api/words`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordListResponse {
    /// Live words in insertion order
    pub words: Vec<Word>,
}

/// Request body for `POST /api/words`
///
/// Exactly one of the two fields is expected: `word` for a single
/// submission, `words` for a batch (bulk/demo paths).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmitRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<String>>,
}

/// Response body for `POST /api/words`
///
/// A duplicate submission is a normal outcome, not an error: `success` is
/// still true and `duplicate` is set so the phone can show "already exists"
/// instead of "added".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,

    /// Created word (single submission)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<Word>,

    /// Set when a single submission matched an existing word
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Number of words created (batch submission)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added: Option<usize>,

    /// Created words (batch submission)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<Word>>,
}

impl SubmitResponse {
    /// Single submission accepted
    pub fn created(word: Word) -> Self {
        Self {
            success: true,
            word: Some(word),
            duplicate: None,
            message: None,
            added: None,
            words: None,
        }
    }

    /// Single submission matched an existing word
    pub fn duplicate() -> Self {
        Self {
            success: true,
            word: None,
            duplicate: Some(true),
            message: Some("Word already exists".to_string()),
            added: None,
            words: None,
        }
    }

    /// Batch submission result (duplicates silently filtered)
    pub fn batch(words: Vec<Word>) -> Self {
        Self {
            success: true,
            word: None,
            duplicate: None,
            message: None,
            added: Some(words.len()),
            words: Some(words),
        }
    }
}

/// Response body for `DELETE /api/words`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    pub success: bool,
}
