//! Article records and the lifecycle state machine.

use crate::core::{now, ArticleId, Error, Result, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Minimum title length, in characters.
pub const TITLE_MIN_CHARS: usize = 5;
/// Maximum title length, in characters.
pub const TITLE_MAX_CHARS: usize = 200;
/// Minimum content length, in characters.
pub const CONTENT_MIN_CHARS: usize = 20;

/// Publication status of an article.
///
/// ```text
/// Draft ──► InReview ──► Published
///              │  ▲
///              ▼  │
///            Flagged
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArticleStatus {
    /// Being written; editable
    Draft,
    /// Awaiting reviewer votes
    InReview,
    /// Approved by every reviewer role; terminal
    Published,
    /// Rejected by a reviewer; editable and resubmittable
    Flagged,
}

impl ArticleStatus {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "DRAFT",
            ArticleStatus::InReview => "IN_REVIEW",
            ArticleStatus::Published => "PUBLISHED",
            ArticleStatus::Flagged => "FLAGGED",
        }
    }

    /// Numeric status id used by the article table.
    pub fn id(&self) -> u8 {
        match self {
            ArticleStatus::Draft => 1,
            ArticleStatus::Published => 2,
            ArticleStatus::InReview => 3,
            ArticleStatus::Flagged => 4,
        }
    }

    /// Whether the author may edit or delete the article.
    pub fn is_editable(&self) -> bool {
        matches!(self, ArticleStatus::Draft | ArticleStatus::Flagged)
    }

    /// Whether the article may be sent to review.
    pub fn can_submit(&self) -> bool {
        self.is_editable()
    }

    /// Whether the state machine allows `self -> next`.
    pub fn can_transition_to(&self, next: ArticleStatus) -> bool {
        use ArticleStatus::*;
        matches!(
            (self, next),
            (Draft, InReview) | (Flagged, InReview) | (InReview, Published) | (InReview, Flagged)
        )
    }
}

impl std::fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An editorial article.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub author_id: UserId,
    pub status: ArticleStatus,
    /// Number of times the article entered review; 0 until first submission
    pub review_cycle: u32,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl Article {
    /// Create a new draft, validating title and content.
    pub fn draft(author_id: &UserId, title: &str, content: &str) -> Result<Self> {
        let (title, content) = validate_text(title, content)?;
        Ok(Self {
            id: ArticleId::generate(),
            title,
            content,
            author_id: author_id.clone(),
            status: ArticleStatus::Draft,
            review_cycle: 0,
            created_at: now(),
            updated_at: None,
        })
    }

    /// Whether `user` wrote this article.
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        &self.author_id == user
    }
}

/// Validate and trim article text.
pub fn validate_text(title: &str, content: &str) -> Result<(String, String)> {
    let title = title.trim();
    let content = content.trim();

    let title_len = title.chars().count();
    if title_len < TITLE_MIN_CHARS || title_len > TITLE_MAX_CHARS {
        return Err(Error::Validation(format!(
            "title must be between {} and {} characters, got {}",
            TITLE_MIN_CHARS, TITLE_MAX_CHARS, title_len
        )));
    }

    let content_len = content.chars().count();
    if content_len < CONTENT_MIN_CHARS {
        return Err(Error::Validation(format!(
            "content must be at least {} characters, got {}",
            CONTENT_MIN_CHARS, content_len
        )));
    }

    Ok((title.to_string(), content.to_string()))
}
