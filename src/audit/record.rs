//! Approval record structure.
//!
//! One immutable record per vote. Corrections are new records.

use crate::core::{now, Actor, ArticleId, Error, Hash256, RecordId, Result, Timestamp, UserId};
use crate::roles::Role;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

/// Longest accepted vote comment, in characters.
pub const COMMENT_MAX_CHARS: usize = 2000;

/// A reviewer's decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "APPROVED",
            Decision::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded vote.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRecord {
    /// Unique record ID
    pub id: RecordId,
    /// Article voted on
    pub article_id: ArticleId,
    /// Review cycle the vote belongs to
    pub cycle: u32,
    /// Voter
    pub approver_id: UserId,
    /// Voter display name
    pub approver_username: String,
    /// Role the vote was cast in
    pub role: Role,
    /// Approve or reject
    pub decision: Decision,
    /// Optional reviewer comment
    pub comment: Option<String>,
    /// When the vote was cast
    pub timestamp: Timestamp,
    /// SHA3-256 over the fields above
    pub digest: Hash256,
}

impl ApprovalRecord {
    /// Create a new record for a vote in `cycle`.
    pub fn new(
        article_id: ArticleId,
        cycle: u32,
        approver: &Actor,
        role: Role,
        decision: Decision,
        comment: Option<String>,
    ) -> Result<Self> {
        let comment = validate_comment(comment)?;
        let mut record = Self {
            id: RecordId::generate(),
            article_id,
            cycle,
            approver_id: approver.id.clone(),
            approver_username: approver.username.clone(),
            role,
            decision,
            comment,
            timestamp: now(),
            digest: Hash256([0u8; 32]),
        };
        record.digest = record.compute_digest();
        Ok(record)
    }

    /// Whether this record approves.
    pub fn is_approval(&self) -> bool {
        self.decision == Decision::Approved
    }

    /// Digest of the record content.
    pub fn compute_digest(&self) -> Hash256 {
        let data = format!(
            "{}:{}:{}:{}:{}:{}:{}:{}",
            self.id,
            self.article_id,
            self.cycle,
            self.approver_id,
            self.role,
            self.decision,
            self.comment.as_deref().unwrap_or(""),
            self.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true),
        );
        Hash256::digest_of(&[data.as_bytes()])
    }

    /// Check the stored digest against the content.
    pub fn verify_digest(&self) -> bool {
        self.compute_digest() == self.digest
    }
}

/// Validate an optional comment. Absent is fine, blank is not.
pub fn validate_comment(comment: Option<String>) -> Result<Option<String>> {
    match comment {
        None => Ok(None),
        Some(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(Error::Validation(
                    "comment must not be blank when provided".to_string(),
                ));
            }
            if trimmed.chars().count() > COMMENT_MAX_CHARS {
                return Err(Error::Validation(format!(
                    "comment must be at most {} characters",
                    COMMENT_MAX_CHARS
                )));
            }
            Ok(Some(trimmed.to_string()))
        }
    }
}
