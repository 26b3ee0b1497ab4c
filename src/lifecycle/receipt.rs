//! Vote receipts returned to the voting caller.

use crate::article::{Article, ArticleStatus};
use crate::audit::{ApprovalRecord, Decision};
use crate::consensus::ConsensusOutcome;
use crate::core::ArticleId;
use crate::roles::Role;
use serde::{Deserialize, Serialize};

/// Summary of a committed vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub article_id: ArticleId,
    pub article_title: String,
    pub approver_username: String,
    pub role_name: Role,
    pub approval_weight: u32,
    /// The vote's decision
    pub status: Decision,
    pub current_approval_percentage: u32,
    pub article_status: ArticleStatus,
    pub message: String,
}

impl VoteReceipt {
    pub(crate) fn new(article: &Article, vote: &ApprovalRecord, outcome: &ConsensusOutcome) -> Self {
        let message = match article.status {
            ArticleStatus::Published => {
                "All reviewer roles approved; article published".to_string()
            }
            ArticleStatus::Flagged => format!(
                "Article rejected by {}; returned to the author",
                vote.role.display_name()
            ),
            _ => format!(
                "Approval recorded; {}% of the required weight reached",
                outcome.percentage()
            ),
        };

        Self {
            article_id: article.id,
            article_title: article.title.clone(),
            approver_username: vote.approver_username.clone(),
            role_name: vote.role,
            approval_weight: outcome.vote_weight,
            status: vote.decision,
            current_approval_percentage: outcome.percentage(),
            article_status: article.status,
            message,
        }
    }
}
