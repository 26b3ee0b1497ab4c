//! Approval consensus engine.
//!
//! Decides the next article status from the active votes of the current
//! review cycle plus one new vote, and writes every vote to the ledger.

use crate::article::ArticleStatus;
use crate::audit::{ApprovalRecord, AuditHistoryStore, Decision};
use crate::consensus::voting::ApprovalTally;
use crate::core::{RecordId, Result};
use crate::roles::{Role, RoleWeightRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Result of applying one vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusOutcome {
    /// Status the article should move to
    pub next_status: ArticleStatus,
    /// Tally after the vote replaced its role's previous active vote
    pub tally: ApprovalTally,
    /// Weight of the voting role
    pub vote_weight: u32,
    /// Whether the vote was a veto
    pub vetoed: bool,
}

impl ConsensusOutcome {
    /// Approved share in whole percent.
    pub fn percentage(&self) -> u32 {
        self.tally.percentage()
    }
}

/// Weighted-approval consensus engine.
pub struct ApprovalConsensusEngine {
    history: Arc<dyn AuditHistoryStore>,
}

impl ApprovalConsensusEngine {
    pub fn new(history: Arc<dyn AuditHistoryStore>) -> Self {
        Self { history }
    }

    /// Ledger the engine records into.
    pub fn history(&self) -> &Arc<dyn AuditHistoryStore> {
        &self.history
    }

    /// Decide the outcome of `vote` given the cycle's current active votes.
    ///
    /// Pure: `active` is not modified. A rejection flags the article no
    /// matter how much weight has approved; an approval publishes only when
    /// the approved weight equals the total weight.
    pub fn decide(
        &self,
        registry: &RoleWeightRegistry,
        active: &BTreeMap<Role, ApprovalRecord>,
        vote: &ApprovalRecord,
    ) -> Result<ConsensusOutcome> {
        let vote_weight = registry.weight_of(vote.role)?;

        let mut upserted = active.clone();
        upserted.insert(vote.role, vote.clone());
        let tally = ApprovalTally::compute(registry, &upserted);

        let (next_status, vetoed) = match vote.decision {
            Decision::Rejected => (ArticleStatus::Flagged, true),
            Decision::Approved if tally.is_unanimous() => (ArticleStatus::Published, false),
            Decision::Approved => (ArticleStatus::InReview, false),
        };

        tracing::debug!(
            article_id = %vote.article_id,
            role = %vote.role,
            decision = %vote.decision,
            approved_weight = tally.approved_weight,
            next_status = %next_status,
            "vote evaluated"
        );

        Ok(ConsensusOutcome {
            next_status,
            tally,
            vote_weight,
            vetoed,
        })
    }

    /// Append a vote to the ledger.
    pub fn record(&self, vote: ApprovalRecord) -> Result<RecordId> {
        self.history.append(vote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::InMemoryHistory;
    use crate::core::{Actor, ArticleId, Error};

    fn engine() -> ApprovalConsensusEngine {
        ApprovalConsensusEngine::new(Arc::new(InMemoryHistory::new()))
    }

    fn vote(article: ArticleId, role: Role, decision: Decision) -> ApprovalRecord {
        let actor = Actor::new("u", "reviewer", vec![role]);
        ApprovalRecord::new(article, 1, &actor, role, decision, None).unwrap()
    }

    #[test]
    fn test_weighted_path_to_publication() {
        let engine = engine();
        let registry = RoleWeightRegistry::default();
        let article = ArticleId::generate();
        let mut active = BTreeMap::new();

        let mut percentages = Vec::new();
        let mut statuses = Vec::new();
        for role in [Role::Editor, Role::LegalReviewer, Role::ChiefEditor] {
            let v = vote(article, role, Decision::Approved);
            let outcome = engine.decide(&registry, &active, &v).unwrap();
            percentages.push(outcome.percentage());
            statuses.push(outcome.next_status);
            active.insert(role, v);
        }

        assert_eq!(percentages, vec![30, 60, 100]);
        assert_eq!(
            statuses,
            vec![
                ArticleStatus::InReview,
                ArticleStatus::InReview,
                ArticleStatus::Published
            ]
        );
    }

    #[test]
    fn test_rejection_vetoes() {
        let engine = engine();
        let registry = RoleWeightRegistry::default();
        let article = ArticleId::generate();
        let mut active = BTreeMap::new();
        active.insert(Role::Editor, vote(article, Role::Editor, Decision::Approved));
        active.insert(Role::ChiefEditor, vote(article, Role::ChiefEditor, Decision::Approved));

        let outcome = engine
            .decide(&registry, &active, &vote(article, Role::LegalReviewer, Decision::Rejected))
            .unwrap();
        assert_eq!(outcome.next_status, ArticleStatus::Flagged);
        assert!(outcome.vetoed);
        assert_eq!(outcome.tally.approved_weight, 70);
    }

    #[test]
    fn test_revote_does_not_double_count() {
        let engine = engine();
        let registry = RoleWeightRegistry::default();
        let article = ArticleId::generate();
        let mut active = BTreeMap::new();
        active.insert(Role::ChiefEditor, vote(article, Role::ChiefEditor, Decision::Approved));

        let outcome = engine
            .decide(&registry, &active, &vote(article, Role::ChiefEditor, Decision::Approved))
            .unwrap();
        assert_eq!(outcome.tally.approved_weight, 40);
        assert!(outcome.tally.approved_weight <= registry.total_weight());
        assert_eq!(outcome.next_status, ArticleStatus::InReview);
    }

    #[test]
    fn test_decide_is_pure() {
        let engine = engine();
        let registry = RoleWeightRegistry::default();
        let article = ArticleId::generate();
        let active = BTreeMap::new();
        engine
            .decide(&registry, &active, &vote(article, Role::Editor, Decision::Approved))
            .unwrap();
        assert!(active.is_empty());
        assert_eq!(engine.history().count().unwrap(), 0);
    }

    #[test]
    fn test_non_voting_role_rejected() {
        let engine = engine();
        let registry = RoleWeightRegistry::default();
        let err = engine
            .decide(
                &registry,
                &BTreeMap::new(),
                &vote(ArticleId::generate(), Role::Reporter, Decision::Approved),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Authorization(_)));
    }

    #[test]
    fn test_single_role_registry_publishes_on_first_approval() {
        let engine = engine();
        let registry = RoleWeightRegistry::new([(Role::ChiefEditor, 100)]).unwrap();
        let outcome = engine
            .decide(
                &registry,
                &BTreeMap::new(),
                &vote(ArticleId::generate(), Role::ChiefEditor, Decision::Approved),
            )
            .unwrap();
        assert_eq!(outcome.next_status, ArticleStatus::Published);
        assert_eq!(outcome.percentage(), 100);
    }

    #[test]
    fn test_record_appends() {
        let engine = engine();
        let v = vote(ArticleId::generate(), Role::Editor, Decision::Approved);
        let id = engine.record(v.clone()).unwrap();
        assert_eq!(id, v.id);
        assert_eq!(engine.history().count().unwrap(), 1);
    }
}
