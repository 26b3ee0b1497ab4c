//! Weighted approval tally.
//!
//! Integer arithmetic only: publication requires the approved weight to
//! equal the total weight exactly.

use crate::audit::{ApprovalRecord, Decision};
use crate::roles::{Role, RoleWeightRegistry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tally of the active votes of one review cycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalTally {
    /// Weight of roles whose active vote approves
    pub approved_weight: u32,
    /// Weight of all configured voting roles
    pub total_weight: u32,
    /// Roles with an active approval
    pub approving_roles: Vec<Role>,
    /// Roles with an active rejection
    pub rejecting_roles: Vec<Role>,
    /// Configured roles that have not voted
    pub missing_roles: Vec<Role>,
}

impl ApprovalTally {
    /// Tally `active` votes against the registry.
    ///
    /// Votes by roles that are no longer configured carry no weight.
    pub fn compute(registry: &RoleWeightRegistry, active: &BTreeMap<Role, ApprovalRecord>) -> Self {
        let mut approved_weight = 0u32;
        let mut approving_roles = Vec::new();
        let mut rejecting_roles = Vec::new();
        let mut missing_roles = Vec::new();

        for (role, weight) in registry.iter() {
            match active.get(&role).map(|r| r.decision) {
                Some(Decision::Approved) => {
                    approved_weight += weight;
                    approving_roles.push(role);
                }
                Some(Decision::Rejected) => rejecting_roles.push(role),
                None => missing_roles.push(role),
            }
        }

        Self {
            approved_weight,
            total_weight: registry.total_weight(),
            approving_roles,
            rejecting_roles,
            missing_roles,
        }
    }

    /// Approved share of the total weight, in whole percent (rounded down).
    pub fn percentage(&self) -> u32 {
        if self.total_weight == 0 {
            return 0;
        }
        let pct = u64::from(self.approved_weight) * 100 / u64::from(self.total_weight);
        pct as u32
    }

    /// Whether every configured role, zero-weight ones included, has an
    /// active approval.
    pub fn is_unanimous(&self) -> bool {
        self.approved_weight == self.total_weight
            && self.missing_roles.is_empty()
            && self.rejecting_roles.is_empty()
    }

    /// Whether any active vote rejects.
    pub fn has_veto(&self) -> bool {
        !self.rejecting_roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Actor, ArticleId};

    fn active(votes: &[(Role, Decision)]) -> BTreeMap<Role, ApprovalRecord> {
        let article = ArticleId::generate();
        votes
            .iter()
            .map(|(role, decision)| {
                let actor = Actor::new("u", "u", vec![*role]);
                let record =
                    ApprovalRecord::new(article, 1, &actor, *role, *decision, None).unwrap();
                (*role, record)
            })
            .collect()
    }

    #[test]
    fn test_empty_tally() {
        let tally = ApprovalTally::compute(&RoleWeightRegistry::default(), &BTreeMap::new());
        assert_eq!(tally.approved_weight, 0);
        assert_eq!(tally.percentage(), 0);
        assert_eq!(tally.missing_roles.len(), 3);
        assert!(!tally.is_unanimous());
    }

    #[test]
    fn test_partial_approval() {
        let tally = ApprovalTally::compute(
            &RoleWeightRegistry::default(),
            &active(&[(Role::Editor, Decision::Approved), (Role::LegalReviewer, Decision::Approved)]),
        );
        assert_eq!(tally.approved_weight, 60);
        assert_eq!(tally.percentage(), 60);
        assert_eq!(tally.missing_roles, vec![Role::ChiefEditor]);
    }

    #[test]
    fn test_unanimous() {
        let tally = ApprovalTally::compute(
            &RoleWeightRegistry::default(),
            &active(&[
                (Role::Editor, Decision::Approved),
                (Role::LegalReviewer, Decision::Approved),
                (Role::ChiefEditor, Decision::Approved),
            ]),
        );
        assert!(tally.is_unanimous());
        assert_eq!(tally.percentage(), 100);
    }

    #[test]
    fn test_rejection_counts_no_weight() {
        let tally = ApprovalTally::compute(
            &RoleWeightRegistry::default(),
            &active(&[(Role::Editor, Decision::Approved), (Role::ChiefEditor, Decision::Rejected)]),
        );
        assert_eq!(tally.approved_weight, 30);
        assert!(tally.has_veto());
    }

    #[test]
    fn test_zero_weight_role_must_still_approve() {
        let registry =
            RoleWeightRegistry::new([(Role::Editor, 0), (Role::ChiefEditor, 100)]).unwrap();

        let tally = ApprovalTally::compute(
            &registry,
            &active(&[(Role::ChiefEditor, Decision::Approved)]),
        );
        assert_eq!(tally.approved_weight, 100);
        assert_eq!(tally.missing_roles, vec![Role::Editor]);
        assert!(!tally.is_unanimous());

        let tally = ApprovalTally::compute(
            &registry,
            &active(&[
                (Role::ChiefEditor, Decision::Approved),
                (Role::Editor, Decision::Approved),
            ]),
        );
        assert!(tally.is_unanimous());
    }

    #[test]
    fn test_unconfigured_role_ignored() {
        let registry = RoleWeightRegistry::new([(Role::ChiefEditor, 100)]).unwrap();
        let tally = ApprovalTally::compute(&registry, &active(&[(Role::Editor, Decision::Approved)]));
        assert_eq!(tally.approved_weight, 0);
        assert_eq!(tally.missing_roles, vec![Role::ChiefEditor]);
    }
}
