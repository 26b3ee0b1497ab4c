use editorial::article::ArticleStatus;
use editorial::audit::Decision;
use editorial::core::{Actor, ArticleId, UserId};
use editorial::lifecycle::ArticleLifecycleManager;
use editorial::roles::{RegistryHandle, Role, RoleWeightRegistry};
use editorial::Error;

const CONTENT: &str = "Residents packed the hall to debate the zoning change.";

fn author() -> UserId {
    UserId::new("reporter-7")
}

fn reviewer(role: Role) -> Actor {
    Actor::new(
        &format!("{}-1", role.as_str().to_lowercase()),
        role.display_name(),
        vec![role],
    )
}

fn submitted(manager: &ArticleLifecycleManager) -> ArticleId {
    let article = manager.create(&author(), "Zoning debate", CONTENT).unwrap();
    manager.submit_for_review(article.id, &author()).unwrap();
    article.id
}

#[test]
fn weighted_approvals_publish_at_one_hundred_percent() {
    let manager = ArticleLifecycleManager::in_memory(RegistryHandle::default());
    let id = submitted(&manager);

    let steps = [
        (Role::Editor, 30, ArticleStatus::InReview),
        (Role::LegalReviewer, 60, ArticleStatus::InReview),
        (Role::ChiefEditor, 100, ArticleStatus::Published),
    ];
    for (role, percentage, status) in steps {
        let receipt = manager
            .record_vote(id, &reviewer(role), role, Decision::Approved, None)
            .unwrap();
        assert_eq!(receipt.current_approval_percentage, percentage);
        assert_eq!(receipt.article_status, status);
    }

    assert_eq!(manager.get(id).unwrap().status, ArticleStatus::Published);
    assert!(manager.list_pending().unwrap().is_empty());
}

#[test]
fn single_rejection_flags_immediately() {
    let manager = ArticleLifecycleManager::in_memory(RegistryHandle::default());
    let id = submitted(&manager);

    manager
        .record_vote(id, &reviewer(Role::Editor), Role::Editor, Decision::Approved, None)
        .unwrap();
    let receipt = manager
        .record_vote(
            id,
            &reviewer(Role::LegalReviewer),
            Role::LegalReviewer,
            Decision::Rejected,
            Some("Unverified quote in paragraph two".to_string()),
        )
        .unwrap();
    assert_eq!(receipt.article_status, ArticleStatus::Flagged);

    let err = manager
        .record_vote(
            id,
            &reviewer(Role::ChiefEditor),
            Role::ChiefEditor,
            Decision::Approved,
            None,
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
}

#[test]
fn rejection_after_majority_still_vetoes() {
    let manager = ArticleLifecycleManager::in_memory(RegistryHandle::default());
    let id = submitted(&manager);

    for role in [Role::Editor, Role::LegalReviewer] {
        manager
            .record_vote(id, &reviewer(role), role, Decision::Approved, None)
            .unwrap();
    }
    let receipt = manager
        .record_vote(
            id,
            &reviewer(Role::ChiefEditor),
            Role::ChiefEditor,
            Decision::Rejected,
            None,
        )
        .unwrap();
    assert_eq!(receipt.article_status, ArticleStatus::Flagged);
}

#[test]
fn resubmission_starts_a_fresh_cycle() {
    let manager = ArticleLifecycleManager::in_memory(RegistryHandle::default());
    let id = submitted(&manager);

    manager
        .record_vote(id, &reviewer(Role::Editor), Role::Editor, Decision::Approved, None)
        .unwrap();
    manager
        .record_vote(
            id,
            &reviewer(Role::ChiefEditor),
            Role::ChiefEditor,
            Decision::Rejected,
            None,
        )
        .unwrap();

    manager
        .update(id, &author(), "Zoning debate, revised", CONTENT)
        .unwrap();
    let article = manager.submit_for_review(id, &author()).unwrap();
    assert_eq!(article.status, ArticleStatus::InReview);
    assert_eq!(article.review_cycle, 2);

    // Previous cycle's Editor approval does not count.
    let receipt = manager
        .record_vote(
            id,
            &reviewer(Role::LegalReviewer),
            Role::LegalReviewer,
            Decision::Approved,
            None,
        )
        .unwrap();
    assert_eq!(receipt.current_approval_percentage, 30);
    assert!(!manager.has_active_vote(id, Role::Editor).unwrap());

    let history = manager.history(id).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history.iter().filter(|r| r.cycle == 1).count(), 2);
}

#[test]
fn revote_overwrites_without_double_counting() {
    let manager = ArticleLifecycleManager::in_memory(RegistryHandle::default());
    let id = submitted(&manager);
    let chief = reviewer(Role::ChiefEditor);

    let once = manager
        .record_vote(id, &chief, Role::ChiefEditor, Decision::Approved, None)
        .unwrap();
    let twice = manager
        .record_vote(id, &chief, Role::ChiefEditor, Decision::Approved, None)
        .unwrap();

    assert_eq!(once.current_approval_percentage, 40);
    assert_eq!(twice.current_approval_percentage, once.current_approval_percentage);
    assert_eq!(twice.article_status, once.article_status);
    assert_eq!(manager.history(id).unwrap().len(), 2);
}

#[test]
fn reviewer_can_change_mind_to_rejection() {
    let manager = ArticleLifecycleManager::in_memory(RegistryHandle::default());
    let id = submitted(&manager);
    let editor = reviewer(Role::Editor);

    manager
        .record_vote(id, &editor, Role::Editor, Decision::Approved, None)
        .unwrap();
    let receipt = manager
        .record_vote(
            id,
            &editor,
            Role::Editor,
            Decision::Rejected,
            Some("Found a factual error".to_string()),
        )
        .unwrap();
    assert_eq!(receipt.article_status, ArticleStatus::Flagged);
    assert_eq!(receipt.current_approval_percentage, 0);
}

#[test]
fn any_configuration_summing_to_total_publishes_when_all_approve() {
    let configs: Vec<Vec<(Role, i64)>> = vec![
        vec![(Role::ChiefEditor, 100)],
        vec![(Role::Editor, 1), (Role::ChiefEditor, 99)],
        vec![(Role::Editor, 33), (Role::LegalReviewer, 33), (Role::ChiefEditor, 34)],
        vec![
            (Role::Editor, 25),
            (Role::LegalReviewer, 25),
            (Role::ChiefEditor, 25),
            (Role::Administrator, 25),
        ],
    ];

    for weights in configs {
        let registry = RoleWeightRegistry::new(weights.clone()).unwrap();
        let manager = ArticleLifecycleManager::in_memory(RegistryHandle::new(registry));
        let id = submitted(&manager);

        let mut last = None;
        for (role, _) in &weights {
            let receipt = manager
                .record_vote(id, &reviewer(*role), *role, Decision::Approved, None)
                .unwrap();
            assert!(receipt.current_approval_percentage <= 100);
            last = Some(receipt);
        }

        let last = last.unwrap();
        assert_eq!(last.article_status, ArticleStatus::Published);
        assert_eq!(last.current_approval_percentage, 100);
    }
}

#[test]
fn zero_weight_role_must_approve_before_publication() {
    let registry = RoleWeightRegistry::new([(Role::Editor, 0), (Role::ChiefEditor, 100)]).unwrap();
    let manager = ArticleLifecycleManager::in_memory(RegistryHandle::new(registry));
    let id = submitted(&manager);

    let receipt = manager
        .record_vote(
            id,
            &reviewer(Role::ChiefEditor),
            Role::ChiefEditor,
            Decision::Approved,
            None,
        )
        .unwrap();
    assert_eq!(receipt.current_approval_percentage, 100);
    assert_eq!(receipt.article_status, ArticleStatus::InReview);

    let receipt = manager
        .record_vote(id, &reviewer(Role::Editor), Role::Editor, Decision::Approved, None)
        .unwrap();
    assert_eq!(receipt.approval_weight, 0);
    assert_eq!(receipt.article_status, ArticleStatus::Published);
}

#[test]
fn editing_and_submission_blocked_outside_editable_states() {
    let manager = ArticleLifecycleManager::in_memory(RegistryHandle::default());
    let id = submitted(&manager);

    assert!(matches!(
        manager.update(id, &author(), "New title", CONTENT),
        Err(Error::InvalidState { .. })
    ));
    assert!(matches!(
        manager.delete(id, &author()),
        Err(Error::InvalidState { .. })
    ));
    assert!(matches!(
        manager.submit_for_review(id, &author()),
        Err(Error::InvalidState { .. })
    ));
}

#[test]
fn unknown_article_is_not_found() {
    let manager = ArticleLifecycleManager::in_memory(RegistryHandle::default());
    let missing = ArticleId::generate();
    assert!(matches!(manager.get(missing), Err(Error::NotFound(_))));
    assert!(matches!(
        manager.submit_for_review(missing, &author()),
        Err(Error::NotFound(_))
    ));
    assert!(manager.history(missing).unwrap().is_empty());
}

#[test]
fn history_records_are_verifiable() {
    let manager = ArticleLifecycleManager::in_memory(RegistryHandle::default());
    let id = submitted(&manager);
    manager
        .record_vote(id, &reviewer(Role::Editor), Role::Editor, Decision::Approved, None)
        .unwrap();

    let history = manager.history(id).unwrap();
    assert!(history.iter().all(|r| r.verify_digest()));
    assert_eq!(history[0].approver_username, "Editor");
}
