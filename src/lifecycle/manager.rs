//! Article lifecycle manager.
//!
//! Enforces ownership and the status state machine, and runs each vote as
//! one read-decide-commit unit against the article store.

use crate::article::{
    Article, ArticleFilter, ArticleStateStore, ArticleStatus, InMemoryArticleStore,
    TransitionOutcome,
};
use crate::article::model::validate_text;
use crate::audit::{ApprovalRecord, AuditHistoryStore, Decision, InMemoryHistory};
use crate::consensus::ApprovalConsensusEngine;
use crate::core::{Actor, ArticleId, Error, Result, UserId};
use crate::lifecycle::receipt::VoteReceipt;
use crate::roles::{RegistryHandle, Role};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrates article transitions and voting.
pub struct ArticleLifecycleManager {
    articles: Arc<dyn ArticleStateStore>,
    engine: ApprovalConsensusEngine,
    registry: RegistryHandle,
}

impl ArticleLifecycleManager {
    /// Create a manager over the given stores.
    pub fn new(
        articles: Arc<dyn ArticleStateStore>,
        history: Arc<dyn AuditHistoryStore>,
        registry: RegistryHandle,
    ) -> Self {
        Self {
            articles,
            engine: ApprovalConsensusEngine::new(history),
            registry,
        }
    }

    /// Create a manager backed by in-memory stores.
    pub fn in_memory(registry: RegistryHandle) -> Self {
        Self::new(
            Arc::new(InMemoryArticleStore::new()),
            Arc::new(InMemoryHistory::new()),
            registry,
        )
    }

    /// Registry used for voting weights.
    pub fn registry(&self) -> &RegistryHandle {
        &self.registry
    }

    /// Create a draft.
    pub fn create(&self, author_id: &UserId, title: &str, content: &str) -> Result<Article> {
        let article = self.articles.insert(Article::draft(author_id, title, content)?)?;
        info!(article_id = %article.id, author = %author_id, "article created");
        Ok(article)
    }

    /// Edit a draft or flagged article.
    pub fn update(
        &self,
        article_id: ArticleId,
        actor_id: &UserId,
        title: &str,
        content: &str,
    ) -> Result<Article> {
        let current = self.articles.get(article_id)?;
        Self::require_author(&current, actor_id, "edit")?;
        if !current.status.is_editable() {
            return Err(Error::invalid_state("edit", current.status));
        }
        let (title, content) = validate_text(title, content)?;

        let article = self
            .articles
            .edit(article_id, current.status, title, content)?;
        info!(article_id = %article_id, "article updated");
        Ok(article)
    }

    /// Permanently delete a draft or flagged article.
    ///
    /// Its approval history stays retrievable.
    pub fn delete(&self, article_id: ArticleId, actor_id: &UserId) -> Result<Article> {
        let current = self.articles.get(article_id)?;
        Self::require_author(&current, actor_id, "delete")?;
        if !current.status.is_editable() {
            return Err(Error::invalid_state("delete", current.status));
        }

        let removed = self.articles.remove(article_id, current.status)?;
        info!(article_id = %article_id, "article deleted");
        Ok(removed)
    }

    /// Send a draft or flagged article to review, opening a new cycle.
    pub fn submit_for_review(&self, article_id: ArticleId, actor_id: &UserId) -> Result<Article> {
        let current = self.articles.get(article_id)?;
        Self::require_author(&current, actor_id, "submit")?;
        if !current.status.can_submit() {
            return Err(Error::invalid_state("submit", current.status));
        }

        match self.articles.compare_and_transition(
            article_id,
            current.status,
            ArticleStatus::InReview,
        )? {
            TransitionOutcome::Applied(article) => {
                info!(
                    article_id = %article_id,
                    cycle = article.review_cycle,
                    from = %current.status,
                    "article submitted for review"
                );
                Ok(article)
            }
            TransitionOutcome::Conflict { actual } => {
                warn!(article_id = %article_id, actual = %actual, "submit lost race");
                Err(Error::Conflict(article_id.to_string()))
            }
        }
    }

    /// Cast a vote in `role` on an article under review.
    pub fn record_vote(
        &self,
        article_id: ArticleId,
        approver: &Actor,
        role: Role,
        decision: Decision,
        comment: Option<String>,
    ) -> Result<VoteReceipt> {
        let registry = self.registry.snapshot()?;
        let snapshot = self.articles.snapshot(article_id)?;

        if !approver.has_role(role) {
            return Err(Error::Authorization(format!(
                "{} does not hold role {}",
                approver.username, role
            )));
        }
        registry.weight_of(role)?;
        if snapshot.article.status != ArticleStatus::InReview {
            return Err(Error::invalid_state("vote on", snapshot.article.status));
        }

        let vote = ApprovalRecord::new(
            article_id,
            snapshot.article.review_cycle,
            approver,
            role,
            decision,
            comment,
        )?;
        let outcome = self.engine.decide(&registry, &snapshot.active_votes, &vote)?;

        let ledger = |record: &ApprovalRecord| self.engine.record(record.clone()).map(|_| ());
        let article = match self.articles.commit_vote(
            article_id,
            snapshot.version,
            vote.clone(),
            outcome.next_status,
            &ledger,
        )? {
            TransitionOutcome::Applied(article) => article,
            TransitionOutcome::Conflict { actual } => {
                warn!(
                    article_id = %article_id,
                    role = %role,
                    actual = %actual,
                    "vote lost race"
                );
                return Err(Error::Conflict(article_id.to_string()));
            }
        };

        info!(
            article_id = %article_id,
            role = %role,
            decision = %decision,
            percentage = outcome.percentage(),
            status = %article.status,
            "vote committed"
        );
        Ok(VoteReceipt::new(&article, &vote, &outcome))
    }

    /// Role a vote without an explicit role is cast in: the first of the
    /// actor's voting roles with no active vote in the current cycle, or the
    /// first voting role when all of them have voted.
    pub fn default_vote_role(&self, article_id: ArticleId, actor: &Actor) -> Result<Role> {
        let registry = self.registry.snapshot()?;
        let roles: Vec<Role> = actor
            .roles
            .iter()
            .copied()
            .filter(|r| registry.contains(*r))
            .collect();
        let Some(first) = roles.first().copied() else {
            return Err(Error::Authorization(format!(
                "{} holds no voting role",
                actor.username
            )));
        };

        let snapshot = self.articles.snapshot(article_id)?;
        if snapshot.article.status != ArticleStatus::InReview {
            return Ok(first);
        }
        Ok(roles
            .into_iter()
            .find(|r| !snapshot.active_votes.contains_key(r))
            .unwrap_or(first))
    }

    /// [`record_vote`](Self::record_vote), retrying up to `retries` more
    /// times when another writer committed first.
    pub fn record_vote_with_retry(
        &self,
        article_id: ArticleId,
        approver: &Actor,
        role: Role,
        decision: Decision,
        comment: Option<String>,
        retries: u32,
    ) -> Result<VoteReceipt> {
        let mut attempt = 0;
        loop {
            match self.record_vote(article_id, approver, role, decision, comment.clone()) {
                Err(err) if err.is_retryable() && attempt < retries => {
                    attempt += 1;
                    debug!(article_id = %article_id, attempt, "retrying vote after conflict");
                }
                result => return result,
            }
        }
    }

    /// Fetch one article.
    pub fn get(&self, article_id: ArticleId) -> Result<Article> {
        self.articles.get(article_id)
    }

    /// Articles written by `author_id`.
    pub fn list_by_author(&self, author_id: &UserId) -> Result<Vec<Article>> {
        self.articles.list(&ArticleFilter::new().by_author(author_id))
    }

    /// Published articles.
    pub fn list_published(&self) -> Result<Vec<Article>> {
        self.articles
            .list(&ArticleFilter::new().by_status(ArticleStatus::Published))
    }

    /// Articles under review.
    pub fn list_pending(&self) -> Result<Vec<Article>> {
        self.articles
            .list(&ArticleFilter::new().by_status(ArticleStatus::InReview))
    }

    /// Articles under review still awaiting a vote from one of the actor's
    /// voting roles in their current cycle.
    pub fn pending_for(&self, actor: &Actor) -> Result<Vec<Article>> {
        let registry = self.registry.snapshot()?;
        let roles: Vec<Role> = actor
            .roles
            .iter()
            .copied()
            .filter(|r| registry.contains(*r))
            .collect();
        if roles.is_empty() {
            return Err(Error::Authorization(format!(
                "{} holds no voting role",
                actor.username
            )));
        }

        let pending = self.list_pending()?;
        let ids: Vec<ArticleId> = pending.iter().map(|a| a.id).collect();
        let histories = self.engine.history().histories_for(&ids)?;

        Ok(pending
            .into_iter()
            .filter(|article| {
                let voted: HashSet<Role> = histories
                    .get(&article.id)
                    .map(|records| {
                        records
                            .iter()
                            .filter(|r| r.cycle == article.review_cycle)
                            .map(|r| r.role)
                            .collect()
                    })
                    .unwrap_or_default();
                roles.iter().any(|r| !voted.contains(r))
            })
            .collect())
    }

    /// Whether `role` has an active vote on the article's current cycle.
    pub fn has_active_vote(&self, article_id: ArticleId, role: Role) -> Result<bool> {
        let article = self.articles.get(article_id)?;
        if article.status != ArticleStatus::InReview {
            return Ok(false);
        }
        self.engine
            .history()
            .has_active_vote(article_id, role, article.review_cycle)
    }

    /// Full approval ledger of an article, oldest first.
    pub fn history(&self, article_id: ArticleId) -> Result<Vec<ApprovalRecord>> {
        self.engine.history().records_for(article_id)
    }

    fn require_author(article: &Article, actor_id: &UserId, operation: &str) -> Result<()> {
        if article.is_authored_by(actor_id) {
            Ok(())
        } else {
            Err(Error::Authorization(format!(
                "only the author may {} article {}",
                operation, article.id
            )))
        }
    }
}
