//! ArticleStateStore trait and in-memory implementation.
//!
//! The store owns every article and its active votes. Each article sits
//! behind its own lock; all mutations compare the caller's expected state
//! with the committed one and report a conflict instead of overwriting.

use crate::article::model::{Article, ArticleStatus};
use crate::audit::ApprovalRecord;
use crate::core::{now, ArticleId, Error, Result, UserId};
use crate::roles::Role;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, RwLock};

/// Consistent view of one article.
#[derive(Clone, Debug)]
pub struct ArticleSnapshot {
    pub article: Article,
    /// Latest vote per role in the current review cycle
    pub active_votes: BTreeMap<Role, ApprovalRecord>,
    /// Bumped on every committed change
    pub version: u64,
}

/// Outcome of a compare-and-transition.
#[derive(Clone, Debug, PartialEq)]
pub enum TransitionOutcome {
    /// Committed; the article as stored after the change
    Applied(Article),
    /// The committed state no longer matched the expectation
    Conflict { actual: ArticleStatus },
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied(_))
    }
}

/// Filter for listing articles.
#[derive(Clone, Debug, Default)]
pub struct ArticleFilter {
    pub status: Option<ArticleStatus>,
    pub author: Option<UserId>,
}

impl ArticleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by status.
    pub fn by_status(mut self, status: ArticleStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by author.
    pub fn by_author(mut self, author: &UserId) -> Self {
        self.author = Some(author.clone());
        self
    }

    /// Check whether an article matches.
    pub fn matches(&self, article: &Article) -> bool {
        if let Some(status) = self.status {
            if article.status != status {
                return false;
            }
        }
        if let Some(author) = &self.author {
            if &article.author_id != author {
                return false;
            }
        }
        true
    }
}

/// Transactional article repository.
pub trait ArticleStateStore: Send + Sync {
    /// Store a new article.
    fn insert(&self, article: Article) -> Result<Article>;

    /// Read an article.
    fn get(&self, id: ArticleId) -> Result<Article>;

    /// Read an article together with its active votes and version.
    fn snapshot(&self, id: ArticleId) -> Result<ArticleSnapshot>;

    /// List matching articles, oldest first.
    fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>>;

    /// Replace title and content if the status is still `expected`.
    fn edit(
        &self,
        id: ArticleId,
        expected: ArticleStatus,
        title: String,
        content: String,
    ) -> Result<Article>;

    /// Remove the article if the status is still `expected`.
    fn remove(&self, id: ArticleId, expected: ArticleStatus) -> Result<Article>;

    /// Move `expected -> next` if the status is still `expected`.
    ///
    /// Entering `InReview` opens a new review cycle.
    fn compare_and_transition(
        &self,
        id: ArticleId,
        expected: ArticleStatus,
        next: ArticleStatus,
    ) -> Result<TransitionOutcome>;

    /// Record `vote` as its role's active vote and move the article to
    /// `next`, if nothing was committed since `expected_version`.
    ///
    /// `ledger` runs under the article's lock once the expectation holds.
    /// If it fails, nothing is applied and its error is returned.
    fn commit_vote(
        &self,
        id: ArticleId,
        expected_version: u64,
        vote: ApprovalRecord,
        next: ArticleStatus,
        ledger: &dyn Fn(&ApprovalRecord) -> Result<()>,
    ) -> Result<TransitionOutcome>;
}

struct Entry {
    article: Article,
    active_votes: BTreeMap<Role, ApprovalRecord>,
    version: u64,
    removed: bool,
}

impl Entry {
    fn transition(&mut self, next: ArticleStatus) {
        if next == ArticleStatus::InReview {
            self.article.review_cycle += 1;
            self.active_votes.clear();
        }
        self.article.status = next;
        self.article.updated_at = Some(now());
        self.version += 1;
    }
}

/// In-memory article store with one lock per article.
#[derive(Default)]
pub struct InMemoryArticleStore {
    entries: RwLock<HashMap<ArticleId, Arc<Mutex<Entry>>>>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, id: ArticleId) -> Result<Arc<Mutex<Entry>>> {
        let entries = self.entries.read().map_err(|_| Error::poisoned("article map"))?;
        entries
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("article {}", id)))
    }

    /// Run `f` with the article's lock held.
    fn with_entry<T>(&self, id: ArticleId, f: impl FnOnce(&mut Entry) -> Result<T>) -> Result<T> {
        let entry = self.entry(id)?;
        let mut guard = entry.lock().map_err(|_| Error::poisoned("article"))?;
        if guard.removed {
            return Err(Error::NotFound(format!("article {}", id)));
        }
        f(&mut guard)
    }
}

impl ArticleStateStore for InMemoryArticleStore {
    fn insert(&self, article: Article) -> Result<Article> {
        let mut entries = self.entries.write().map_err(|_| Error::poisoned("article map"))?;
        if entries.contains_key(&article.id) {
            return Err(Error::Conflict(article.id.to_string()));
        }
        entries.insert(
            article.id,
            Arc::new(Mutex::new(Entry {
                article: article.clone(),
                active_votes: BTreeMap::new(),
                version: 0,
                removed: false,
            })),
        );
        Ok(article)
    }

    fn get(&self, id: ArticleId) -> Result<Article> {
        self.with_entry(id, |entry| Ok(entry.article.clone()))
    }

    fn snapshot(&self, id: ArticleId) -> Result<ArticleSnapshot> {
        self.with_entry(id, |entry| {
            Ok(ArticleSnapshot {
                article: entry.article.clone(),
                active_votes: entry.active_votes.clone(),
                version: entry.version,
            })
        })
    }

    fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>> {
        let handles: Vec<Arc<Mutex<Entry>>> = {
            let entries = self.entries.read().map_err(|_| Error::poisoned("article map"))?;
            entries.values().cloned().collect()
        };

        let mut articles = Vec::new();
        for handle in handles {
            let entry = handle.lock().map_err(|_| Error::poisoned("article"))?;
            if !entry.removed && filter.matches(&entry.article) {
                articles.push(entry.article.clone());
            }
        }
        articles.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(articles)
    }

    fn edit(
        &self,
        id: ArticleId,
        expected: ArticleStatus,
        title: String,
        content: String,
    ) -> Result<Article> {
        self.with_entry(id, |entry| {
            if entry.article.status != expected {
                return Err(Error::Conflict(id.to_string()));
            }
            entry.article.title = title;
            entry.article.content = content;
            entry.article.updated_at = Some(now());
            entry.version += 1;
            Ok(entry.article.clone())
        })
    }

    fn remove(&self, id: ArticleId, expected: ArticleStatus) -> Result<Article> {
        let handle = self.entry(id)?;
        let mut entry = handle.lock().map_err(|_| Error::poisoned("article"))?;
        if entry.removed {
            return Err(Error::NotFound(format!("article {}", id)));
        }
        if entry.article.status != expected {
            return Err(Error::Conflict(id.to_string()));
        }

        entry.removed = true;
        entry.version += 1;
        self.entries
            .write()
            .map_err(|_| Error::poisoned("article map"))?
            .remove(&id);
        Ok(entry.article.clone())
    }

    fn compare_and_transition(
        &self,
        id: ArticleId,
        expected: ArticleStatus,
        next: ArticleStatus,
    ) -> Result<TransitionOutcome> {
        if !expected.can_transition_to(next) {
            return Err(Error::invalid_state("transition", expected));
        }
        self.with_entry(id, |entry| {
            if entry.article.status != expected {
                return Ok(TransitionOutcome::Conflict {
                    actual: entry.article.status,
                });
            }
            entry.transition(next);
            Ok(TransitionOutcome::Applied(entry.article.clone()))
        })
    }

    fn commit_vote(
        &self,
        id: ArticleId,
        expected_version: u64,
        vote: ApprovalRecord,
        next: ArticleStatus,
        ledger: &dyn Fn(&ApprovalRecord) -> Result<()>,
    ) -> Result<TransitionOutcome> {
        if next != ArticleStatus::InReview && !ArticleStatus::InReview.can_transition_to(next) {
            return Err(Error::invalid_state("transition", ArticleStatus::InReview));
        }
        self.with_entry(id, |entry| {
            if entry.article.status != ArticleStatus::InReview || entry.version != expected_version
            {
                return Ok(TransitionOutcome::Conflict {
                    actual: entry.article.status,
                });
            }
            if vote.cycle != entry.article.review_cycle {
                return Err(Error::Internal(format!(
                    "vote for cycle {} committed during cycle {}",
                    vote.cycle, entry.article.review_cycle
                )));
            }

            ledger(&vote)?;
            entry.active_votes.insert(vote.role, vote);
            if next == ArticleStatus::InReview {
                entry.version += 1;
            } else {
                entry.transition(next);
            }
            Ok(TransitionOutcome::Applied(entry.article.clone()))
        })
    }
}
