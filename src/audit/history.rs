//! AuditHistoryStore trait and in-memory ledger.
//!
//! Append-only: there is no update or delete. Records are returned in
//! timestamp order, ties broken by insertion order.

use crate::audit::record::ApprovalRecord;
use crate::core::{ArticleId, Error, RecordId, Result};
use crate::roles::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// Result of record verification.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    /// Record verified
    pub record_id: RecordId,
    /// Digest matches content
    pub is_valid: bool,
    /// Verification message
    pub message: String,
}

impl VerificationResult {
    /// Create a valid result.
    pub fn valid(record_id: RecordId) -> Self {
        Self {
            record_id,
            is_valid: true,
            message: "Record verified successfully".to_string(),
        }
    }

    /// Create an invalid result.
    pub fn invalid(record_id: RecordId, message: &str) -> Self {
        Self {
            record_id,
            is_valid: false,
            message: message.to_string(),
        }
    }
}

/// Append-only ledger of approval decisions.
pub trait AuditHistoryStore: Send + Sync {
    /// Append a record.
    fn append(&self, record: ApprovalRecord) -> Result<RecordId>;

    /// All records of an article, oldest first.
    ///
    /// Unknown (or deleted) articles return whatever was recorded for them.
    fn records_for(&self, article_id: ArticleId) -> Result<Vec<ApprovalRecord>>;

    /// Read a record by ID.
    fn get(&self, id: RecordId) -> Result<Option<ApprovalRecord>>;

    /// Total record count.
    fn count(&self) -> Result<u64>;

    /// Histories of several articles in one call.
    fn histories_for(
        &self,
        article_ids: &[ArticleId],
    ) -> Result<HashMap<ArticleId, Vec<ApprovalRecord>>> {
        let mut out = HashMap::with_capacity(article_ids.len());
        for id in article_ids {
            out.insert(*id, self.records_for(*id)?);
        }
        Ok(out)
    }

    /// Whether `role` has voted on the article during `cycle`.
    fn has_active_vote(&self, article_id: ArticleId, role: Role, cycle: u32) -> Result<bool> {
        Ok(self
            .records_for(article_id)?
            .iter()
            .any(|r| r.cycle == cycle && r.role == role))
    }

    /// Check a record's digest.
    fn verify(&self, id: RecordId) -> Result<VerificationResult> {
        match self.get(id)? {
            Some(record) if record.verify_digest() => Ok(VerificationResult::valid(id)),
            Some(_) => Ok(VerificationResult::invalid(id, "Record digest mismatch")),
            None => Ok(VerificationResult::invalid(id, "Record not found")),
        }
    }
}

#[derive(Default)]
struct Ledger {
    /// Per-article records with their insertion sequence, kept sorted
    by_article: HashMap<ArticleId, Vec<(u64, ApprovalRecord)>>,
    by_id: HashMap<RecordId, ArticleId>,
    next_seq: u64,
}

/// In-memory history store.
#[derive(Default)]
pub struct InMemoryHistory {
    ledger: RwLock<Ledger>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditHistoryStore for InMemoryHistory {
    fn append(&self, record: ApprovalRecord) -> Result<RecordId> {
        let mut ledger = self.ledger.write().map_err(|_| Error::poisoned("history"))?;
        let id = record.id;
        if ledger.by_id.contains_key(&id) {
            return Err(Error::Validation(format!("record {} already recorded", id)));
        }

        let seq = ledger.next_seq;
        ledger.next_seq += 1;
        ledger.by_id.insert(id, record.article_id);

        let records = ledger.by_article.entry(record.article_id).or_default();
        let key = (record.timestamp, seq);
        let pos = records.partition_point(|(s, r)| (r.timestamp, *s) <= key);
        records.insert(pos, (seq, record));

        Ok(id)
    }

    fn records_for(&self, article_id: ArticleId) -> Result<Vec<ApprovalRecord>> {
        let ledger = self.ledger.read().map_err(|_| Error::poisoned("history"))?;
        Ok(ledger
            .by_article
            .get(&article_id)
            .map(|records| records.iter().map(|(_, r)| r.clone()).collect())
            .unwrap_or_default())
    }

    fn get(&self, id: RecordId) -> Result<Option<ApprovalRecord>> {
        let ledger = self.ledger.read().map_err(|_| Error::poisoned("history"))?;
        Ok(ledger.by_id.get(&id).and_then(|article_id| {
            ledger.by_article.get(article_id).and_then(|records| {
                records
                    .iter()
                    .find(|(_, r)| r.id == id)
                    .map(|(_, r)| r.clone())
            })
        }))
    }

    fn count(&self) -> Result<u64> {
        let ledger = self.ledger.read().map_err(|_| Error::poisoned("history"))?;
        Ok(ledger.by_id.len() as u64)
    }

    fn histories_for(
        &self,
        article_ids: &[ArticleId],
    ) -> Result<HashMap<ArticleId, Vec<ApprovalRecord>>> {
        let ledger = self.ledger.read().map_err(|_| Error::poisoned("history"))?;
        Ok(article_ids
            .iter()
            .map(|id| {
                let records = ledger
                    .by_article
                    .get(id)
                    .map(|rs| rs.iter().map(|(_, r)| r.clone()).collect())
                    .unwrap_or_default();
                (*id, records)
            })
            .collect())
    }
}
