//! In-memory journey store
//!
//! A single `RwLock` guards all state, so every trait method is atomic with
//! respect to every other. Cascading deletes and the transaction index stay
//! consistent without further coordination.

use super::{JourneyStore, StageWrite};
use crate::error::StoreError;
use crate::types::{
    Document, DocumentId, Journey, LandAttributes, LandId, StageRecord, TransactionId, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use landpath_catalog::StageId;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// Everything stored for one land
#[derive(Debug)]
struct LandEntry {
    journey: Journey,
    records: BTreeMap<StageId, StageRecord>,
    documents: Vec<Document>,
}

#[derive(Debug, Default)]
struct StoreState {
    lands: HashMap<LandId, LandEntry>,
    by_transaction: HashMap<TransactionId, LandId>,
    document_owner: HashMap<DocumentId, LandId>,
}

/// Journey store backed by process memory
#[derive(Debug, Default)]
pub struct InMemoryJourneyStore {
    state: RwLock<StoreState>,
}

impl InMemoryJourneyStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lands held
    #[must_use]
    pub fn land_count(&self) -> usize {
        self.state.read().lands.len()
    }

    /// Number of stage records held across all lands
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.state.read().lands.values().map(|e| e.records.len()).sum()
    }

    /// Number of documents held across all lands
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.state.read().document_owner.len()
    }
}

#[async_trait]
impl JourneyStore for InMemoryJourneyStore {
    async fn insert_journey(&self, journey: Journey, seed: StageRecord) -> Result<(), StoreError> {
        let mut state = self.state.write();

        if state.lands.contains_key(&journey.land_id) {
            return Err(StoreError::DuplicateLand(journey.land_id));
        }
        if let Some(transaction) = journey.transaction_id {
            if let Some(&land) = state.by_transaction.get(&transaction) {
                return Err(StoreError::TransactionAlreadyLinked { transaction, land });
            }
            state.by_transaction.insert(transaction, journey.land_id);
        }

        let mut records = BTreeMap::new();
        records.insert(seed.stage, seed);
        state.lands.insert(
            journey.land_id,
            LandEntry {
                journey,
                records,
                documents: Vec::new(),
            },
        );
        Ok(())
    }

    async fn journey(&self, land_id: LandId) -> Result<Option<Journey>, StoreError> {
        Ok(self
            .state
            .read()
            .lands
            .get(&land_id)
            .map(|e| e.journey.clone()))
    }

    async fn journeys_for_owner(&self, owner_id: UserId) -> Result<Vec<Journey>, StoreError> {
        Ok(self
            .state
            .read()
            .lands
            .values()
            .filter(|e| e.journey.owner_id == owner_id)
            .map(|e| e.journey.clone())
            .collect())
    }

    async fn land_for_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<LandId>, StoreError> {
        Ok(self.state.read().by_transaction.get(&transaction_id).copied())
    }

    async fn update_attributes(
        &self,
        land_id: LandId,
        attributes: LandAttributes,
        updated_at: DateTime<Utc>,
    ) -> Result<Journey, StoreError> {
        let mut state = self.state.write();
        let entry = state
            .lands
            .get_mut(&land_id)
            .ok_or(StoreError::MissingLand(land_id))?;
        entry.journey.attributes = attributes;
        entry.journey.updated_at = updated_at;
        Ok(entry.journey.clone())
    }

    async fn stage_records(&self, land_id: LandId) -> Result<Vec<StageRecord>, StoreError> {
        Ok(self
            .state
            .read()
            .lands
            .get(&land_id)
            .map(|e| e.records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn stage_record(
        &self,
        land_id: LandId,
        stage: StageId,
    ) -> Result<Option<StageRecord>, StoreError> {
        Ok(self
            .state
            .read()
            .lands
            .get(&land_id)
            .and_then(|e| e.records.get(&stage).cloned()))
    }

    async fn commit_stage_write(&self, write: StageWrite) -> Result<Journey, StoreError> {
        let StageWrite { record, advance } = write;
        let mut state = self.state.write();
        let entry = state
            .lands
            .get_mut(&record.land_id)
            .ok_or(StoreError::MissingLand(record.land_id))?;

        // Validate before mutating anything
        if let Some(advance) = &advance {
            if entry.journey.current_stage != advance.from {
                return Err(StoreError::Conflict(format!(
                    "pointer of land {} is on {}, expected {}",
                    record.land_id, entry.journey.current_stage, advance.from
                )));
            }
            if advance.to <= advance.from {
                return Err(StoreError::Conflict(format!(
                    "pointer may not move from {} to {}",
                    advance.from, advance.to
                )));
            }
        }

        if let Some(advance) = advance {
            entry.journey.current_stage = advance.to;
            entry.journey.updated_at = record.updated_at;
            if advance.completed_at.is_some() && entry.journey.completed_at.is_none() {
                entry.journey.completed_at = advance.completed_at;
            }
        }
        entry.records.insert(record.stage, record);
        Ok(entry.journey.clone())
    }

    async fn insert_document(&self, document: Document) -> Result<(), StoreError> {
        let mut state = self.state.write();
        let entry = state
            .lands
            .get_mut(&document.land_id)
            .ok_or(StoreError::MissingLand(document.land_id))?;
        let (id, land) = (document.id, document.land_id);
        entry.documents.push(document);
        state.document_owner.insert(id, land);
        Ok(())
    }

    async fn document(&self, document_id: DocumentId) -> Result<Option<Document>, StoreError> {
        let state = self.state.read();
        Ok(state
            .document_owner
            .get(&document_id)
            .and_then(|land| state.lands.get(land))
            .and_then(|e| e.documents.iter().find(|d| d.id == document_id).cloned()))
    }

    async fn documents(&self, land_id: LandId) -> Result<Vec<Document>, StoreError> {
        let mut documents = self
            .state
            .read()
            .lands
            .get(&land_id)
            .map(|e| e.documents.clone())
            .unwrap_or_default();
        documents.sort_by_key(|d| d.uploaded_at);
        Ok(documents)
    }

    async fn remove_document(&self, document_id: DocumentId) -> Result<bool, StoreError> {
        let mut state = self.state.write();
        let Some(land) = state.document_owner.remove(&document_id) else {
            return Ok(false);
        };
        if let Some(entry) = state.lands.get_mut(&land) {
            entry.documents.retain(|d| d.id != document_id);
        }
        Ok(true)
    }

    async fn delete_land(&self, land_id: LandId) -> Result<bool, StoreError> {
        let mut state = self.state.write();
        let Some(entry) = state.lands.remove(&land_id) else {
            return Ok(false);
        };
        if let Some(transaction) = entry.journey.transaction_id {
            state.by_transaction.remove(&transaction);
        }
        for document in &entry.documents {
            state.document_owner.remove(&document.id);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PointerAdvance;
    use crate::types::{LandAttributes, LandSizeUnit, NewDocument, StageStatus};
    use landpath_catalog::DocumentType;

    fn journey(transaction: Option<TransactionId>) -> Journey {
        Journey::new(
            UserId::new(),
            LandAttributes::new("Plot 9", "Ibeju-Lekki", 600.0, LandSizeUnit::Sqm),
            transaction,
            Utc::now(),
        )
    }

    async fn seeded(store: &InMemoryJourneyStore, transaction: Option<TransactionId>) -> Journey {
        let journey = journey(transaction);
        let seed = StageRecord::seed(journey.land_id, journey.created_at);
        store.insert_journey(journey.clone(), seed).await.unwrap();
        journey
    }

    #[tokio::test]
    async fn insert_seeds_single_record() {
        let store = InMemoryJourneyStore::new();
        let journey = seeded(&store, None).await;

        let records = store.stage_records(journey.land_id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].stage, StageId::LandAcquired);
        assert_eq!(records[0].status, StageStatus::Completed);
    }

    #[tokio::test]
    async fn transaction_link_is_one_to_one() {
        let store = InMemoryJourneyStore::new();
        let tx = TransactionId::new();
        let first = seeded(&store, Some(tx)).await;

        let second = journey(Some(tx));
        let seed = StageRecord::seed(second.land_id, second.created_at);
        let err = store.insert_journey(second, seed).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::TransactionAlreadyLinked {
                transaction: tx,
                land: first.land_id
            }
        );
        assert_eq!(store.land_count(), 1);
    }

    #[tokio::test]
    async fn commit_rejects_stale_pointer_without_writing() {
        let store = InMemoryJourneyStore::new();
        let journey = seeded(&store, None).await;
        let now = Utc::now();

        let mut record = StageRecord::new(journey.land_id, StageId::SurveySitePlan, now);
        record.status = StageStatus::Completed;
        let write = StageWrite {
            record,
            advance: Some(PointerAdvance {
                from: StageId::SurveySitePlan,
                to: StageId::DeedOfAssignment,
                completed_at: None,
            }),
        };

        assert!(matches!(
            store.commit_stage_write(write).await,
            Err(StoreError::Conflict(_))
        ));
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn commit_moves_pointer_past_next_stage() {
        let store = InMemoryJourneyStore::new();
        let journey = seeded(&store, None).await;
        let now = Utc::now();

        let mut record = StageRecord::new(journey.land_id, StageId::LandSearch, now);
        record.status = StageStatus::Completed;
        let write = StageWrite {
            record,
            advance: Some(PointerAdvance {
                from: StageId::LandAcquired,
                to: StageId::SurveySitePlan,
                completed_at: None,
            }),
        };

        let updated = store.commit_stage_write(write).await.unwrap();
        assert_eq!(updated.current_stage, StageId::SurveySitePlan);
        assert_eq!(store.record_count(), 2);
    }

    #[tokio::test]
    async fn delete_cascades() {
        let store = InMemoryJourneyStore::new();
        let tx = TransactionId::new();
        let journey = seeded(&store, Some(tx)).await;
        let doc = NewDocument::new(
            StageId::LandAcquired,
            DocumentType::PurchaseReceipt,
            "receipt.pdf",
            "https://files.example/receipt.pdf",
        )
        .into_document(journey.land_id, Utc::now());
        let doc_id = doc.id;
        store.insert_document(doc).await.unwrap();

        assert!(store.delete_land(journey.land_id).await.unwrap());
        assert_eq!(store.land_count(), 0);
        assert_eq!(store.record_count(), 0);
        assert_eq!(store.document_count(), 0);
        assert!(store.document(doc_id).await.unwrap().is_none());
        assert!(store.land_for_transaction(tx).await.unwrap().is_none());
        assert!(!store.delete_land(journey.land_id).await.unwrap());
    }

    #[tokio::test]
    async fn insert_document_requires_land() {
        let store = InMemoryJourneyStore::new();
        let doc = NewDocument::new(
            StageId::LandSearch,
            DocumentType::SearchReport,
            "search.pdf",
            "https://files.example/search.pdf",
        )
        .into_document(LandId::new(), Utc::now());
        assert!(matches!(
            store.insert_document(doc).await,
            Err(StoreError::MissingLand(_))
        ));
    }
}
