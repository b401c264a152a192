//! Persistence port for journeys, stage records and documents
//!
//! Persistence technology is outside the engine. The engine only needs the
//! operations on [`JourneyStore`], and relies on two of them being atomic:
//! - [`JourneyStore::insert_journey`] enforces the one-to-one transaction link
//! - [`JourneyStore::commit_stage_write`] applies a record and a pointer
//!   advance together, or neither

mod memory;

pub use memory::InMemoryJourneyStore;

use crate::error::StoreError;
use crate::types::{
    Document, DocumentId, Journey, LandAttributes, LandId, StageRecord, TransactionId, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use landpath_catalog::StageId;
use serde::{Deserialize, Serialize};

/// Forward move of a land's current-stage pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerAdvance {
    /// Stage the pointer must currently be on
    pub from: StageId,
    /// Stage the pointer moves to
    pub to: StageId,
    /// Journey completion time, set when `to` is terminal
    pub completed_at: Option<DateTime<Utc>>,
}

/// One planned stage mutation: an upserted record and an optional advance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageWrite {
    /// Record to create or replace for `(record.land_id, record.stage)`
    pub record: StageRecord,
    /// Pointer movement to apply with the record
    pub advance: Option<PointerAdvance>,
}

/// Storage for journey state
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JourneyStore: Send + Sync {
    /// Insert a new journey with its seed record
    ///
    /// # Errors
    /// - `StoreError::DuplicateLand` if the land id exists
    /// - `StoreError::TransactionAlreadyLinked` if the journey's transaction
    ///   is already linked to another land
    async fn insert_journey(&self, journey: Journey, seed: StageRecord) -> Result<(), StoreError>;

    /// Journey by land id
    async fn journey(&self, land_id: LandId) -> Result<Option<Journey>, StoreError>;

    /// All journeys owned by a user, in no particular order
    async fn journeys_for_owner(&self, owner_id: UserId) -> Result<Vec<Journey>, StoreError>;

    /// Land linked to a transaction, if any
    async fn land_for_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<LandId>, StoreError>;

    /// Replace a land's attributes, leaving the pointer untouched
    async fn update_attributes(
        &self,
        land_id: LandId,
        attributes: LandAttributes,
        updated_at: DateTime<Utc>,
    ) -> Result<Journey, StoreError>;

    /// All stage records of a land, in stage order
    async fn stage_records(&self, land_id: LandId) -> Result<Vec<StageRecord>, StoreError>;

    /// Stage record for one pair
    async fn stage_record(
        &self,
        land_id: LandId,
        stage: StageId,
    ) -> Result<Option<StageRecord>, StoreError>;

    /// Atomically upsert a record and apply its pointer advance
    ///
    /// # Errors
    /// - `StoreError::MissingLand` if the land is gone
    /// - `StoreError::Conflict` if the pointer is no longer on `advance.from`
    async fn commit_stage_write(&self, write: StageWrite) -> Result<Journey, StoreError>;

    /// Append a document
    async fn insert_document(&self, document: Document) -> Result<(), StoreError>;

    /// Document by id
    async fn document(&self, document_id: DocumentId) -> Result<Option<Document>, StoreError>;

    /// All documents of a land, by upload time
    async fn documents(&self, land_id: LandId) -> Result<Vec<Document>, StoreError>;

    /// Remove a document; returns whether it existed
    async fn remove_document(&self, document_id: DocumentId) -> Result<bool, StoreError>;

    /// Delete a land with its records and documents; returns whether it existed
    async fn delete_land(&self, land_id: LandId) -> Result<bool, StoreError>;
}
