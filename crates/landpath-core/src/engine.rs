//! Journey engine
//!
//! Exposes every journey operation to the request-handling layer. Reads
//! assemble views from the store; mutations of one land run under that
//! land's lock and commit each planned write with a single store call.

use crate::advance::{check_unlocked, plan_engagement_link, plan_stage_write};
use crate::config::EngineConfig;
use crate::directory::{Directories, EngagementInfo, ProfessionalSummary};
use crate::error::{JourneyError, Resource, StoreError};
use crate::locks::LandLocks;
use crate::store::{JourneyStore, StageWrite};
use crate::types::{
    Document, DocumentId, EngagementId, Journey, LandAttributes, LandAttributesPatch, LandId,
    NewDocument, StageRecord, StageStatusUpdate, TransactionId, UserId,
};
use crate::view::{self, JourneySummary, JourneyView};
use chrono::Utc;
use landpath_catalog::{CatalogSnapshot, StageCatalog, StageId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Log a rejected mutation and pass the result through
fn logged<T>(
    operation: &'static str,
    land_id: Option<LandId>,
    result: Result<T, JourneyError>,
) -> Result<T, JourneyError> {
    if let Err(err) = &result {
        match land_id {
            Some(land_id) => {
                warn!(operation, %land_id, kind = ?err.kind(), error = %err, "mutation rejected");
            }
            None => warn!(operation, kind = ?err.kind(), error = %err, "mutation rejected"),
        }
    }
    result
}

/// Land acquisition journey engine
pub struct JourneyEngine {
    config: EngineConfig,
    catalog: &'static StageCatalog,
    store: Arc<dyn JourneyStore>,
    directories: Directories,
    locks: LandLocks,
}

impl JourneyEngine {
    /// Create engine over a store and the external directories
    #[must_use]
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn JourneyStore>,
        directories: Directories,
    ) -> Self {
        Self {
            config,
            catalog: StageCatalog::global(),
            store,
            directories,
            locks: LandLocks::new(),
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ordered stage ids and catalog entries by id
    #[must_use]
    pub fn catalog(&self) -> CatalogSnapshot {
        self.catalog.snapshot()
    }

    /// Summaries of every journey an owner has, newest first
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn journeys_for_owner(
        &self,
        owner_id: UserId,
    ) -> Result<Vec<JourneySummary>, JourneyError> {
        let mut journeys = self.store.journeys_for_owner(owner_id).await?;
        journeys.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.land_id.cmp(&a.land_id))
        });
        debug!(%owner_id, count = journeys.len(), "listed journeys");
        Ok(journeys
            .iter()
            .map(|journey| view::summarize(self.catalog, journey))
            .collect())
    }

    /// Full journey view of one land
    ///
    /// Engagements the directory cannot resolve render as absent.
    ///
    /// # Errors
    /// - `NotFound` if the land does not exist
    /// - `Forbidden` if the caller is not its owner
    pub async fn journey_detail(
        &self,
        land_id: LandId,
        caller: UserId,
    ) -> Result<JourneyView, JourneyError> {
        let journey = self.load_owned(land_id, caller).await?;
        let records = self.store.stage_records(land_id).await?;
        let documents = self.store.documents(land_id).await?;
        let engagements = self.resolve_engagements(&records).await;

        debug!(
            %land_id,
            current = %journey.current_stage,
            records = records.len(),
            documents = documents.len(),
            "assembled journey view"
        );
        Ok(view::assemble(
            self.catalog,
            journey,
            records,
            documents,
            &engagements,
        ))
    }

    /// Register a land by hand
    ///
    /// # Errors
    /// Propagates store failures.
    pub async fn register_manually(
        &self,
        owner_id: UserId,
        attributes: LandAttributes,
    ) -> Result<Journey, JourneyError> {
        let result = self.register(owner_id, attributes, None).await;
        logged("register_manually", None, result)
    }

    /// Register the land bought through a completed transaction
    ///
    /// # Errors
    /// - `NotFound` if the transaction does not exist
    /// - `Forbidden` if the caller is not its buyer
    /// - `InvalidState` if it is not completed or already linked to a land
    pub async fn register_from_transaction(
        &self,
        owner_id: UserId,
        transaction_id: TransactionId,
    ) -> Result<Journey, JourneyError> {
        let result = async {
            let transaction = self
                .directories
                .transactions
                .transaction(transaction_id)
                .await?
                .ok_or_else(|| JourneyError::not_found(Resource::Transaction, transaction_id))?;

            if transaction.buyer_id != owner_id {
                return Err(JourneyError::forbidden(Resource::Transaction, transaction_id));
            }
            if !transaction.status.is_completed() {
                return Err(JourneyError::InvalidState(format!(
                    "transaction {transaction_id} is not completed"
                )));
            }
            if let Some(land_id) = self.store.land_for_transaction(transaction_id).await? {
                return Err(already_linked(transaction_id, land_id));
            }

            let purchase_date = transaction.completed_at.map(|at| at.date_naive());
            let attributes = transaction.listing.to_land_attributes(purchase_date);
            self.register(owner_id, attributes, Some(transaction_id)).await
        }
        .await;
        logged("register_from_transaction", None, result)
    }

    /// Change descriptive attributes of a land
    ///
    /// # Errors
    /// `NotFound` or `Forbidden` as for [`JourneyEngine::journey_detail`].
    pub async fn update_land_attributes(
        &self,
        land_id: LandId,
        caller: UserId,
        patch: LandAttributesPatch,
    ) -> Result<Journey, JourneyError> {
        let result = async {
            let _guard = self.locks.acquire(land_id).await;
            let journey = self.load_owned(land_id, caller).await?;
            if patch.is_empty() {
                return Ok(journey);
            }

            let mut attributes = journey.attributes;
            patch.apply(&mut attributes);
            let journey = self
                .store
                .update_attributes(land_id, attributes, Utc::now())
                .await?;
            debug!(%land_id, "updated land attributes");
            Ok::<_, JourneyError>(journey)
        }
        .await;
        logged("update_land_attributes", Some(land_id), result)
    }

    /// Set the status of a stage, advancing the journey when the current
    /// stage completes
    ///
    /// # Errors
    /// - `NotFound` if the land, or a named engagement, does not exist
    /// - `Forbidden` if the caller does not own the land or the engagement
    /// - `InvalidTransition` if the stage is beyond the next one
    pub async fn set_stage_status(
        &self,
        land_id: LandId,
        stage: StageId,
        caller: UserId,
        update: StageStatusUpdate,
    ) -> Result<StageRecord, JourneyError> {
        let result = async {
            let _guard = self.locks.acquire(land_id).await;
            let journey = self.load_owned(land_id, caller).await?;
            check_unlocked(&journey, stage)?;

            let professional = match update.engagement_id {
                Some(engagement_id) => Some(
                    self.owned_engagement(engagement_id, caller)
                        .await?
                        .professional_id,
                ),
                None => None,
            };
            let existing = self.store.stage_record(land_id, stage).await?;
            let write = plan_stage_write(
                &journey,
                stage,
                &update,
                existing.as_ref(),
                professional,
                Utc::now(),
            )?;
            self.commit(write).await
        }
        .await;
        logged("set_stage_status", Some(land_id), result)
    }

    /// Link a professional engagement to a stage
    ///
    /// Puts the stage into `PENDING_PROFESSIONAL`. Never moves the journey
    /// and is not subject to the lock rule.
    ///
    /// # Errors
    /// - `NotFound` if the land or engagement does not exist
    /// - `Forbidden` if the caller does not own the land or the engagement
    pub async fn link_engagement(
        &self,
        land_id: LandId,
        stage: StageId,
        engagement_id: EngagementId,
        caller: UserId,
    ) -> Result<StageRecord, JourneyError> {
        let result = async {
            let _guard = self.locks.acquire(land_id).await;
            self.load_owned(land_id, caller).await?;
            let engagement = self.owned_engagement(engagement_id, caller).await?;
            let existing = self.store.stage_record(land_id, stage).await?;
            let record =
                plan_engagement_link(existing.as_ref(), land_id, stage, &engagement, Utc::now());
            self.commit(StageWrite {
                record,
                advance: None,
            })
            .await
        }
        .await;
        logged("link_engagement", Some(land_id), result)
    }

    /// Attach a document to a land
    ///
    /// The document type is not checked against the stage's catalog lists.
    ///
    /// # Errors
    /// `NotFound` or `Forbidden` for the land.
    pub async fn add_document(
        &self,
        land_id: LandId,
        caller: UserId,
        document: NewDocument,
    ) -> Result<Document, JourneyError> {
        let result = async {
            let _guard = self.locks.acquire(land_id).await;
            self.load_owned(land_id, caller).await?;
            let document = document.into_document(land_id, Utc::now());
            self.store.insert_document(document.clone()).await?;
            debug!(
                %land_id,
                document_id = %document.id,
                stage = %document.stage,
                document_type = %document.document_type,
                "added document"
            );
            Ok::<_, JourneyError>(document)
        }
        .await;
        logged("add_document", Some(land_id), result)
    }

    /// Documents of a land by upload time, optionally for one stage
    ///
    /// # Errors
    /// `NotFound` or `Forbidden` for the land.
    pub async fn list_documents(
        &self,
        land_id: LandId,
        caller: UserId,
        stage: Option<StageId>,
    ) -> Result<Vec<Document>, JourneyError> {
        self.load_owned(land_id, caller).await?;
        let mut documents = self.store.documents(land_id).await?;
        if let Some(stage) = stage {
            documents.retain(|d| d.stage == stage);
        }
        Ok(documents)
    }

    /// Remove a document from a land
    ///
    /// # Errors
    /// - `NotFound` if the land does not exist, or the document does not
    ///   exist on that land
    /// - `Forbidden` if the caller is not the land's owner
    pub async fn remove_document(
        &self,
        land_id: LandId,
        document_id: DocumentId,
        caller: UserId,
    ) -> Result<(), JourneyError> {
        let result = async {
            let _guard = self.locks.acquire(land_id).await;
            self.load_owned(land_id, caller).await?;
            let belongs = self
                .store
                .document(document_id)
                .await?
                .is_some_and(|d| d.land_id == land_id);
            if !belongs || !self.store.remove_document(document_id).await? {
                return Err(JourneyError::not_found(Resource::Document, document_id));
            }
            debug!(%land_id, %document_id, "removed document");
            Ok::<_, JourneyError>(())
        }
        .await;
        logged("remove_document", Some(land_id), result)
    }

    /// Delete a land with its stage records and documents
    ///
    /// # Errors
    /// `NotFound` or `Forbidden` for the land.
    pub async fn delete_land(&self, land_id: LandId, caller: UserId) -> Result<(), JourneyError> {
        let result = async {
            let _guard = self.locks.acquire(land_id).await;
            self.load_owned(land_id, caller).await?;
            if !self.store.delete_land(land_id).await? {
                return Err(JourneyError::not_found(Resource::Land, land_id));
            }
            info!(%land_id, "deleted land");
            Ok::<_, JourneyError>(())
        }
        .await;
        logged("delete_land", Some(land_id), result)
    }

    /// Professionals able to carry out a stage
    ///
    /// Empty, without asking the directory, for stages needing no role.
    ///
    /// # Errors
    /// Propagates directory failures.
    pub async fn list_candidate_professionals(
        &self,
        stage: StageId,
    ) -> Result<Vec<ProfessionalSummary>, JourneyError> {
        let Some(role) = self.catalog.role_for(stage) else {
            return Ok(Vec::new());
        };
        let professionals = self
            .directories
            .professionals
            .professionals_by_role(role, self.config.candidate_limit)
            .await?;
        debug!(%stage, %role, count = professionals.len(), "listed candidate professionals");
        Ok(professionals)
    }

    async fn register(
        &self,
        owner_id: UserId,
        attributes: LandAttributes,
        transaction_id: Option<TransactionId>,
    ) -> Result<Journey, JourneyError> {
        let journey = Journey::new(owner_id, attributes, transaction_id, Utc::now());
        let seed = StageRecord::seed(journey.land_id, journey.created_at);

        self.store
            .insert_journey(journey.clone(), seed)
            .await
            .map_err(|err| match err {
                StoreError::TransactionAlreadyLinked { transaction, land } => {
                    already_linked(transaction, land)
                }
                other => JourneyError::Store(other),
            })?;

        info!(
            land_id = %journey.land_id,
            %owner_id,
            transaction_id = ?journey.transaction_id,
            "registered land"
        );
        Ok(journey)
    }

    async fn commit(&self, write: StageWrite) -> Result<StageRecord, JourneyError> {
        let record = write.record.clone();
        let advance = write.advance;
        let journey = self.store.commit_stage_write(write).await?;

        debug!(
            land_id = %record.land_id,
            stage = %record.stage,
            status = %record.status,
            "wrote stage record"
        );
        if let Some(advance) = advance {
            info!(
                land_id = %journey.land_id,
                from = %advance.from,
                to = %advance.to,
                complete = journey.completed_at.is_some(),
                "advanced journey"
            );
        }
        Ok(record)
    }

    async fn load_owned(&self, land_id: LandId, caller: UserId) -> Result<Journey, JourneyError> {
        let journey = self
            .store
            .journey(land_id)
            .await?
            .ok_or_else(|| JourneyError::not_found(Resource::Land, land_id))?;
        if !journey.is_owned_by(caller) {
            return Err(JourneyError::forbidden(Resource::Land, land_id));
        }
        Ok(journey)
    }

    async fn owned_engagement(
        &self,
        engagement_id: EngagementId,
        caller: UserId,
    ) -> Result<EngagementInfo, JourneyError> {
        let engagement = self
            .directories
            .engagements
            .engagement(engagement_id)
            .await?
            .ok_or_else(|| JourneyError::not_found(Resource::Engagement, engagement_id))?;
        if engagement.client_id != caller {
            return Err(JourneyError::forbidden(Resource::Engagement, engagement_id));
        }
        Ok(engagement)
    }

    async fn resolve_engagements(
        &self,
        records: &[StageRecord],
    ) -> HashMap<EngagementId, EngagementInfo> {
        let mut engagements = HashMap::new();
        for engagement_id in records.iter().filter_map(|r| r.engagement_id) {
            if engagements.contains_key(&engagement_id) {
                continue;
            }
            match self.directories.engagements.engagement(engagement_id).await {
                Ok(Some(engagement)) => {
                    engagements.insert(engagement_id, engagement);
                }
                Ok(None) => debug!(%engagement_id, "linked engagement no longer exists"),
                Err(err) => warn!(%engagement_id, error = %err, "engagement lookup failed"),
            }
        }
        engagements
    }
}

impl std::fmt::Debug for JourneyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JourneyEngine")
            .field("config", &self.config)
            .field("locked_lands", &self.locks.len())
            .finish_non_exhaustive()
    }
}

fn already_linked(transaction_id: TransactionId, land_id: LandId) -> JourneyError {
    JourneyError::InvalidState(format!(
        "transaction {transaction_id} is already linked to land {land_id}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{
        EngagementStatus, InMemoryDirectory, ListingAttributes, MockEngagementDirectory,
        MockProfessionalDirectory, MockTransactionDirectory, TransactionInfo, TransactionStatus,
    };
    use crate::error::{DirectoryError, ErrorKind};
    use crate::store::{InMemoryJourneyStore, MockJourneyStore};
    use crate::types::{LandSizeUnit, ProfessionalId, StageStatus};
    use landpath_catalog::ProfessionalRole;

    fn attributes() -> LandAttributes {
        LandAttributes::new("Plot 12", "Lekki Phase 1", 0.5, LandSizeUnit::Acres)
    }

    fn directories(
        transactions: MockTransactionDirectory,
        engagements: MockEngagementDirectory,
        professionals: MockProfessionalDirectory,
    ) -> Directories {
        Directories {
            transactions: Arc::new(transactions),
            engagements: Arc::new(engagements),
            professionals: Arc::new(professionals),
        }
    }

    fn quiet_directories() -> Directories {
        directories(
            MockTransactionDirectory::new(),
            MockEngagementDirectory::new(),
            MockProfessionalDirectory::new(),
        )
    }

    #[tokio::test]
    async fn store_outage_is_retryable() {
        let mut store = MockJourneyStore::new();
        store
            .expect_journey()
            .returning(|_| Err(StoreError::Unavailable("connection reset".into())));
        let engine = JourneyEngine::new(EngineConfig::default(), Arc::new(store), quiet_directories());

        let err = engine
            .journey_detail(LandId::new(), UserId::new())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Collaborator);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn locked_stage_never_reaches_the_store() {
        let owner = UserId::new();
        let journey = Journey::new(owner, attributes(), None, Utc::now());
        let land_id = journey.land_id;

        let mut store = MockJourneyStore::new();
        store
            .expect_journey()
            .returning(move |_| Ok(Some(journey.clone())));
        store.expect_stage_record().never();
        store.expect_commit_stage_write().never();

        let mut engagements = MockEngagementDirectory::new();
        engagements.expect_engagement().never();
        let engine = JourneyEngine::new(
            EngineConfig::default(),
            Arc::new(store),
            directories(
                MockTransactionDirectory::new(),
                engagements,
                MockProfessionalDirectory::new(),
            ),
        );

        let err = engine
            .set_stage_status(
                land_id,
                StageId::SoilTest,
                owner,
                StageStatusUpdate::completed().with_engagement(EngagementId::new()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, JourneyError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn racing_registration_maps_to_already_linked() {
        let owner = UserId::new();
        let transaction_id = TransactionId::new();
        let mut transactions = MockTransactionDirectory::new();
        transactions.expect_transaction().returning(move |id| {
            Ok(Some(TransactionInfo {
                id,
                buyer_id: owner,
                status: TransactionStatus::FundsReleased,
                completed_at: Some(Utc::now()),
                listing: ListingAttributes {
                    title: "Plot 3".to_string(),
                    description: None,
                    location: "Ajah".to_string(),
                    city: None,
                    state: None,
                    land_size: 450.0,
                    land_size_unit: LandSizeUnit::Sqm,
                    price: 8_500_000,
                },
            }))
        });

        let mut store = MockJourneyStore::new();
        store.expect_land_for_transaction().returning(|_| Ok(None));
        store.expect_insert_journey().returning(move |journey, _| {
            Err(StoreError::TransactionAlreadyLinked {
                transaction: journey.transaction_id.unwrap_or_default(),
                land: LandId::new(),
            })
        });

        let engine = JourneyEngine::new(
            EngineConfig::default(),
            Arc::new(store),
            directories(
                transactions,
                MockEngagementDirectory::new(),
                MockProfessionalDirectory::new(),
            ),
        );
        let err = engine
            .register_from_transaction(owner, transaction_id)
            .await
            .unwrap_err();
        assert!(matches!(&err, JourneyError::InvalidState(msg) if msg.contains("already linked")));
    }

    #[tokio::test]
    async fn unresolvable_engagement_renders_as_absent() {
        let owner = UserId::new();
        let store = Arc::new(InMemoryJourneyStore::new());
        let directory = Arc::new(InMemoryDirectory::new());
        let engagement = EngagementInfo {
            id: EngagementId::new(),
            client_id: owner,
            professional_id: ProfessionalId::new(),
            role: ProfessionalRole::Lawyer,
            status: EngagementStatus::Accepted,
        };
        directory.insert_engagement(engagement.clone());

        let engine = JourneyEngine::new(
            EngineConfig::default(),
            store.clone(),
            Directories::uniform(directory),
        );
        let journey = engine.register_manually(owner, attributes()).await.unwrap();
        engine
            .link_engagement(journey.land_id, StageId::LandSearch, engagement.id, owner)
            .await
            .unwrap();

        let mut failing = MockEngagementDirectory::new();
        failing
            .expect_engagement()
            .returning(|_| Err(DirectoryError::Unavailable("timeout".into())));
        let reader = JourneyEngine::new(
            EngineConfig::default(),
            store,
            directories(
                MockTransactionDirectory::new(),
                failing,
                MockProfessionalDirectory::new(),
            ),
        );

        let view = reader.journey_detail(journey.land_id, owner).await.unwrap();
        let search = view.stage(StageId::LandSearch);
        assert_eq!(search.status, StageStatus::PendingProfessional);
        assert_eq!(
            search.record.as_ref().and_then(|r| r.engagement_id),
            Some(engagement.id)
        );
        assert!(search.engagement.is_none());
    }

    #[tokio::test]
    async fn rejected_mutations_leave_no_lock_entries() {
        let owner = UserId::new();
        let engine = JourneyEngine::new(
            EngineConfig::default(),
            Arc::new(InMemoryJourneyStore::new()),
            Directories::uniform(Arc::new(InMemoryDirectory::new())),
        );

        for _ in 0..100 {
            let err = engine
                .set_stage_status(LandId::new(), StageId::LandSearch, owner, StageStatusUpdate::completed())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
        assert!(engine.locks.is_empty());

        let land_id = engine.register_manually(owner, attributes()).await.unwrap().land_id;
        let err = engine
            .set_stage_status(land_id, StageId::LandSearch, UserId::new(), StageStatusUpdate::completed())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        engine
            .set_stage_status(land_id, StageId::LandSearch, owner, StageStatusUpdate::completed())
            .await
            .unwrap();
        engine.delete_land(land_id, owner).await.unwrap();
        assert!(engine.locks.is_empty());
    }

    #[tokio::test]
    async fn roleless_stage_skips_directory() {
        let mut professionals = MockProfessionalDirectory::new();
        professionals.expect_professionals_by_role().never();
        let engine = JourneyEngine::new(
            EngineConfig::default(),
            Arc::new(InMemoryJourneyStore::new()),
            directories(
                MockTransactionDirectory::new(),
                MockEngagementDirectory::new(),
                professionals,
            ),
        );

        let found = engine
            .list_candidate_professionals(StageId::PermitFees)
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn candidate_search_uses_configured_limit() {
        let mut professionals = MockProfessionalDirectory::new();
        professionals
            .expect_professionals_by_role()
            .withf(|role, limit| *role == ProfessionalRole::Valuer && *limit == 3)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let engine = JourneyEngine::new(
            EngineConfig::default().with_candidate_limit(3),
            Arc::new(InMemoryJourneyStore::new()),
            directories(
                MockTransactionDirectory::new(),
                MockEngagementDirectory::new(),
                professionals,
            ),
        );

        engine
            .list_candidate_professionals(StageId::LandValuation)
            .await
            .unwrap();
    }
}
