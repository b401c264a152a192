//! Testing utilities for the Landpath workspace
//!
//! Shared fixtures and an engine harness over the in-memory store and
//! directory.

#![allow(missing_docs)]

use chrono::{NaiveDate, TimeZone, Utc};
use landpath_core::{
    Directories, EngagementId, EngagementInfo, EngagementStatus, EngineConfig, InMemoryDirectory,
    InMemoryJourneyStore, Journey, JourneyEngine, LandAttributes, LandId, LandSizeUnit,
    ListingAttributes, ProfessionalId, ProfessionalRole, ProfessionalSummary, StageRecord,
    StageStatusUpdate, TransactionId, TransactionInfo, TransactionStatus, UserId,
};
use std::sync::Arc;

pub fn sample_attributes() -> LandAttributes {
    LandAttributes::new("Half plot, Sangotedo", "Sangotedo, Lagos", 0.5, LandSizeUnit::Acres)
        .with_region("Lagos", "Lagos")
}

pub fn sample_listing() -> ListingAttributes {
    ListingAttributes {
        title: "Dry land, Epe".to_string(),
        description: Some("Fenced, with survey".to_string()),
        location: "Epe, Lagos".to_string(),
        city: Some("Epe".to_string()),
        state: Some("Lagos".to_string()),
        land_size: 648.0,
        land_size_unit: LandSizeUnit::Sqm,
        price: 15_000_000,
    }
}

/// Date every fixture transaction completed on
pub fn transaction_completion_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 14).expect("valid date")
}

pub fn transaction_with_status(buyer_id: UserId, status: TransactionStatus) -> TransactionInfo {
    let completed_at = status.is_completed().then(|| {
        let at = transaction_completion_date()
            .and_hms_opt(10, 30, 0)
            .expect("valid time");
        Utc.from_utc_datetime(&at)
    });
    TransactionInfo {
        id: TransactionId::new(),
        buyer_id,
        status,
        completed_at,
        listing: sample_listing(),
    }
}

pub fn completed_transaction(buyer_id: UserId) -> TransactionInfo {
    transaction_with_status(buyer_id, TransactionStatus::Completed)
}

pub fn engagement(client_id: UserId, role: ProfessionalRole) -> EngagementInfo {
    EngagementInfo {
        id: EngagementId::new(),
        client_id,
        professional_id: ProfessionalId::new(),
        role,
        status: EngagementStatus::Accepted,
    }
}

pub fn professional(
    name: &str,
    role: ProfessionalRole,
    rating: f32,
    verified: bool,
) -> ProfessionalSummary {
    ProfessionalSummary {
        id: ProfessionalId::new(),
        name: name.to_string(),
        role,
        firm: None,
        rating: Some(rating),
        verified,
    }
}

/// Engine wired to in-memory collaborators the test can inspect
pub struct TestHarness {
    pub engine: JourneyEngine,
    pub store: Arc<InMemoryJourneyStore>,
    pub directory: Arc<InMemoryDirectory>,
    pub owner: UserId,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let store = Arc::new(InMemoryJourneyStore::new());
        let directory = Arc::new(InMemoryDirectory::new());
        let engine = JourneyEngine::new(
            config,
            store.clone(),
            Directories::uniform(directory.clone()),
        );
        Self {
            engine,
            store,
            directory,
            owner: UserId::new(),
        }
    }

    /// Register the sample land for the harness owner
    pub async fn register_land(&self) -> Journey {
        self.engine
            .register_manually(self.owner, sample_attributes())
            .await
            .unwrap()
    }

    /// Add a completed transaction bought by `buyer`
    pub fn add_completed_transaction(&self, buyer: UserId) -> TransactionInfo {
        let transaction = completed_transaction(buyer);
        self.directory.insert_transaction(transaction.clone());
        transaction
    }

    /// Add an engagement requested by `client`
    pub fn add_engagement(&self, client: UserId, role: ProfessionalRole) -> EngagementInfo {
        let engagement = engagement(client, role);
        self.directory.insert_engagement(engagement.clone());
        engagement
    }

    /// Current journey record of a land owned by the harness owner
    pub async fn journey(&self, land_id: LandId) -> Journey {
        self.engine
            .journey_detail(land_id, self.owner)
            .await
            .unwrap()
            .journey
    }

    /// Complete whatever stage the land is currently on
    pub async fn complete_current(&self, land_id: LandId) -> StageRecord {
        let current = self.journey(land_id).await.current_stage;
        self.engine
            .set_stage_status(land_id, current, self.owner, StageStatusUpdate::completed())
            .await
            .unwrap()
    }
}
