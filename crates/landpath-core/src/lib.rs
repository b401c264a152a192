//! Landpath Core - Land Acquisition Journey Engine
//!
//! Tracks each parcel of land through the fixed stage catalog:
//! - Registers lands by hand or from a completed acquisition transaction
//! - Assembles the journey view, synthesizing status for unrecorded stages
//! - Gates stage work to the current stage and the one after it
//! - Advances the current-stage pointer past each completed unlocked stage
//! - Links professional engagements and keeps a per-stage document ledger
//!
//! # Example
//!
//! ```rust
//! use landpath_core::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), JourneyError> {
//! # let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # runtime.block_on(async {
//! let directory = Arc::new(InMemoryDirectory::new());
//! let engine = JourneyEngine::new(
//!     EngineConfig::new(),
//!     Arc::new(InMemoryJourneyStore::new()),
//!     Directories::uniform(directory),
//! );
//!
//! let owner = UserId::new();
//! let attributes = LandAttributes::new("Plot 4", "Lekki", 0.5, LandSizeUnit::Acres);
//! let journey = engine.register_manually(owner, attributes).await?;
//!
//! engine
//!     .set_stage_status(journey.land_id, StageId::LandSearch, owner, StageStatusUpdate::completed())
//!     .await?;
//! let view = engine.journey_detail(journey.land_id, owner).await?;
//! assert_eq!(view.journey.current_stage, StageId::SurveySitePlan);
//! assert_eq!(view.progress, 13);
//! # Ok::<(), JourneyError>(())
//! # })
//! # }
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod advance;
pub mod config;
pub mod directory;
pub mod engine;
pub mod error;
pub mod locks;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod view;

// Re-exports for convenience
pub use config::{ConfigError, EngineConfig, LogFormat, LoggingConfig};
pub use directory::{
    Directories, EngagementDirectory, EngagementInfo, EngagementStatus, InMemoryDirectory,
    ListingAttributes, ProfessionalDirectory, ProfessionalSummary, TransactionDirectory,
    TransactionInfo, TransactionStatus,
};
pub use engine::JourneyEngine;
pub use error::{
    DirectoryError, ErrorKind, JourneyError, Resource, StoreError, UnknownSizeUnit, UnknownStatus,
};
pub use store::{InMemoryJourneyStore, JourneyStore, PointerAdvance, StageWrite};
pub use types::{
    Document, DocumentId, EngagementId, Journey, LandAttributes, LandAttributesPatch, LandId,
    LandSizeUnit, NewDocument, ProfessionalId, StageRecord, StageStatus, StageStatusUpdate,
    TransactionId, UserId,
};
pub use view::{JourneySummary, JourneyView, StageView};

pub use landpath_catalog::{
    CatalogEntry, CatalogSnapshot, CostRange, DocumentType, ProfessionalRole, StageCatalog,
    StageId,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the journey engine
    pub use crate::{
        Directories, DocumentType, EngineConfig, InMemoryDirectory, InMemoryJourneyStore,
        JourneyEngine, JourneyError, JourneyView, LandAttributes, LandId, LandSizeUnit,
        NewDocument, StageId, StageStatus, StageStatusUpdate, UserId,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
