//! Landpath Stage Catalog
//!
//! The fixed, ordered table of the sixteen milestones a parcel of land moves
//! through, from acquisition to a building permit.
//!
//! # Core Concepts
//!
//! - [`StageId`]: Closed enumeration of stages; its declaration order is the
//!   journey order
//! - [`ProfessionalRole`]: Roles a stage may require (surveyor, lawyer, ...)
//! - [`DocumentType`]: Classifier for documents attached to a stage
//! - [`StageCatalog`]: Process-wide, read-only lookup table
//!
//! # Example
//!
//! ```rust
//! use landpath_catalog::{StageCatalog, StageId, ProfessionalRole};
//!
//! let catalog = StageCatalog::global();
//! assert_eq!(catalog.ordered_stages().len(), 16);
//!
//! let entry = catalog.lookup(StageId::SurveySitePlan);
//! assert_eq!(entry.required_role, Some(ProfessionalRole::Surveyor));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod catalog;
mod error;
mod stage;

// Re-exports
pub use catalog::{CatalogEntry, CatalogSnapshot, CostRange, StageCatalog};
pub use error::CatalogError;
pub use stage::{DocumentType, ProfessionalRole, StageId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
