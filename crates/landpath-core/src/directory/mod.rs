//! Ports to external directories
//!
//! The engine reads three collaborators it does not own:
//! - [`TransactionDirectory`]: completed acquisitions and their listings
//! - [`EngagementDirectory`]: professional-service engagements
//! - [`ProfessionalDirectory`]: professionals searchable by role
//!
//! Implementations are injected as `Arc<dyn Trait>`; [`InMemoryDirectory`]
//! implements all three for demos and tests.

mod memory;

pub use memory::InMemoryDirectory;

use crate::error::DirectoryError;
use crate::types::{EngagementId, LandAttributes, LandSizeUnit, ProfessionalId, TransactionId, UserId};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use landpath_catalog::ProfessionalRole;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Lifecycle status of an acquisition transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Created, awaiting payment
    Pending,
    /// Buyer funds held in escrow
    InEscrow,
    /// Transfer completed
    Completed,
    /// Escrow released to the seller after completion
    FundsReleased,
    /// Under dispute
    Disputed,
    /// Cancelled before completion
    Cancelled,
    /// Buyer refunded
    Refunded,
}

impl TransactionStatus {
    /// Whether the status is in the closed "completed" set
    #[inline]
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, TransactionStatus::Completed | TransactionStatus::FundsReleased)
    }
}

/// Listing fields copied onto a land registered from a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingAttributes {
    /// Listing title
    pub title: String,
    /// Listing description
    pub description: Option<String>,
    /// Address or plot reference
    pub location: String,
    /// City
    pub city: Option<String>,
    /// State or region
    pub state: Option<String>,
    /// Size
    pub land_size: f64,
    /// Size unit
    pub land_size_unit: LandSizeUnit,
    /// Agreed price
    pub price: u64,
}

impl ListingAttributes {
    /// Land attributes derived from this listing
    #[must_use]
    pub fn to_land_attributes(&self, purchase_date: Option<NaiveDate>) -> LandAttributes {
        LandAttributes {
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            land_size: self.land_size,
            land_size_unit: self.land_size_unit,
            purchase_price: Some(self.price),
            purchase_date,
        }
    }
}

/// Acquisition transaction as seen by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInfo {
    /// Transaction id
    pub id: TransactionId,
    /// Buying user
    pub buyer_id: UserId,
    /// Current status
    pub status: TransactionStatus,
    /// When the transfer completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Listing the transaction was for
    pub listing: ListingAttributes,
}

/// Lifecycle status of an engagement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngagementStatus {
    /// Sent to the professional
    Requested,
    /// Accepted by the professional
    Accepted,
    /// Work underway
    InProgress,
    /// Deliverables handed over
    Delivered,
    /// Closed
    Completed,
    /// Withdrawn or declined
    Cancelled,
}

/// Professional-service engagement as seen by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementInfo {
    /// Engagement id
    pub id: EngagementId,
    /// Client who requested the service
    pub client_id: UserId,
    /// Assigned professional
    pub professional_id: ProfessionalId,
    /// Role the professional acts in
    pub role: ProfessionalRole,
    /// Current status
    pub status: EngagementStatus,
}

/// Directory listing of a professional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalSummary {
    /// Professional id
    pub id: ProfessionalId,
    /// Display name
    pub name: String,
    /// Role
    pub role: ProfessionalRole,
    /// Firm, if any
    pub firm: Option<String>,
    /// Average rating, 0-5
    pub rating: Option<f32>,
    /// Whether credentials were verified
    pub verified: bool,
}

/// Lookup of acquisition transactions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionDirectory: Send + Sync {
    /// Transaction by id, `None` if unknown
    async fn transaction(&self, id: TransactionId) -> Result<Option<TransactionInfo>, DirectoryError>;
}

/// Lookup of professional engagements
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementDirectory: Send + Sync {
    /// Engagement by id, `None` if unknown
    async fn engagement(&self, id: EngagementId) -> Result<Option<EngagementInfo>, DirectoryError>;
}

/// Search of professionals by role
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfessionalDirectory: Send + Sync {
    /// Up to `limit` professionals acting in `role`
    async fn professionals_by_role(
        &self,
        role: ProfessionalRole,
        limit: usize,
    ) -> Result<Vec<ProfessionalSummary>, DirectoryError>;
}

/// The three directories the engine depends on
#[derive(Clone)]
pub struct Directories {
    /// Transaction lookup
    pub transactions: Arc<dyn TransactionDirectory>,
    /// Engagement lookup
    pub engagements: Arc<dyn EngagementDirectory>,
    /// Professional search
    pub professionals: Arc<dyn ProfessionalDirectory>,
}

impl Directories {
    /// Use one implementation for all three ports
    #[must_use]
    pub fn uniform<T>(directory: Arc<T>) -> Self
    where
        T: TransactionDirectory + EngagementDirectory + ProfessionalDirectory + 'static,
    {
        Self {
            transactions: directory.clone(),
            engagements: directory.clone(),
            professionals: directory,
        }
    }
}

impl std::fmt::Debug for Directories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directories").finish_non_exhaustive()
    }
}
