//! Core types for the journey engine
//!
//! Defines the persisted entity set:
//! - Identifiers for lands, documents, users and external records
//! - Land attributes and the per-land journey record
//! - Stage records and their status set
//! - Documents attached to a stage

use crate::error::{UnknownSizeUnit, UnknownStatus};
use chrono::{DateTime, NaiveDate, Utc};
use landpath_catalog::{DocumentType, StageId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;
use uuid::Uuid;

macro_rules! ulid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Ulid);

        impl $name {
            /// Generate a new identifier
            #[inline]
            #[must_use]
            pub fn new() -> Self {
                Self(Ulid::new())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ulid::DecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ulid::from_string(s).map(Self)
            }
        }
    };
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a random identifier
            #[inline]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

ulid_id!(
    /// Land identifier (ULID for sortability)
    LandId
);

ulid_id!(
    /// Document identifier
    DocumentId
);

uuid_id!(
    /// Platform user identifier, issued by the identity service
    UserId
);

uuid_id!(
    /// Acquisition transaction identifier, issued by the payments service
    TransactionId
);

uuid_id!(
    /// Professional-service engagement identifier
    EngagementId
);

uuid_id!(
    /// Professional identifier in the professional directory
    ProfessionalId
);

/// Unit a land size is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LandSizeUnit {
    /// Square metres
    #[default]
    Sqm,
    /// Acres
    Acres,
    /// Hectares
    Hectares,
    /// Plots
    Plots,
}

impl LandSizeUnit {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LandSizeUnit::Sqm => "sqm",
            LandSizeUnit::Acres => "acres",
            LandSizeUnit::Hectares => "hectares",
            LandSizeUnit::Plots => "plots",
        }
    }
}

impl fmt::Display for LandSizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LandSizeUnit {
    type Err = UnknownSizeUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqm" | "m2" | "square_meters" => Ok(LandSizeUnit::Sqm),
            "acre" | "acres" => Ok(LandSizeUnit::Acres),
            "hectare" | "hectares" | "ha" => Ok(LandSizeUnit::Hectares),
            "plot" | "plots" => Ok(LandSizeUnit::Plots),
            _ => Err(UnknownSizeUnit(s.to_string())),
        }
    }
}

/// Descriptive attributes of a parcel of land
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandAttributes {
    /// Display title
    pub title: String,
    /// Free-text description
    pub description: Option<String>,
    /// Street address or plot reference
    pub location: String,
    /// City
    pub city: Option<String>,
    /// State or region
    pub state: Option<String>,
    /// Size in `land_size_unit`
    pub land_size: f64,
    /// Unit of `land_size`
    pub land_size_unit: LandSizeUnit,
    /// Price paid, in whole currency units
    pub purchase_price: Option<u64>,
    /// Date of purchase
    pub purchase_date: Option<NaiveDate>,
}

impl LandAttributes {
    /// Create attributes with the required fields
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        location: impl Into<String>,
        land_size: f64,
        land_size_unit: LandSizeUnit,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            location: location.into(),
            city: None,
            state: None,
            land_size,
            land_size_unit,
            purchase_price: None,
            purchase_date: None,
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With city and state
    #[inline]
    #[must_use]
    pub fn with_region(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self.state = Some(state.into());
        self
    }

    /// With purchase price and date
    #[inline]
    #[must_use]
    pub fn with_purchase(mut self, price: u64, date: Option<NaiveDate>) -> Self {
        self.purchase_price = Some(price);
        self.purchase_date = date;
        self
    }
}

/// Partial update of [`LandAttributes`]; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandAttributesPatch {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New location
    pub location: Option<String>,
    /// New city
    pub city: Option<String>,
    /// New state
    pub state: Option<String>,
    /// New size
    pub land_size: Option<f64>,
    /// New size unit
    pub land_size_unit: Option<LandSizeUnit>,
    /// New purchase price
    pub purchase_price: Option<u64>,
    /// New purchase date
    pub purchase_date: Option<NaiveDate>,
}

impl LandAttributesPatch {
    /// Whether the patch changes nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch in place
    pub fn apply(&self, attributes: &mut LandAttributes) {
        if let Some(title) = &self.title {
            attributes.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            attributes.description = Some(description.clone());
        }
        if let Some(location) = &self.location {
            attributes.location.clone_from(location);
        }
        if let Some(city) = &self.city {
            attributes.city = Some(city.clone());
        }
        if let Some(state) = &self.state {
            attributes.state = Some(state.clone());
        }
        if let Some(size) = self.land_size {
            attributes.land_size = size;
        }
        if let Some(unit) = self.land_size_unit {
            attributes.land_size_unit = unit;
        }
        if let Some(price) = self.purchase_price {
            attributes.purchase_price = Some(price);
        }
        if let Some(date) = self.purchase_date {
            attributes.purchase_date = Some(date);
        }
    }
}

/// Per-land journey record
///
/// `current_stage` only ever moves forward, and only through a committed
/// stage write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journey {
    /// Land identifier
    pub land_id: LandId,
    /// Owning user
    pub owner_id: UserId,
    /// Acquisition transaction the land was derived from
    pub transaction_id: Option<TransactionId>,
    /// Descriptive attributes
    pub attributes: LandAttributes,
    /// Current-stage pointer
    pub current_stage: StageId,
    /// Registration time
    pub created_at: DateTime<Utc>,
    /// Last change to attributes or pointer
    pub updated_at: DateTime<Utc>,
    /// Set once, when the pointer reaches the terminal stage
    pub completed_at: Option<DateTime<Utc>>,
}

impl Journey {
    /// Create a journey at the first stage
    #[must_use]
    pub fn new(
        owner_id: UserId,
        attributes: LandAttributes,
        transaction_id: Option<TransactionId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            land_id: LandId::new(),
            owner_id,
            transaction_id,
            attributes,
            current_stage: StageId::first(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Position of the current stage
    #[inline]
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_stage.index()
    }

    /// Whether `user` owns this land
    #[inline]
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == user
    }

    /// Whether the pointer has reached the terminal stage
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current_stage.is_terminal()
    }
}

/// Execution status of a stage record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageStatus {
    /// Explicitly marked as not started
    NotStarted,
    /// Being worked on
    InProgress,
    /// Waiting on an engaged professional
    PendingProfessional,
    /// Waiting on documents
    PendingDocuments,
    /// Waiting on an authority's approval
    PendingApproval,
    /// Done
    Completed,
    /// Deliberately bypassed
    Skipped,
}

impl StageStatus {
    /// Every status
    pub const ALL: [StageStatus; 7] = [
        StageStatus::NotStarted,
        StageStatus::InProgress,
        StageStatus::PendingProfessional,
        StageStatus::PendingDocuments,
        StageStatus::PendingApproval,
        StageStatus::Completed,
        StageStatus::Skipped,
    ];

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StageStatus::NotStarted => "NOT_STARTED",
            StageStatus::InProgress => "IN_PROGRESS",
            StageStatus::PendingProfessional => "PENDING_PROFESSIONAL",
            StageStatus::PendingDocuments => "PENDING_DOCUMENTS",
            StageStatus::PendingApproval => "PENDING_APPROVAL",
            StageStatus::Completed => "COMPLETED",
            StageStatus::Skipped => "SKIPPED",
        }
    }

    /// Whether the status is `COMPLETED`
    #[inline]
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, StageStatus::Completed)
    }

    /// Whether the stage is blocked on someone else
    #[inline]
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(
            self,
            StageStatus::PendingProfessional
                | StageStatus::PendingDocuments
                | StageStatus::PendingApproval
        )
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Execution state of one (land, stage) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    /// Land
    pub land_id: LandId,
    /// Stage
    pub stage: StageId,
    /// Status
    pub status: StageStatus,
    /// Free-text notes
    pub notes: Option<String>,
    /// Linked professional engagement
    pub engagement_id: Option<EngagementId>,
    /// Professional assigned to the linked engagement
    pub professional_id: Option<ProfessionalId>,
    /// Set iff `status` is `COMPLETED`
    pub completed_at: Option<DateTime<Utc>>,
    /// Last write
    pub updated_at: DateTime<Utc>,
}

impl StageRecord {
    /// Blank record for a pair that has never been touched
    #[must_use]
    pub fn new(land_id: LandId, stage: StageId, now: DateTime<Utc>) -> Self {
        Self {
            land_id,
            stage,
            status: StageStatus::NotStarted,
            notes: None,
            engagement_id: None,
            professional_id: None,
            completed_at: None,
            updated_at: now,
        }
    }

    /// The first-stage record every new land is seeded with
    #[must_use]
    pub fn seed(land_id: LandId, now: DateTime<Utc>) -> Self {
        Self {
            status: StageStatus::Completed,
            completed_at: Some(now),
            ..Self::new(land_id, StageId::first(), now)
        }
    }
}

/// Requested status change for a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageStatusUpdate {
    /// Target status
    pub status: StageStatus,
    /// Replacement notes; `None` keeps the existing notes
    pub notes: Option<String>,
    /// Engagement to link; `None` keeps the existing link
    pub engagement_id: Option<EngagementId>,
}

impl StageStatusUpdate {
    /// Update to a status
    #[inline]
    #[must_use]
    pub fn new(status: StageStatus) -> Self {
        Self {
            status,
            notes: None,
            engagement_id: None,
        }
    }

    /// Shorthand for a `COMPLETED` update
    #[inline]
    #[must_use]
    pub fn completed() -> Self {
        Self::new(StageStatus::Completed)
    }

    /// With notes
    #[inline]
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// With engagement link
    #[inline]
    #[must_use]
    pub fn with_engagement(mut self, engagement_id: EngagementId) -> Self {
        self.engagement_id = Some(engagement_id);
        self
    }
}

/// A document attached to a land
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier
    pub id: DocumentId,
    /// Owning land
    pub land_id: LandId,
    /// Stage the document belongs to
    pub stage: StageId,
    /// Classifier
    pub document_type: DocumentType,
    /// Display name
    pub name: String,
    /// Storage locator (URL)
    pub locator: String,
    /// Size in bytes
    pub size_bytes: Option<u64>,
    /// MIME type
    pub mime_type: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Upload time
    pub uploaded_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    /// Stage the document belongs to
    pub stage: StageId,
    /// Classifier
    pub document_type: DocumentType,
    /// Display name
    pub name: String,
    /// Storage locator (URL)
    pub locator: String,
    /// Size in bytes
    pub size_bytes: Option<u64>,
    /// MIME type
    pub mime_type: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
}

impl NewDocument {
    /// Document with the required fields
    #[must_use]
    pub fn new(
        stage: StageId,
        document_type: DocumentType,
        name: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            document_type,
            name: name.into(),
            locator: locator.into(),
            size_bytes: None,
            mime_type: None,
            notes: None,
        }
    }

    /// With size and MIME metadata
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, size_bytes: u64, mime_type: impl Into<String>) -> Self {
        self.size_bytes = Some(size_bytes);
        self.mime_type = Some(mime_type.into());
        self
    }

    /// With notes
    #[inline]
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Materialize into a stored document
    #[must_use]
    pub fn into_document(self, land_id: LandId, now: DateTime<Utc>) -> Document {
        Document {
            id: DocumentId::new(),
            land_id,
            stage: self.stage,
            document_type: self.document_type,
            name: self.name,
            locator: self.locator,
            size_bytes: self.size_bytes,
            mime_type: self.mime_type,
            notes: self.notes,
            uploaded_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn land_size_unit_parses_aliases() {
        assert_eq!("acres".parse::<LandSizeUnit>(), Ok(LandSizeUnit::Acres));
        assert_eq!("Acre".parse::<LandSizeUnit>(), Ok(LandSizeUnit::Acres));
        assert_eq!("ha".parse::<LandSizeUnit>(), Ok(LandSizeUnit::Hectares));
        assert_eq!(
            "furlongs".parse::<LandSizeUnit>(),
            Err(UnknownSizeUnit("furlongs".to_string()))
        );
    }

    #[test]
    fn seed_record_is_completed_first_stage() {
        let now = Utc::now();
        let record = StageRecord::seed(LandId::new(), now);
        assert_eq!(record.stage, StageId::LandAcquired);
        assert_eq!(record.status, StageStatus::Completed);
        assert_eq!(record.completed_at, Some(now));
    }

    #[test]
    fn new_journey_starts_at_first_stage() {
        let journey = Journey::new(
            UserId::new(),
            LandAttributes::new("Plot 4", "Lekki", 0.5, LandSizeUnit::Acres),
            None,
            Utc::now(),
        );
        assert_eq!(journey.current_stage, StageId::LandAcquired);
        assert_eq!(journey.current_index(), 0);
        assert!(!journey.is_complete());
        assert!(journey.completed_at.is_none());
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut attrs = LandAttributes::new("Plot 4", "Lekki", 0.5, LandSizeUnit::Acres);
        let patch = LandAttributesPatch {
            title: Some("Plot 4B".to_string()),
            land_size: Some(0.75),
            ..LandAttributesPatch::default()
        };
        assert!(!patch.is_empty());
        patch.apply(&mut attrs);
        assert_eq!(attrs.title, "Plot 4B");
        assert_eq!(attrs.location, "Lekki");
        assert!((attrs.land_size - 0.75).abs() < f64::EPSILON);
        assert_eq!(attrs.land_size_unit, LandSizeUnit::Acres);
        assert!(LandAttributesPatch::default().is_empty());
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(StageStatus::PendingProfessional.to_string(), "PENDING_PROFESSIONAL");
        assert_eq!("completed".parse::<StageStatus>(), Ok(StageStatus::Completed));
        assert!("DONE".parse::<StageStatus>().is_err());
        assert!(StageStatus::PendingApproval.is_pending());
        assert!(!StageStatus::Skipped.is_pending());
    }

    #[test]
    fn ids_roundtrip_through_strings() {
        let land = LandId::new();
        assert_eq!(land.to_string().parse::<LandId>().unwrap(), land);
        let user = UserId::new();
        assert_eq!(user.to_string().parse::<UserId>().unwrap(), user);
    }
}
