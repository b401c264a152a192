//! Stage identifiers, professional roles and document types
//!
//! All three are closed sets fixed at compile time. Wire names match the
//! serde representation so that `Display`, `FromStr` and JSON agree.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A milestone in the land acquisition journey
///
/// Declaration order is the journey order and is the only source of truth
/// for earlier/later comparisons, so `Ord` follows it too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageId {
    /// Land has been bought; every journey starts here
    LandAcquired,
    /// Official search at the land registry
    LandSearch,
    /// Perimeter survey and site plan
    SurveySitePlan,
    /// Deed of assignment drafted and executed
    DeedOfAssignment,
    /// Independent valuation of the parcel
    LandValuation,
    /// Governor's consent to the transfer
    GovernorsConsent,
    /// Title perfected and registered
    TitleRegistration,
    /// Geotechnical soil investigation
    SoilTest,
    /// Architectural drawings
    ArchitecturalDesign,
    /// Structural engineering design
    StructuralDesign,
    /// Mechanical, electrical and plumbing design
    MepDesign,
    /// Environmental impact assessment
    EnvironmentalImpact,
    /// Planning permit application filed
    PlanningApplication,
    /// Statutory permit fees paid
    PermitFees,
    /// Building permit issued
    BuildingPermit,
    /// Terminal stage: construction may begin
    ReadyToBuild,
}

impl StageId {
    /// Number of stages in the journey
    pub const COUNT: usize = 16;

    /// Every stage in journey order
    pub const ALL: [StageId; Self::COUNT] = [
        StageId::LandAcquired,
        StageId::LandSearch,
        StageId::SurveySitePlan,
        StageId::DeedOfAssignment,
        StageId::LandValuation,
        StageId::GovernorsConsent,
        StageId::TitleRegistration,
        StageId::SoilTest,
        StageId::ArchitecturalDesign,
        StageId::StructuralDesign,
        StageId::MepDesign,
        StageId::EnvironmentalImpact,
        StageId::PlanningApplication,
        StageId::PermitFees,
        StageId::BuildingPermit,
        StageId::ReadyToBuild,
    ];

    /// First stage of every journey
    #[inline]
    #[must_use]
    pub const fn first() -> Self {
        StageId::LandAcquired
    }

    /// Terminal stage of every journey
    #[inline]
    #[must_use]
    pub const fn terminal() -> Self {
        StageId::ReadyToBuild
    }

    /// Zero-based position in the journey order
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stage at a position, if the position is in range
    #[inline]
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The stage immediately after this one
    #[inline]
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// Whether this is the last stage of the journey
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, StageId::ReadyToBuild)
    }

    /// Wire name, e.g. `SURVEY_SITE_PLAN`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StageId::LandAcquired => "LAND_ACQUIRED",
            StageId::LandSearch => "LAND_SEARCH",
            StageId::SurveySitePlan => "SURVEY_SITE_PLAN",
            StageId::DeedOfAssignment => "DEED_OF_ASSIGNMENT",
            StageId::LandValuation => "LAND_VALUATION",
            StageId::GovernorsConsent => "GOVERNORS_CONSENT",
            StageId::TitleRegistration => "TITLE_REGISTRATION",
            StageId::SoilTest => "SOIL_TEST",
            StageId::ArchitecturalDesign => "ARCHITECTURAL_DESIGN",
            StageId::StructuralDesign => "STRUCTURAL_DESIGN",
            StageId::MepDesign => "MEP_DESIGN",
            StageId::EnvironmentalImpact => "ENVIRONMENTAL_IMPACT",
            StageId::PlanningApplication => "PLANNING_APPLICATION",
            StageId::PermitFees => "PERMIT_FEES",
            StageId::BuildingPermit => "BUILDING_PERMIT",
            StageId::ReadyToBuild => "READY_TO_BUILD",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::UnknownStage(s.to_string()))
    }
}

/// Professional a stage may need to engage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfessionalRole {
    /// Land surveyor
    Surveyor,
    /// Property lawyer
    Lawyer,
    /// Architect
    Architect,
    /// Civil, structural or services engineer
    Engineer,
    /// Estate valuer
    Valuer,
    /// Town planner
    Planner,
}

impl ProfessionalRole {
    /// Every role
    pub const ALL: [ProfessionalRole; 6] = [
        ProfessionalRole::Surveyor,
        ProfessionalRole::Lawyer,
        ProfessionalRole::Architect,
        ProfessionalRole::Engineer,
        ProfessionalRole::Valuer,
        ProfessionalRole::Planner,
    ];

    /// Wire name, e.g. `surveyor`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProfessionalRole::Surveyor => "surveyor",
            ProfessionalRole::Lawyer => "lawyer",
            ProfessionalRole::Architect => "architect",
            ProfessionalRole::Engineer => "engineer",
            ProfessionalRole::Valuer => "valuer",
            ProfessionalRole::Planner => "planner",
        }
    }
}

impl fmt::Display for ProfessionalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfessionalRole {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::UnknownRole(s.to_string()))
    }
}

/// Classifier for a document attached to a land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    /// Receipt for the land purchase
    PurchaseReceipt,
    /// Contract of sale
    SaleAgreement,
    /// Owner identification
    IdentityDocument,
    /// Land registry search report
    SearchReport,
    /// Registered survey plan
    SurveyPlan,
    /// Site plan
    SitePlan,
    /// Executed deed of assignment
    DeedOfAssignment,
    /// Valuation report
    ValuationReport,
    /// Application for governor's consent
    ConsentApplication,
    /// Governor's consent instrument
    GovernorsConsent,
    /// Certificate of occupancy
    CertificateOfOccupancy,
    /// Registered title document
    RegisteredTitle,
    /// Soil investigation report
    SoilTestReport,
    /// Architectural drawings
    ArchitecturalDrawings,
    /// Structural drawings and calculations
    StructuralDrawings,
    /// Mechanical, electrical and plumbing drawings
    MepDrawings,
    /// Environmental impact assessment report
    EnvironmentalImpactAssessment,
    /// Filed planning application
    PlanningApplication,
    /// Planning approval letter
    PlanningApproval,
    /// Receipt for statutory fees
    FeeReceipt,
    /// Building permit
    BuildingPermit,
    /// Photograph of the site
    SitePhoto,
    /// Anything else
    Other,
}

impl DocumentType {
    /// Every document type
    pub const ALL: [DocumentType; 23] = [
        DocumentType::PurchaseReceipt,
        DocumentType::SaleAgreement,
        DocumentType::IdentityDocument,
        DocumentType::SearchReport,
        DocumentType::SurveyPlan,
        DocumentType::SitePlan,
        DocumentType::DeedOfAssignment,
        DocumentType::ValuationReport,
        DocumentType::ConsentApplication,
        DocumentType::GovernorsConsent,
        DocumentType::CertificateOfOccupancy,
        DocumentType::RegisteredTitle,
        DocumentType::SoilTestReport,
        DocumentType::ArchitecturalDrawings,
        DocumentType::StructuralDrawings,
        DocumentType::MepDrawings,
        DocumentType::EnvironmentalImpactAssessment,
        DocumentType::PlanningApplication,
        DocumentType::PlanningApproval,
        DocumentType::FeeReceipt,
        DocumentType::BuildingPermit,
        DocumentType::SitePhoto,
        DocumentType::Other,
    ];

    /// Wire name, e.g. `SURVEY_PLAN`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DocumentType::PurchaseReceipt => "PURCHASE_RECEIPT",
            DocumentType::SaleAgreement => "SALE_AGREEMENT",
            DocumentType::IdentityDocument => "IDENTITY_DOCUMENT",
            DocumentType::SearchReport => "SEARCH_REPORT",
            DocumentType::SurveyPlan => "SURVEY_PLAN",
            DocumentType::SitePlan => "SITE_PLAN",
            DocumentType::DeedOfAssignment => "DEED_OF_ASSIGNMENT",
            DocumentType::ValuationReport => "VALUATION_REPORT",
            DocumentType::ConsentApplication => "CONSENT_APPLICATION",
            DocumentType::GovernorsConsent => "GOVERNORS_CONSENT",
            DocumentType::CertificateOfOccupancy => "CERTIFICATE_OF_OCCUPANCY",
            DocumentType::RegisteredTitle => "REGISTERED_TITLE",
            DocumentType::SoilTestReport => "SOIL_TEST_REPORT",
            DocumentType::ArchitecturalDrawings => "ARCHITECTURAL_DRAWINGS",
            DocumentType::StructuralDrawings => "STRUCTURAL_DRAWINGS",
            DocumentType::MepDrawings => "MEP_DRAWINGS",
            DocumentType::EnvironmentalImpactAssessment => "ENVIRONMENTAL_IMPACT_ASSESSMENT",
            DocumentType::PlanningApplication => "PLANNING_APPLICATION",
            DocumentType::PlanningApproval => "PLANNING_APPROVAL",
            DocumentType::FeeReceipt => "FEE_RECEIPT",
            DocumentType::BuildingPermit => "BUILDING_PERMIT",
            DocumentType::SitePhoto => "SITE_PHOTO",
            DocumentType::Other => "OTHER",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CatalogError::UnknownDocumentType(s.to_string()))
    }
}
