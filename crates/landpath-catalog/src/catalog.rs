//! The process-wide stage catalog
//!
//! Built once on first use and never mutated. Every stage has an entry by
//! construction: the table is produced by an exhaustive match over
//! [`StageId`], so [`StageCatalog::lookup`] has no failure case.

use crate::stage::{DocumentType, ProfessionalRole, StageId};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static GLOBAL: Lazy<StageCatalog> = Lazy::new(StageCatalog::build);

/// Estimated cost band for a stage, in whole currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostRange {
    /// Lower estimate
    pub min: u64,
    /// Upper estimate
    pub max: u64,
}

impl CostRange {
    /// Create a cost range; bounds are swapped if given out of order
    #[inline]
    #[must_use]
    pub const fn new(min: u64, max: u64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Whether an amount falls inside the band
    #[inline]
    #[must_use]
    pub const fn contains(&self, amount: u64) -> bool {
        amount >= self.min && amount <= self.max
    }
}

/// Display metadata and prerequisites for one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stage this entry describes
    pub stage: StageId,
    /// Human-readable name
    pub name: String,
    /// What the stage involves
    pub description: String,
    /// Professional that must be engaged, absent for administrative stages
    pub required_role: Option<ProfessionalRole>,
    /// Documents expected before the stage can be worked
    pub input_documents: Vec<DocumentType>,
    /// Documents the stage is expected to produce
    pub output_documents: Vec<DocumentType>,
    /// Typical duration in days
    pub estimated_days: u32,
    /// Typical cost band
    pub estimated_cost: Option<CostRange>,
}

impl CatalogEntry {
    /// Whether the stage needs a professional engagement
    #[inline]
    #[must_use]
    pub fn requires_professional(&self) -> bool {
        self.required_role.is_some()
    }

    /// Whether a document type is listed as an input or output of this stage
    ///
    /// Advisory only; the document ledger does not enforce it.
    #[must_use]
    pub fn lists_document(&self, kind: DocumentType) -> bool {
        self.input_documents.contains(&kind) || self.output_documents.contains(&kind)
    }
}

/// Serializable copy of the catalog: ordered ids plus entries keyed by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Stage ids in journey order
    pub ordered_stages: Vec<StageId>,
    /// Entries keyed by id, in journey order
    pub entries: IndexMap<StageId, CatalogEntry>,
}

/// Read-only stage catalog
#[derive(Debug)]
pub struct StageCatalog {
    entries: [CatalogEntry; StageId::COUNT],
}

impl StageCatalog {
    /// The process-wide catalog
    #[inline]
    #[must_use]
    pub fn global() -> &'static StageCatalog {
        &GLOBAL
    }

    fn build() -> Self {
        Self {
            entries: StageId::ALL.map(entry_for),
        }
    }

    /// Entry for a stage
    #[inline]
    #[must_use]
    pub fn lookup(&self, stage: StageId) -> &CatalogEntry {
        &self.entries[stage.index()]
    }

    /// Stage ids in journey order
    #[inline]
    #[must_use]
    pub fn ordered_stages(&self) -> &'static [StageId] {
        &StageId::ALL
    }

    /// Entries in journey order
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Number of stages
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no stages
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Role a stage requires, if any
    #[inline]
    #[must_use]
    pub fn role_for(&self, stage: StageId) -> Option<ProfessionalRole> {
        self.lookup(stage).required_role
    }

    /// Stages that require a given role, in journey order
    #[must_use]
    pub fn stages_requiring(&self, role: ProfessionalRole) -> Vec<StageId> {
        self.entries()
            .filter(|e| e.required_role == Some(role))
            .map(|e| e.stage)
            .collect()
    }

    /// Sum of estimated days over the whole journey
    #[must_use]
    pub fn total_estimated_days(&self) -> u32 {
        self.entries().map(|e| e.estimated_days).sum()
    }

    /// Estimated days left when `from` is the current stage (inclusive)
    #[must_use]
    pub fn estimated_days_remaining(&self, from: StageId) -> u32 {
        self.entries[from.index()..]
            .iter()
            .map(|e| e.estimated_days)
            .sum()
    }

    /// Serializable copy for callers
    #[must_use]
    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            ordered_stages: self.ordered_stages().to_vec(),
            entries: self.entries().map(|e| (e.stage, e.clone())).collect(),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn entry(
    stage: StageId,
    name: &str,
    description: &str,
    required_role: Option<ProfessionalRole>,
    input_documents: &[DocumentType],
    output_documents: &[DocumentType],
    estimated_days: u32,
    estimated_cost: Option<CostRange>,
) -> CatalogEntry {
    CatalogEntry {
        stage,
        name: name.to_string(),
        description: description.to_string(),
        required_role,
        input_documents: input_documents.to_vec(),
        output_documents: output_documents.to_vec(),
        estimated_days,
        estimated_cost,
    }
}

fn entry_for(stage: StageId) -> CatalogEntry {
    use DocumentType as D;
    use ProfessionalRole as R;

    match stage {
        StageId::LandAcquired => entry(
            stage,
            "Land Acquired",
            "The parcel has been purchased and is registered to the owner.",
            None,
            &[],
            &[D::PurchaseReceipt, D::SaleAgreement],
            0,
            None,
        ),
        StageId::LandSearch => entry(
            stage,
            "Land Search",
            "Official search at the land registry to confirm ownership history and encumbrances.",
            Some(R::Lawyer),
            &[D::SaleAgreement, D::IdentityDocument],
            &[D::SearchReport],
            7,
            Some(CostRange::new(50_000, 150_000)),
        ),
        StageId::SurveySitePlan => entry(
            stage,
            "Survey & Site Plan",
            "A registered surveyor fixes the beacons and produces the survey and site plans.",
            Some(R::Surveyor),
            &[D::SaleAgreement],
            &[D::SurveyPlan, D::SitePlan],
            21,
            Some(CostRange::new(250_000, 800_000)),
        ),
        StageId::DeedOfAssignment => entry(
            stage,
            "Deed of Assignment",
            "The deed transferring the seller's interest is drafted, executed and stamped.",
            Some(R::Lawyer),
            &[D::SearchReport, D::SurveyPlan],
            &[D::DeedOfAssignment],
            14,
            Some(CostRange::new(200_000, 600_000)),
        ),
        StageId::LandValuation => entry(
            stage,
            "Land Valuation",
            "An estate valuer assesses the market value used for consent and registration fees.",
            Some(R::Valuer),
            &[D::SurveyPlan, D::DeedOfAssignment],
            &[D::ValuationReport],
            10,
            Some(CostRange::new(100_000, 300_000)),
        ),
        StageId::GovernorsConsent => entry(
            stage,
            "Governor's Consent",
            "Application for state consent to the transfer of interest in the land.",
            Some(R::Lawyer),
            &[D::DeedOfAssignment, D::SurveyPlan, D::ValuationReport],
            &[D::ConsentApplication, D::GovernorsConsent],
            90,
            Some(CostRange::new(500_000, 2_500_000)),
        ),
        StageId::TitleRegistration => entry(
            stage,
            "Title Registration",
            "The consented deed is registered and the title perfected in the owner's name.",
            Some(R::Lawyer),
            &[D::GovernorsConsent, D::DeedOfAssignment],
            &[D::RegisteredTitle, D::CertificateOfOccupancy],
            60,
            Some(CostRange::new(300_000, 1_500_000)),
        ),
        StageId::SoilTest => entry(
            stage,
            "Soil Test",
            "Geotechnical investigation of bearing capacity and water table.",
            Some(R::Engineer),
            &[D::SitePlan],
            &[D::SoilTestReport],
            14,
            Some(CostRange::new(150_000, 500_000)),
        ),
        StageId::ArchitecturalDesign => entry(
            stage,
            "Architectural Design",
            "Floor plans, elevations and sections prepared by a registered architect.",
            Some(R::Architect),
            &[D::SitePlan, D::SurveyPlan],
            &[D::ArchitecturalDrawings],
            30,
            Some(CostRange::new(500_000, 3_000_000)),
        ),
        StageId::StructuralDesign => entry(
            stage,
            "Structural Design",
            "Structural drawings and calculations based on the architecture and soil report.",
            Some(R::Engineer),
            &[D::ArchitecturalDrawings, D::SoilTestReport],
            &[D::StructuralDrawings],
            21,
            Some(CostRange::new(400_000, 2_000_000)),
        ),
        StageId::MepDesign => entry(
            stage,
            "MEP Design",
            "Mechanical, electrical and plumbing services design.",
            Some(R::Engineer),
            &[D::ArchitecturalDrawings],
            &[D::MepDrawings],
            21,
            Some(CostRange::new(300_000, 1_500_000)),
        ),
        StageId::EnvironmentalImpact => entry(
            stage,
            "Environmental Impact Assessment",
            "Assessment of the development's environmental effects where required by the planning authority.",
            Some(R::Planner),
            &[D::SitePlan, D::ArchitecturalDrawings],
            &[D::EnvironmentalImpactAssessment],
            30,
            Some(CostRange::new(200_000, 1_000_000)),
        ),
        StageId::PlanningApplication => entry(
            stage,
            "Planning Application",
            "The permit application and drawings are filed with the planning authority.",
            Some(R::Planner),
            &[
                D::RegisteredTitle,
                D::SurveyPlan,
                D::ArchitecturalDrawings,
                D::StructuralDrawings,
                D::MepDrawings,
                D::SoilTestReport,
            ],
            &[D::PlanningApplication],
            14,
            Some(CostRange::new(100_000, 500_000)),
        ),
        StageId::PermitFees => entry(
            stage,
            "Permit Fees",
            "Assessed statutory fees are paid to the planning authority.",
            None,
            &[D::PlanningApplication],
            &[D::FeeReceipt],
            7,
            Some(CostRange::new(200_000, 2_000_000)),
        ),
        StageId::BuildingPermit => entry(
            stage,
            "Building Permit",
            "The planning authority approves the drawings and issues the building permit.",
            Some(R::Planner),
            &[D::PlanningApplication, D::FeeReceipt],
            &[D::PlanningApproval, D::BuildingPermit],
            60,
            None,
        ),
        StageId::ReadyToBuild => entry(
            stage,
            "Ready to Build",
            "All approvals are in place; construction may begin.",
            None,
            &[D::BuildingPermit],
            &[],
            0,
            None,
        ),
    }
}
