//! Journey read models
//!
//! Everything here is derived on read. Persisted stage records are sparse;
//! missing ones are synthesized from the current-stage pointer and never
//! written back.

use crate::directory::EngagementInfo;
use crate::types::{Document, EngagementId, Journey, LandId, StageRecord, StageStatus};
use chrono::{DateTime, Utc};
use landpath_catalog::{CatalogEntry, StageCatalog, StageId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Progress through the journey as a whole percentage
///
/// Position-based: `round(current_index / (total - 1) * 100)`, halves
/// rounding up. Estimated durations and costs do not weigh in.
#[must_use]
pub fn progress_percent(current_index: usize, total_stages: usize) -> u8 {
    if total_stages <= 1 {
        return 100;
    }
    let last = total_stages - 1;
    let index = current_index.min(last);
    let rounded = (index * 200 + last) / (last * 2);
    u8::try_from(rounded).unwrap_or(100)
}

/// Whether the stage at `index` is locked
///
/// Only the current stage and the one after it are workable.
#[inline]
#[must_use]
pub fn is_locked(index: usize, current_index: usize) -> bool {
    index > current_index + 1
}

/// Status shown for a stage
///
/// A persisted record is authoritative. Otherwise stages behind the pointer
/// read as completed, the current one as in progress, the rest not started.
#[must_use]
pub fn synthesize_status(
    index: usize,
    current_index: usize,
    record: Option<&StageRecord>,
) -> StageStatus {
    match record {
        Some(record) => record.status,
        None if index < current_index => StageStatus::Completed,
        None if index == current_index => StageStatus::InProgress,
        None => StageStatus::NotStarted,
    }
}

/// One stage as rendered in a journey view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageView {
    /// Stage id
    pub stage: StageId,
    /// Position in the journey
    pub index: usize,
    /// Catalog metadata
    pub entry: CatalogEntry,
    /// Persisted or synthesized status
    pub status: StageStatus,
    /// Whether this is the land's current stage
    pub is_current: bool,
    /// Whether the stage is beyond the next workable one
    pub is_locked: bool,
    /// Whether `status` is `COMPLETED`
    pub is_completed: bool,
    /// Persisted record, if the pair was ever written
    pub record: Option<StageRecord>,
    /// Engagement linked by the record, when the directory knows it
    pub engagement: Option<EngagementInfo>,
    /// Documents attached to this stage
    pub documents: Vec<Document>,
}

/// Full journey view for one land
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyView {
    /// Journey record
    pub journey: Journey,
    /// Position of the current stage
    pub current_index: usize,
    /// Number of stages
    pub total_stages: usize,
    /// Position-based progress, 0-100
    pub progress: u8,
    /// Every stage in journey order
    pub stages: Vec<StageView>,
}

impl JourneyView {
    /// The current stage
    #[must_use]
    pub fn current(&self) -> &StageView {
        &self.stages[self.current_index]
    }

    /// View of a specific stage
    #[must_use]
    pub fn stage(&self, stage: StageId) -> &StageView {
        &self.stages[stage.index()]
    }

    /// Stages that may be worked on now
    #[must_use]
    pub fn unlocked_stages(&self) -> Vec<StageId> {
        self.stages
            .iter()
            .filter(|s| !s.is_locked)
            .map(|s| s.stage)
            .collect()
    }

    /// Stages that may not be worked on yet
    #[must_use]
    pub fn locked_stages(&self) -> Vec<StageId> {
        self.stages
            .iter()
            .filter(|s| s.is_locked)
            .map(|s| s.stage)
            .collect()
    }

    /// Total documents across all stages
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.stages.iter().map(|s| s.documents.len()).sum()
    }
}

/// Assemble the journey view from its parts
///
/// Records and documents belonging to other lands are ignored.
#[must_use]
pub fn assemble(
    catalog: &StageCatalog,
    journey: Journey,
    records: Vec<StageRecord>,
    documents: Vec<Document>,
    engagements: &HashMap<EngagementId, EngagementInfo>,
) -> JourneyView {
    let land_id = journey.land_id;
    let current_index = journey.current_index();
    let total_stages = catalog.len();

    let mut records: HashMap<StageId, StageRecord> = records
        .into_iter()
        .filter(|r| r.land_id == land_id)
        .map(|r| (r.stage, r))
        .collect();
    let mut by_stage: HashMap<StageId, Vec<Document>> = HashMap::new();
    for document in documents.into_iter().filter(|d| d.land_id == land_id) {
        by_stage.entry(document.stage).or_default().push(document);
    }

    let stages = catalog
        .ordered_stages()
        .iter()
        .enumerate()
        .map(|(index, &stage)| {
            let record = records.remove(&stage);
            let status = synthesize_status(index, current_index, record.as_ref());
            let engagement = record
                .as_ref()
                .and_then(|r| r.engagement_id)
                .and_then(|id| engagements.get(&id).cloned());
            StageView {
                stage,
                index,
                entry: catalog.lookup(stage).clone(),
                status,
                is_current: index == current_index,
                is_locked: is_locked(index, current_index),
                is_completed: status.is_completed(),
                record,
                engagement,
                documents: by_stage.remove(&stage).unwrap_or_default(),
            }
        })
        .collect();

    JourneyView {
        journey,
        current_index,
        total_stages,
        progress: progress_percent(current_index, total_stages),
        stages,
    }
}

/// Compact journey listing for an owner's dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneySummary {
    /// Land id
    pub land_id: LandId,
    /// Land title
    pub title: String,
    /// Land location
    pub location: String,
    /// Current stage
    pub current_stage: StageId,
    /// Display name of the current stage
    pub current_stage_name: String,
    /// Position of the current stage
    pub current_index: usize,
    /// Number of stages
    pub total_stages: usize,
    /// Position-based progress, 0-100
    pub progress: u8,
    /// Stage after the current one
    pub next_stage: Option<StageId>,
    /// Estimated days left from the current stage
    pub estimated_days_remaining: u32,
    /// Registration time
    pub created_at: DateTime<Utc>,
    /// Journey completion time
    pub completed_at: Option<DateTime<Utc>>,
}

/// Summarize a journey without touching its records
#[must_use]
pub fn summarize(catalog: &StageCatalog, journey: &Journey) -> JourneySummary {
    let current_index = journey.current_index();
    let total_stages = catalog.len();
    JourneySummary {
        land_id: journey.land_id,
        title: journey.attributes.title.clone(),
        location: journey.attributes.location.clone(),
        current_stage: journey.current_stage,
        current_stage_name: catalog.lookup(journey.current_stage).name.clone(),
        current_index,
        total_stages,
        progress: progress_percent(current_index, total_stages),
        next_stage: journey.current_stage.next(),
        estimated_days_remaining: if journey.is_complete() {
            0
        } else {
            catalog.estimated_days_remaining(journey.current_stage)
        },
        created_at: journey.created_at,
        completed_at: journey.completed_at,
    }
}
