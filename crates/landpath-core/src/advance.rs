//! Stage advancement planning
//!
//! Pure planners for the two stage mutations. They decide what to write and
//! whether the current-stage pointer moves; the engine commits the result
//! through one store call while holding the land's lock.

use crate::directory::EngagementInfo;
use crate::error::JourneyError;
use crate::store::{PointerAdvance, StageWrite};
use crate::types::{Journey, LandId, ProfessionalId, StageRecord, StageStatus, StageStatusUpdate};
use chrono::{DateTime, Utc};
use landpath_catalog::StageId;

/// Reject stages beyond the one after the current stage
///
/// # Errors
/// `JourneyError::InvalidTransition` when `stage` is locked.
pub fn check_unlocked(journey: &Journey, stage: StageId) -> Result<(), JourneyError> {
    if crate::view::is_locked(stage.index(), journey.current_index()) {
        return Err(JourneyError::InvalidTransition {
            stage,
            current: journey.current_stage,
        });
    }
    Ok(())
}

/// Pointer movement caused by setting `stage` to `status`
///
/// Completing the current stage, or the unlocked one after it, moves the
/// pointer to the stage following `stage` when one exists. Completing a
/// stage the pointer has already passed moves nothing.
#[must_use]
pub fn pointer_advance(
    journey: &Journey,
    stage: StageId,
    status: StageStatus,
    now: DateTime<Utc>,
) -> Option<PointerAdvance> {
    if !status.is_completed() || stage.index() < journey.current_index() {
        return None;
    }
    let next = stage.next()?;
    Some(PointerAdvance {
        from: journey.current_stage,
        to: next,
        completed_at: next.is_terminal().then_some(now),
    })
}

/// Plan a status change for `(journey, stage)`
///
/// `professional` is the assigned professional of the engagement named in
/// `update`, already resolved by the caller. Without a new engagement the
/// existing link and professional are kept; without notes the existing
/// notes are kept.
///
/// # Errors
/// `JourneyError::InvalidTransition` when `stage` is locked. Nothing is
/// planned in that case.
pub fn plan_stage_write(
    journey: &Journey,
    stage: StageId,
    update: &StageStatusUpdate,
    existing: Option<&StageRecord>,
    professional: Option<ProfessionalId>,
    now: DateTime<Utc>,
) -> Result<StageWrite, JourneyError> {
    check_unlocked(journey, stage)?;

    let mut record = existing
        .cloned()
        .unwrap_or_else(|| StageRecord::new(journey.land_id, stage, now));
    record.status = update.status;
    if let Some(notes) = &update.notes {
        record.notes = Some(notes.clone());
    }
    if let Some(engagement_id) = update.engagement_id {
        record.engagement_id = Some(engagement_id);
        record.professional_id = professional;
    }
    record.completed_at = update.status.is_completed().then_some(now);
    record.updated_at = now;

    Ok(StageWrite {
        advance: pointer_advance(journey, stage, update.status, now),
        record,
    })
}

/// Plan linking an engagement to `(land_id, stage)`
///
/// The record moves to `PENDING_PROFESSIONAL` and takes the engagement's
/// professional. Notes survive; a completion time does not.
#[must_use]
pub fn plan_engagement_link(
    existing: Option<&StageRecord>,
    land_id: LandId,
    stage: StageId,
    engagement: &EngagementInfo,
    now: DateTime<Utc>,
) -> StageRecord {
    let mut record = existing
        .cloned()
        .unwrap_or_else(|| StageRecord::new(land_id, stage, now));
    record.status = StageStatus::PendingProfessional;
    record.engagement_id = Some(engagement.id);
    record.professional_id = Some(engagement.professional_id);
    record.completed_at = None;
    record.updated_at = now;
    record
}
