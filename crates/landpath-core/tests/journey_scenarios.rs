//! End-to-end journey scenarios over the in-memory store.
//!
//! Covers registration seeding, the lock rule, pointer advancement and its
//! idempotence, transaction linking and engagement ownership.

use landpath_core::{
    JourneyError, LandSizeUnit, ProfessionalRole, Resource, StageId, StageStatus,
    StageStatusUpdate, UserId,
};
use landpath_test_utils::TestHarness;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn manual_registration_starts_at_first_stage() {
    let h = TestHarness::new();
    let journey = h.register_land().await;
    assert!((journey.attributes.land_size - 0.5).abs() < f64::EPSILON);
    assert_eq!(journey.attributes.land_size_unit, LandSizeUnit::Acres);

    let view = h.engine.journey_detail(journey.land_id, h.owner).await.unwrap();
    assert_eq!(view.journey.current_stage, StageId::LandAcquired);
    assert_eq!(view.progress, 0);
    assert_eq!(view.stages[0].status, StageStatus::Completed);
    assert!(view.stages[0].record.is_some());
    assert!(!view.stages[1].is_locked);
    assert!(view.stages[2..].iter().all(|s| s.is_locked));
    assert_eq!(h.store.record_count(), 1);
}

#[tokio::test]
async fn completing_next_stage_moves_pointer_past_it() {
    let h = TestHarness::new();
    let land = h.register_land().await.land_id;

    h.engine
        .set_stage_status(land, StageId::LandSearch, h.owner, StageStatusUpdate::completed())
        .await
        .unwrap();

    let view = h.engine.journey_detail(land, h.owner).await.unwrap();
    assert_eq!(view.journey.current_stage, StageId::SurveySitePlan);
    assert_eq!(view.current_index, 2);
    assert_eq!(view.progress, 13);
    assert_eq!(view.stage(StageId::LandSearch).status, StageStatus::Completed);
    assert!(!view.stage(StageId::DeedOfAssignment).is_locked);
    assert!(view.stage(StageId::LandValuation).is_locked);
}

#[tokio::test]
async fn completing_current_stages_advances_pointer() {
    let h = TestHarness::new();
    let land = h.register_land().await.land_id;

    h.complete_current(land).await;
    assert_eq!(h.journey(land).await.current_stage, StageId::LandSearch);
    h.complete_current(land).await;

    let view = h.engine.journey_detail(land, h.owner).await.unwrap();
    assert_eq!(view.journey.current_stage, StageId::SurveySitePlan);
    assert_eq!(view.progress, 13);
}

#[tokio::test]
async fn stage_beyond_next_is_locked() {
    let h = TestHarness::new();
    let land = h.register_land().await.land_id;
    h.engine
        .set_stage_status(land, StageId::LandSearch, h.owner, StageStatusUpdate::completed())
        .await
        .unwrap();

    let err = h
        .engine
        .set_stage_status(
            land,
            StageId::TitleRegistration,
            h.owner,
            StageStatusUpdate::completed(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        JourneyError::InvalidTransition {
            stage: StageId::TitleRegistration,
            current: StageId::SurveySitePlan
        }
    ));

    // Nothing was written
    let view = h.engine.journey_detail(land, h.owner).await.unwrap();
    assert!(view.stage(StageId::TitleRegistration).record.is_none());
    assert_eq!(view.journey.current_stage, StageId::SurveySitePlan);
}

#[tokio::test]
async fn recompleting_a_passed_stage_does_not_advance() {
    let h = TestHarness::new();
    let land = h.register_land().await.land_id;
    h.complete_current(land).await;

    let record = h
        .engine
        .set_stage_status(
            land,
            StageId::LandAcquired,
            h.owner,
            StageStatusUpdate::completed().with_notes("receipt re-filed"),
        )
        .await
        .unwrap();
    assert_eq!(record.notes.as_deref(), Some("receipt re-filed"));
    assert_eq!(h.journey(land).await.current_stage, StageId::LandSearch);
}

#[tokio::test]
async fn transaction_links_only_once() {
    let h = TestHarness::new();
    let transaction = h.add_completed_transaction(h.owner);

    let journey = h
        .engine
        .register_from_transaction(h.owner, transaction.id)
        .await
        .unwrap();
    assert_eq!(journey.transaction_id, Some(transaction.id));

    let err = h
        .engine
        .register_from_transaction(h.owner, transaction.id)
        .await
        .unwrap_err();
    assert!(matches!(&err, JourneyError::InvalidState(msg) if msg.contains("already linked")));
    assert_eq!(h.store.land_count(), 1);
}

#[tokio::test]
async fn foreign_engagement_cannot_be_linked() {
    let h = TestHarness::new();
    let land = h.register_land().await.land_id;
    let engagement = h.add_engagement(UserId::new(), ProfessionalRole::Surveyor);

    let err = h
        .engine
        .link_engagement(land, StageId::SurveySitePlan, engagement.id, h.owner)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        JourneyError::Forbidden {
            resource: Resource::Engagement,
            ..
        }
    ));
    assert!(h
        .engine
        .journey_detail(land, h.owner)
        .await
        .unwrap()
        .stage(StageId::SurveySitePlan)
        .record
        .is_none());
}

#[tokio::test]
async fn full_walk_reaches_ready_to_build() {
    let h = TestHarness::new();
    let land = h.register_land().await.land_id;

    for step in 1..StageId::COUNT {
        h.complete_current(land).await;
        let journey = h.journey(land).await;
        assert_eq!(journey.current_index(), step);
        assert_eq!(journey.completed_at.is_some(), step == StageId::COUNT - 1);
    }

    let view = h.engine.journey_detail(land, h.owner).await.unwrap();
    let completed_at = view.journey.completed_at;
    assert_eq!(view.journey.current_stage, StageId::ReadyToBuild);
    assert_eq!(view.progress, 100);
    assert!(completed_at.is_some());

    // Completing the terminal stage is allowed but changes nothing
    h.complete_current(land).await;
    let journey = h.journey(land).await;
    assert_eq!(journey.current_stage, StageId::ReadyToBuild);
    assert_eq!(journey.completed_at, completed_at);
}

#[tokio::test]
async fn owner_summaries_are_newest_first() {
    let h = TestHarness::new();
    let first = h.register_land().await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = h.register_land().await;
    h.complete_current(second.land_id).await;
    h.engine.register_manually(UserId::new(), landpath_test_utils::sample_attributes()).await.unwrap();

    let summaries = h.engine.journeys_for_owner(h.owner).await.unwrap();
    let ids: Vec<_> = summaries.iter().map(|s| s.land_id).collect();
    assert_eq!(ids, vec![second.land_id, first.land_id]);
    assert_eq!(summaries[0].current_stage, StageId::LandSearch);
    assert_eq!(summaries[0].progress, 7);
    assert_eq!(summaries[0].next_stage, Some(StageId::SurveySitePlan));
}
