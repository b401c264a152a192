//! Journey invariants under concurrent and arbitrary operation sequences.
//!
//! - The pointer never moves backwards and only moves past a completed stage
//! - Concurrent completions of the same stage advance the pointer once
//! - Every rendered view obeys the lock rule and the progress bounds

use landpath_core::{StageId, StageStatus, StageStatusUpdate};
use landpath_test_utils::TestHarness;
use proptest::prelude::*;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_completions_advance_once() {
    let h = Arc::new(TestHarness::new());
    let land = h.register_land().await.land_id;

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let h = Arc::clone(&h);
        tasks.push(tokio::spawn(async move {
            h.engine
                .set_stage_status(land, StageId::LandAcquired, h.owner, StageStatusUpdate::completed())
                .await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(h.journey(land).await.current_stage, StageId::LandSearch);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn lands_progress_independently() {
    let h = Arc::new(TestHarness::new());
    let mut lands = Vec::new();
    for _ in 0..4 {
        lands.push(h.register_land().await.land_id);
    }

    let mut tasks = Vec::new();
    for (i, &land) in lands.iter().enumerate() {
        let h = Arc::clone(&h);
        tasks.push(tokio::spawn(async move {
            for _ in 0..=i {
                h.complete_current(land).await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    for (i, &land) in lands.iter().enumerate() {
        assert_eq!(h.journey(land).await.current_index(), i + 1);
    }
}

fn operation() -> impl Strategy<Value = (usize, StageStatus)> {
    (
        0usize..StageId::COUNT,
        prop::sample::select(StageStatus::ALL.to_vec()),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_arbitrary_updates_keep_invariants(ops in prop::collection::vec(operation(), 1..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let h = TestHarness::new();
            let land = h.register_land().await.land_id;
            let mut previous = 0usize;

            for (target, status) in ops {
                let stage = StageId::from_index(target).unwrap();
                let result = h
                    .engine
                    .set_stage_status(land, stage, h.owner, StageStatusUpdate::new(status))
                    .await;
                prop_assert_eq!(result.is_err(), target > previous + 1);

                let view = h.engine.journey_detail(land, h.owner).await.unwrap();
                let current = view.current_index;
                let advanced = status.is_completed() && target >= previous && target + 1 < StageId::COUNT;
                prop_assert_eq!(current, if advanced { target + 1 } else { previous });

                prop_assert!(view.progress <= 100);
                prop_assert_eq!(view.progress == 100, current == StageId::COUNT - 1);
                prop_assert_eq!(view.journey.completed_at.is_some(), current == StageId::COUNT - 1);
                for stage in &view.stages {
                    prop_assert_eq!(stage.is_locked, stage.index > current + 1);
                }
                previous = current;
            }
            Ok(())
        })?;
    }
}
