mod common;

use std::sync::Arc;

use common::slot;
use enrollsync_core::{
    errors::EnrollError,
    scheduling::capacity::{admit, can_admit, release, CapacityInfo},
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tokio::sync::Mutex;

#[rstest]
#[case(0, 3, true)]
#[case(2, 3, true)]
#[case(3, 3, false)]
#[case(4, 3, false)]
#[case(0, 0, false)]
fn test_can_admit(#[case] current: u32, #[case] max: u32, #[case] expected: bool) {
    let mut s = slot("2026-10-21", "09:00", "10:00");
    s.current_capacity = current;
    s.max_capacity = max;
    assert_eq!(can_admit(&s), expected);
}

#[test]
fn test_admit_increments_and_refuses_when_full() {
    let mut s = slot("2026-10-21", "09:00", "10:00");
    s.max_capacity = 1;

    let admitted = admit(&s).expect("first seat is free");
    assert_eq!(admitted.current_capacity, 1);

    match admit(&admitted) {
        Err(EnrollError::CapacityExceeded { slot_id, current, max }) => {
            assert_eq!(slot_id, s.slot_id);
            assert_eq!((current, max), (1, 1));
        }
        other => panic!("Expected CapacityExceeded, got: {:?}", other),
    }
    assert_eq!(admitted.current_capacity, 1);
}

#[test]
fn test_release_saturates_at_zero() {
    let mut s = slot("2026-10-21", "09:00", "10:00");
    s.current_capacity = 1;

    let released = release(&s);
    assert_eq!(released.current_capacity, 0);
    assert_eq!(release(&released).current_capacity, 0);
}

#[test]
fn test_capacity_info() {
    let mut s = slot("2026-10-21", "09:00", "10:00");
    s.current_capacity = 3;

    assert_eq!(
        CapacityInfo::from(&s),
        CapacityInfo {
            max_students: 3,
            current_enrollments: 3,
            available_spots: 0,
            is_at_capacity: true,
        }
    );
}

#[tokio::test]
async fn test_concurrent_admissions_against_serialized_store() {
    let store = Arc::new(Mutex::new(slot("2026-10-21", "09:00", "10:00")));

    let attempts: Vec<_> = (0..5)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                // Check and write under one lock, like a conditional UPDATE.
                let mut current = store.lock().await;
                let admitted = admit(&current)?;
                *current = admitted;
                Ok::<_, EnrollError>(())
            })
        })
        .collect();

    let mut successes = 0;
    let mut refusals = 0;
    for attempt in attempts {
        match attempt.await.expect("task panicked") {
            Ok(()) => successes += 1,
            Err(EnrollError::CapacityExceeded { .. }) => refusals += 1,
            Err(other) => panic!("Unexpected error: {:?}", other),
        }
    }

    assert_eq!((successes, refusals), (3, 2));
    assert_eq!(store.lock().await.current_capacity, 3);
}
