use enrollsync_api::handlers::availability::{
    apply_pattern_update, check_date_range, AvailabilityQuery,
};
use enrollsync_core::{
    errors::EnrollError,
    models::teacher::{AvailabilityPattern, Holiday, UpdateAvailabilityRequest},
    scheduling::{calendar, overlap},
};
use enrollsync_db::models::{DbAvailabilityPattern, DbHoliday};
use mockall::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use crate::test_utils::{date, now, time, TestContext};

fn db_pattern(teacher_id: Uuid, day_of_week: i16, start: &str, end: &str) -> DbAvailabilityPattern {
    DbAvailabilityPattern {
        id: Uuid::new_v4(),
        teacher_id,
        day_of_week,
        start_time: time(start),
        end_time: time(end),
        max_students: 4,
        is_active: true,
        created_at: now(),
    }
}

#[rstest]
#[case("2026-11-01", "2026-11-30", None, true)]
#[case("2026-11-10", "2026-11-10", Some(2), true)]
#[case("2026-11-30", "2026-11-01", None, false)]
#[case("2026-11-01", "2026-11-30", Some(7), false)]
fn test_availability_query_check(
    #[case] start: &str,
    #[case] end: &str,
    #[case] day_of_week: Option<u8>,
    #[case] ok: bool,
) {
    let query = AvailabilityQuery {
        start_date: date(start),
        end_date: date(end),
        day_of_week,
    };

    assert_eq!(query.check().is_ok(), ok);
}

#[test]
fn test_inverted_range_is_validation_error() {
    let err = check_date_range(date("2026-12-01"), date("2026-11-01")).unwrap_err();
    assert!(matches!(err, EnrollError::Validation(msg) if msg.contains("INVALID_DATE_RANGE")));
}

#[test]
fn test_new_pattern_conflicts_with_existing_weekday() {
    let teacher_id = Uuid::new_v4();
    let existing: Vec<AvailabilityPattern> = vec![
        db_pattern(teacher_id, 1, "09:00", "12:00").into(),
        db_pattern(teacher_id, 3, "14:00", "16:00").into(),
    ];

    assert!(overlap::pattern_conflict(&existing, 1, time("11:00"), time("13:00")).is_some());
    // Touching end-to-start is not an overlap.
    assert!(overlap::pattern_conflict(&existing, 1, time("12:00"), time("13:00")).is_none());
    // Same hours on another weekday are fine.
    assert!(overlap::pattern_conflict(&existing, 2, time("09:00"), time("12:00")).is_none());
}

#[tokio::test]
async fn test_published_slots_flag_holidays() {
    let mut ctx = TestContext::new();
    ctx.holiday_repo
        .expect_get_holidays_in_range()
        .times(1)
        .returning(|_, _| {
            Ok(vec![DbHoliday {
                date: date("2026-11-02"),
                name: "Finados".to_string(),
                is_national: true,
            }])
        });

    let pattern: AvailabilityPattern = db_pattern(Uuid::new_v4(), 1, "09:00", "11:00").into();
    let holidays: Vec<Holiday> = ctx
        .holiday_repo
        .get_holidays_in_range(date("2026-11-01"), date("2026-11-30"))
        .await
        .unwrap()
        .into_iter()
        .map(Into::into)
        .collect();

    let slots =
        calendar::expand_pattern(&pattern, date("2026-11-01"), date("2026-11-30"), &holidays);

    // Mondays in November 2026: 2, 9, 16, 23, 30.
    assert_eq!(slots.len(), 5);
    assert_eq!(slots[0].conflict_reason.as_deref(), Some("Feriado: Finados"));
    assert!(slots[1..].iter().all(|slot| slot.conflict_reason.is_none()));
    assert!(slots.iter().all(|slot| slot.max_capacity == 4));
}

#[tokio::test]
async fn test_pattern_update_skips_itself_but_not_neighbours() {
    let mut ctx = TestContext::new();
    let teacher_id = Uuid::new_v4();
    let rows = vec![
        db_pattern(teacher_id, 2, "09:00", "11:00"),
        db_pattern(teacher_id, 2, "13:00", "15:00"),
    ];
    let editing = rows[0].id;

    let stored = rows[0].clone();
    ctx.availability_repo
        .expect_get_pattern()
        .with(predicate::eq(teacher_id), predicate::eq(editing))
        .returning(move |_, _| Ok(Some(stored.clone())));
    ctx.availability_repo
        .expect_get_active_patterns()
        .returning(move |_| Ok(rows.clone()));

    let existing: AvailabilityPattern = ctx
        .availability_repo
        .get_pattern(teacher_id, editing)
        .await
        .unwrap()
        .unwrap()
        .into();
    let active: Vec<AvailabilityPattern> = ctx
        .availability_repo
        .get_active_patterns(teacher_id)
        .await
        .unwrap()
        .into_iter()
        .map(Into::into)
        .collect();

    let widen = UpdateAvailabilityRequest {
        start_time: Some(time("08:00")),
        end_time: Some(time("12:00")),
        ..Default::default()
    };
    let updated = apply_pattern_update(&widen, &existing, &active).unwrap();
    assert_eq!(updated.start_time, time("08:00"));
    assert_eq!(updated.id, editing);

    let collide = UpdateAvailabilityRequest {
        end_time: Some(time("14:00")),
        ..Default::default()
    };
    let err = apply_pattern_update(&collide, &existing, &active).unwrap_err();
    assert!(matches!(err, EnrollError::Conflict(msg) if msg.contains("TIME_SLOT_CONFLICT")));
}

#[test]
fn test_pattern_update_to_inactive_skips_overlap_check() {
    let teacher_id = Uuid::new_v4();
    let active: Vec<AvailabilityPattern> = vec![
        db_pattern(teacher_id, 2, "09:00", "11:00").into(),
        db_pattern(teacher_id, 2, "13:00", "15:00").into(),
    ];

    let retire = UpdateAvailabilityRequest {
        end_time: Some(time("14:00")),
        is_active: Some(false),
        ..Default::default()
    };
    let updated = apply_pattern_update(&retire, &active[0], &active).unwrap();
    assert!(!updated.is_active);
}

#[tokio::test]
async fn test_unknown_pattern_lookup() {
    let mut ctx = TestContext::new();
    ctx.availability_repo
        .expect_get_pattern()
        .returning(|_, _| Ok(None));

    let found = ctx
        .availability_repo
        .get_pattern(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap();
    assert!(found.is_none());
}

#[test]
fn test_inverted_pattern_update_is_validation_error() {
    let existing: AvailabilityPattern = db_pattern(Uuid::new_v4(), 2, "09:00", "11:00").into();
    let edit = UpdateAvailabilityRequest {
        start_time: Some(time("11:30")),
        ..Default::default()
    };

    let err = apply_pattern_update(&edit, &existing, &[]).unwrap_err();
    assert!(matches!(err, EnrollError::Validation(_)));
}
