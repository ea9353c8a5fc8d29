use enrollsync_api::handlers::enrollment::prepare_enrollment;
use enrollsync_core::{
    errors::EnrollError,
    models::{
        enrollment::ErrorCode,
        teacher::Holiday,
        time_slot::TimeSlot,
    },
    validation::{EnrollmentValidator, ValidationPolicy},
};
use enrollsync_db::models::DbHoliday;
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::test_utils::{booking, date, db_slot, now, teacher, TestContext};

fn validator() -> EnrollmentValidator {
    EnrollmentValidator::new(ValidationPolicy::default())
}

fn codes(err: EnrollError) -> Vec<Option<ErrorCode>> {
    match err {
        EnrollError::Rejected(errors) => errors.into_iter().map(|e| e.code).collect(),
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn test_prepare_enrollment_keeps_selection_order() {
    let mut ctx = TestContext::new();
    let teacher_id = Uuid::new_v4();
    let rows = vec![
        db_slot(teacher_id, "2026-10-28", "09:00", "11:00"),
        db_slot(teacher_id, "2026-10-21", "09:00", "11:00"),
    ];
    // Client picked the earlier week first; storage returns them reversed.
    let ids = vec![rows[1].id, rows[0].id];

    ctx.teacher_repo
        .expect_load_teacher()
        .with(predicate::eq(teacher_id))
        .times(1)
        .returning(|id| Ok(Some(teacher(id))));
    ctx.time_slot_repo
        .expect_get_time_slots_by_ids()
        .times(1)
        .returning(move |_| Ok(rows.clone()));

    let loaded_teacher = ctx.teacher_repo.load_teacher(teacher_id).await.unwrap();
    let found: Vec<TimeSlot> = ctx
        .time_slot_repo
        .get_time_slots_by_ids(ids.clone())
        .await
        .unwrap()
        .into_iter()
        .map(Into::into)
        .collect();

    let payload = booking(teacher_id, ids.clone(), 5.0);
    let request = prepare_enrollment(
        &validator(),
        &payload,
        loaded_teacher.as_ref(),
        found,
        &[],
        now(),
    )
    .unwrap();

    let selected: Vec<Uuid> = request.selected_slots.iter().map(|s| s.slot_id).collect();
    assert_eq!(selected, ids);
    assert_eq!(request.requested_at, now());
}

#[test_log::test(tokio::test)]
async fn test_prepare_enrollment_flags_holiday_slot() {
    let mut ctx = TestContext::new();
    let teacher_id = Uuid::new_v4();
    let rows = vec![
        db_slot(teacher_id, "2026-11-02", "09:00", "11:00"),
        db_slot(teacher_id, "2026-11-04", "09:00", "11:00"),
    ];
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

    ctx.time_slot_repo
        .expect_get_time_slots_by_ids()
        .returning(move |_| Ok(rows.clone()));
    ctx.holiday_repo
        .expect_get_holidays_in_range()
        .with(predicate::eq(date("2026-11-02")), predicate::eq(date("2026-11-04")))
        .times(1)
        .returning(|_, _| {
            Ok(vec![DbHoliday {
                date: date("2026-11-02"),
                name: "Finados".to_string(),
                is_national: true,
            }])
        });

    let found: Vec<TimeSlot> = ctx
        .time_slot_repo
        .get_time_slots_by_ids(ids.clone())
        .await
        .unwrap()
        .into_iter()
        .map(Into::into)
        .collect();
    let holidays: Vec<Holiday> = ctx
        .holiday_repo
        .get_holidays_in_range(date("2026-11-02"), date("2026-11-04"))
        .await
        .unwrap()
        .into_iter()
        .map(Into::into)
        .collect();

    let payload = booking(teacher_id, ids, 5.0);
    let err = prepare_enrollment(
        &validator(),
        &payload,
        Some(&teacher(teacher_id)),
        found,
        &holidays,
        now(),
    )
    .unwrap_err();

    match err {
        EnrollError::Rejected(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "selectedSlots[0]");
            assert_eq!(errors[0].message, "Conflito: Feriado: Finados");
            assert_eq!(errors[0].code, Some(ErrorCode::SlotConflict));
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_prepare_enrollment_missing_slot() {
    let teacher_id = Uuid::new_v4();
    let known = db_slot(teacher_id, "2026-10-21", "09:00", "11:00");
    let missing = Uuid::new_v4();

    let payload = booking(teacher_id, vec![known.id, missing], 2.0);
    let err = prepare_enrollment(
        &validator(),
        &payload,
        Some(&teacher(teacher_id)),
        vec![known.into()],
        &[],
        now(),
    )
    .unwrap_err();

    assert!(matches!(err, EnrollError::SlotNotFound(id) if id == missing));
}

#[tokio::test]
async fn test_prepare_enrollment_reports_every_problem() {
    let teacher_id = Uuid::new_v4();
    let mut full = db_slot(teacher_id, "2026-10-19", "10:00", "12:00");
    full.current_capacity = full.max_capacity;
    let clash = db_slot(teacher_id, "2026-10-19", "11:00", "13:00");

    let payload = booking(teacher_id, vec![full.id, clash.id], 20.0);
    let err = prepare_enrollment(
        &validator(),
        &payload,
        Some(&teacher(teacher_id)),
        vec![full.into(), clash.into()],
        &[],
        now(),
    )
    .unwrap_err();

    assert_eq!(
        codes(err),
        vec![
            Some(ErrorCode::CapacityExceeded),
            Some(ErrorCode::InsufficientHours),
            Some(ErrorCode::TimeOverlap),
            Some(ErrorCode::InsufficientNotice),
        ]
    );
}

#[tokio::test]
async fn test_prepare_enrollment_unknown_teacher() {
    let mut ctx = TestContext::new();
    let teacher_id = Uuid::new_v4();
    ctx.teacher_repo
        .expect_load_teacher()
        .returning(|_| Ok(None));

    let slot = db_slot(teacher_id, "2026-10-21", "09:00", "11:00");
    let payload = booking(teacher_id, vec![slot.id], 2.0);
    let loaded = ctx.teacher_repo.load_teacher(teacher_id).await.unwrap();

    let err = prepare_enrollment(
        &validator(),
        &payload,
        loaded.as_ref(),
        vec![slot.into()],
        &[],
        now(),
    )
    .unwrap_err();

    assert_eq!(codes(err), vec![Some(ErrorCode::TeacherNotFound)]);
}

#[tokio::test]
async fn test_enrollment_repo_capacity_conflict() {
    let mut ctx = TestContext::new();
    let slot_id = Uuid::new_v4();
    ctx.enrollment_repo
        .expect_create_enrollment()
        .times(1)
        .returning(move |_, _, _, _| {
            Err(EnrollError::CapacityExceeded {
                slot_id,
                current: 3,
                max: 3,
            })
        });

    let result = ctx
        .enrollment_repo
        .create_enrollment(Uuid::new_v4(), Uuid::new_v4(), None, vec![slot_id])
        .await;

    let err = enrollsync_api::middleware::error_handling::AppError(result.unwrap_err());
    assert_eq!(err.status(), axum::http::StatusCode::CONFLICT);
}
