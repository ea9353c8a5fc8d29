//! # Availability Handlers
//!
//! Teachers publish weekly availability patterns; each pattern is expanded
//! into dated, bookable slots over a requested range. Holidays inside the
//! range do not remove a slot, they flag it with a conflict reason so the
//! enrollment validator can refuse it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use enrollsync_core::{
    errors::{EnrollError, EnrollResult},
    models::{
        teacher::{
            AvailabilityPattern, CreateAvailabilityRequest, CreateAvailabilityResponse, Holiday,
            UpdateAvailabilityRequest,
        },
        time_slot::TimeSlot,
    },
    scheduling::{
        calendar::{self, DaySummary},
        overlap,
    },
};
use enrollsync_db::repositories::{availability, holiday, teacher, time_slot};
use serde::Deserialize;
use sqlx::PgPool;
use std::{collections::BTreeMap, sync::Arc};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for listing a teacher's slots
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Restrict to one weekday, Sunday = 0
    pub day_of_week: Option<u8>,
}

impl AvailabilityQuery {
    /// Range and weekday checks, done before any database access.
    pub fn check(&self) -> EnrollResult<()> {
        check_date_range(self.start_date, self.end_date)?;
        if matches!(self.day_of_week, Some(day) if day > 6) {
            return Err(EnrollError::Validation(
                "day_of_week must be between 0 and 6".to_string(),
            ));
        }
        Ok(())
    }
}

/// Query parameters for the calendar rollup
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub fn check_date_range(start: NaiveDate, end: NaiveDate) -> EnrollResult<()> {
    if start > end {
        return Err(EnrollError::Validation(
            "INVALID_DATE_RANGE: Start date must be before end date".to_string(),
        ));
    }
    Ok(())
}

/// Lists the teacher's dated slots in range, holidays flagged.
///
/// # Endpoint
///
/// ```text
/// GET /api/teachers/:id/availability?start_date=2026-11-01&end_date=2026-11-30&day_of_week=3
/// ```
///
/// # Errors
///
/// * `EnrollError::Validation` - inverted range or weekday out of range
/// * `EnrollError::NotFound` - unknown teacher, or no slots in range
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Path(teacher_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<TimeSlot>>, AppError> {
    query.check()?;
    ensure_teacher(&state.db_pool, teacher_id).await?;

    let slots = load_slots(
        &state.db_pool,
        teacher_id,
        query.start_date,
        query.end_date,
        query.day_of_week,
    )
    .await?;

    if slots.is_empty() {
        return Err(AppError(EnrollError::NotFound(
            "NO_AVAILABILITY: Teacher has no available time slots".to_string(),
        )));
    }

    Ok(Json(slots))
}

/// Creates a weekly pattern and publishes its slots.
///
/// The overlap check and the insert run in one transaction holding a row lock
/// on the teacher, so two overlapping patterns submitted together cannot both
/// be accepted.
///
/// # Errors
///
/// * `EnrollError::Validation` - malformed pattern
/// * `EnrollError::NotFound` - unknown teacher
/// * `EnrollError::Conflict` - overlaps an active pattern on the same weekday
#[axum::debug_handler]
pub async fn create_availability(
    State(state): State<Arc<ApiState>>,
    Path(teacher_id): Path<Uuid>,
    Json(payload): Json<CreateAvailabilityRequest>,
) -> Result<(StatusCode, Json<CreateAvailabilityResponse>), AppError> {
    payload.check().map_err(EnrollError::Validation)?;
    ensure_teacher(&state.db_pool, teacher_id).await?;

    let mut tx = state
        .db_pool
        .begin()
        .await
        .map_err(|e| EnrollError::Database(e.into()))?;
    availability::lock_teacher(&mut tx, teacher_id).await?;

    let existing: Vec<AvailabilityPattern> = availability::get_active_patterns(&mut *tx, teacher_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    if let Some(clash) = overlap::pattern_conflict(
        &existing,
        payload.day_of_week,
        payload.start_time,
        payload.end_time,
    ) {
        tracing::warn!(
            "Rejected availability for teacher {}: overlaps pattern {}",
            teacher_id,
            clash.id
        );
        return Err(AppError(EnrollError::Conflict(
            "TIME_SLOT_CONFLICT: Time slot conflicts with existing availability".to_string(),
        )));
    }

    let pattern: AvailabilityPattern = availability::create_pattern(
        &mut tx,
        teacher_id,
        payload.day_of_week,
        payload.start_time,
        payload.end_time,
        payload.max_students,
        payload.is_active,
    )
    .await?
    .into();

    let holidays = load_holidays(&state.db_pool, payload.start_date, payload.end_date).await?;
    let slots = calendar::expand_pattern(&pattern, payload.start_date, payload.end_date, &holidays);
    let published = time_slot::insert_time_slots(&mut tx, Some(pattern.id), &slots).await?;

    tx.commit()
        .await
        .map_err(|e| EnrollError::Database(e.into()))?;

    tracing::info!(
        "Published pattern {} for teacher {} with {} slots",
        pattern.id,
        teacher_id,
        published
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateAvailabilityResponse {
            pattern,
            published_slots: usize::try_from(published).unwrap_or(usize::MAX),
        }),
    ))
}

/// Edits a weekly pattern in place.
///
/// The edited hours are checked against the teacher's other active patterns
/// under the same row lock as creation. Already-published slots keep their
/// hours.
///
/// # Errors
///
/// * `EnrollError::Validation` - malformed fields, or an inverted result
/// * `EnrollError::NotFound` - unknown teacher, or a pattern of another teacher
/// * `EnrollError::Conflict` - overlaps another active pattern on the same weekday
#[axum::debug_handler]
pub async fn update_availability(
    State(state): State<Arc<ApiState>>,
    Path((teacher_id, pattern_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> Result<Json<AvailabilityPattern>, AppError> {
    payload.check().map_err(EnrollError::Validation)?;
    ensure_teacher(&state.db_pool, teacher_id).await?;

    let mut tx = state
        .db_pool
        .begin()
        .await
        .map_err(|e| EnrollError::Database(e.into()))?;
    availability::lock_teacher(&mut tx, teacher_id).await?;

    let existing: AvailabilityPattern =
        availability::get_pattern(&mut *tx, teacher_id, pattern_id)
            .await?
            .ok_or_else(|| pattern_not_found(pattern_id))?
            .into();
    let others: Vec<AvailabilityPattern> =
        availability::get_active_patterns(&mut *tx, teacher_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

    let updated = apply_pattern_update(&payload, &existing, &others)?;
    let stored: AvailabilityPattern = availability::update_pattern(&mut tx, &updated)
        .await?
        .into();

    tx.commit()
        .await
        .map_err(|e| EnrollError::Database(e.into()))?;

    tracing::info!("Updated pattern {} for teacher {}", pattern_id, teacher_id);
    Ok(Json(stored))
}

/// Retires a weekly pattern and closes its published slots to new bookings.
#[axum::debug_handler]
pub async fn deactivate_availability(
    State(state): State<Arc<ApiState>>,
    Path((teacher_id, pattern_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    ensure_teacher(&state.db_pool, teacher_id).await?;

    let mut tx = state
        .db_pool
        .begin()
        .await
        .map_err(|e| EnrollError::Database(e.into()))?;
    availability::lock_teacher(&mut tx, teacher_id).await?;

    if !availability::deactivate_pattern(&mut tx, teacher_id, pattern_id).await? {
        return Err(AppError(pattern_not_found(pattern_id)));
    }

    tx.commit()
        .await
        .map_err(|e| EnrollError::Database(e.into()))?;

    tracing::info!("Deactivated pattern {} for teacher {}", pattern_id, teacher_id);
    Ok(StatusCode::NO_CONTENT)
}

/// Merges an edit into `existing` and checks it against the teacher's other
/// active patterns.
pub fn apply_pattern_update(
    payload: &UpdateAvailabilityRequest,
    existing: &AvailabilityPattern,
    active: &[AvailabilityPattern],
) -> EnrollResult<AvailabilityPattern> {
    let updated = payload.apply(existing).map_err(EnrollError::Validation)?;

    if updated.is_active {
        if let Some(clash) = overlap::pattern_conflict_excluding(
            active,
            updated.id,
            updated.day_of_week,
            updated.start_time,
            updated.end_time,
        ) {
            tracing::warn!(
                "Rejected update of pattern {}: overlaps pattern {}",
                updated.id,
                clash.id
            );
            return Err(EnrollError::Conflict(
                "TIME_SLOT_CONFLICT: Updated time slot conflicts with existing availability"
                    .to_string(),
            ));
        }
    }

    Ok(updated)
}

fn pattern_not_found(pattern_id: Uuid) -> EnrollError {
    EnrollError::NotFound(format!(
        "AVAILABILITY_SLOT_NOT_FOUND: Availability pattern {} not found",
        pattern_id
    ))
}

/// Per-date summary of the teacher's slots.
#[axum::debug_handler]
pub async fn get_calendar(
    State(state): State<Arc<ApiState>>,
    Path(teacher_id): Path<Uuid>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<BTreeMap<NaiveDate, DaySummary>>, AppError> {
    check_date_range(query.start_date, query.end_date)?;
    ensure_teacher(&state.db_pool, teacher_id).await?;

    let slots = load_slots(
        &state.db_pool,
        teacher_id,
        query.start_date,
        query.end_date,
        None,
    )
    .await?;
    Ok(Json(calendar::summarize_by_date(&slots)))
}

async fn ensure_teacher(pool: &PgPool, teacher_id: Uuid) -> Result<(), AppError> {
    teacher::get_teacher_by_id(pool, teacher_id)
        .await?
        .ok_or_else(|| {
            AppError(EnrollError::NotFound(format!(
                "Teacher with ID {} not found",
                teacher_id
            )))
        })?;
    Ok(())
}

async fn load_slots(
    pool: &PgPool,
    teacher_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    day_of_week: Option<u8>,
) -> Result<Vec<TimeSlot>, AppError> {
    let mut slots: Vec<TimeSlot> =
        time_slot::get_time_slots_for_teacher(pool, teacher_id, start, end, day_of_week)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

    let holidays = load_holidays(pool, start, end).await?;
    calendar::flag_holidays(&mut slots, &holidays);
    Ok(slots)
}

pub(crate) async fn load_holidays(
    pool: &PgPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Holiday>, AppError> {
    Ok(holiday::get_holidays_in_range(pool, start, end)
        .await?
        .into_iter()
        .map(Into::into)
        .collect())
}
