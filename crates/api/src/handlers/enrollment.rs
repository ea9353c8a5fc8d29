//! # Enrollment Handlers
//!
//! Validation is available on its own for inline feedback, and runs again on
//! booking against freshly loaded slots. Booking admits every selected slot
//! through the storage layer's conditional update, so a slot filled between
//! validation and booking is still refused with a capacity conflict.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use enrollsync_core::{
    errors::{EnrollError, EnrollResult},
    models::{
        enrollment::{
            CancelEnrollmentResponse, CreateEnrollmentRequest, Enrollment, EnrollmentRequest,
            ValidateEnrollmentRequest, ValidationOutcome,
        },
        teacher::{Holiday, Teacher},
        time_slot::TimeSlot,
    },
    scheduling::{self, calendar},
    validation::EnrollmentValidator,
};
use enrollsync_db::repositories::{enrollment, teacher, time_slot};
use std::sync::Arc;
use uuid::Uuid;

use crate::{handlers::availability::load_holidays, middleware::error_handling::AppError, ApiState};

/// Runs every enrollment check against caller-supplied data.
///
/// Always answers 200; a rejected enrollment is reported in the body with
/// `isValid: false` and the full error list.
#[axum::debug_handler]
pub async fn validate_enrollment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<ValidateEnrollmentRequest>,
) -> Json<ValidationOutcome> {
    let outcome = state.validator.validate(
        &payload.enrollment,
        payload.teacher.as_ref(),
        &payload.requirements,
    );
    tracing::debug!(
        "Validated enrollment: valid={}, errors={}",
        outcome.is_valid,
        outcome.errors.len()
    );
    Json(outcome)
}

/// Validates and books an enrollment.
///
/// # Errors
///
/// * `EnrollError::NotFound` - a teacher id was given but does not exist
/// * `EnrollError::SlotNotFound` - a selected slot id does not exist
/// * `EnrollError::Rejected` - validation failed, every error listed
/// * `EnrollError::CapacityExceeded` - a slot filled up before admission
#[axum::debug_handler]
pub async fn create_enrollment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateEnrollmentRequest>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let teacher = match payload.teacher_id {
        Some(id) => Some(teacher::load_teacher(&state.db_pool, id).await?.ok_or_else(|| {
            AppError(EnrollError::NotFound(format!("Teacher with ID {} not found", id)))
        })?),
        None => None,
    };

    let found: Vec<TimeSlot> = time_slot::get_time_slots_by_ids(&state.db_pool, &payload.slot_ids)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let holidays = match date_span(&found) {
        Some((start, end)) => load_holidays(&state.db_pool, start, end).await?,
        None => Vec::new(),
    };

    let request = prepare_enrollment(
        &state.validator,
        &payload,
        teacher.as_ref(),
        found,
        &holidays,
        state.clock.now(),
    )?;

    let course_id = request
        .course_id
        .ok_or_else(|| EnrollError::Validation("Course is required".to_string()))?;
    let created = enrollment::create_enrollment(
        &state.db_pool,
        payload.student_id,
        course_id,
        request.teacher_id,
        &payload.slot_ids,
    )
    .await?;

    tracing::info!(
        "Enrollment {} created for student {} with {} slots",
        created.id,
        created.student_id,
        created.slot_ids.len()
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// Cancels an active enrollment and frees its seats.
#[axum::debug_handler]
pub async fn cancel_enrollment(
    State(state): State<Arc<ApiState>>,
    Path(enrollment_id): Path<Uuid>,
) -> Result<Json<CancelEnrollmentResponse>, AppError> {
    let released_slots = enrollment::cancel_enrollment(&state.db_pool, enrollment_id).await?;
    tracing::info!(
        "Enrollment {} cancelled, released {} slots",
        enrollment_id,
        released_slots
    );

    Ok(Json(CancelEnrollmentResponse {
        id: enrollment_id,
        released_slots,
    }))
}

/// Builds the validated request from loaded data.
///
/// Slots are put back in the order the client selected them and holidays are
/// flagged before validation, so a slot on a holiday is refused as a conflict.
/// Returns `EnrollError::Rejected` with every validation error when any check
/// fails.
pub fn prepare_enrollment(
    validator: &EnrollmentValidator,
    payload: &CreateEnrollmentRequest,
    teacher: Option<&Teacher>,
    found: Vec<TimeSlot>,
    holidays: &[Holiday],
    requested_at: DateTime<Utc>,
) -> EnrollResult<EnrollmentRequest> {
    let mut selected_slots = scheduling::resolve_slots(&payload.slot_ids, found)?;
    calendar::flag_holidays(&mut selected_slots, holidays);

    let request = EnrollmentRequest {
        course_id: payload.course_id,
        teacher_id: payload.teacher_id,
        selected_slots,
        course_type: payload.course_type,
        requested_at,
    };

    let outcome = validator.validate(&request, teacher, &payload.requirements);
    if !outcome.is_valid {
        tracing::warn!(
            "Enrollment rejected for student {}: {} errors",
            payload.student_id,
            outcome.errors.len()
        );
        return Err(EnrollError::Rejected(outcome.errors));
    }

    Ok(request)
}

fn date_span(slots: &[TimeSlot]) -> Option<(chrono::NaiveDate, chrono::NaiveDate)> {
    let start = slots.iter().map(|slot| slot.date).min()?;
    let end = slots.iter().map(|slot| slot.date).max()?;
    Some((start, end))
}
