use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{teacher::Teacher, time_slot::TimeSlot};

/// Machine-readable tag attached to a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    SlotUnavailable,
    CapacityExceeded,
    SlotConflict,
    TimeOverlap,
    InsufficientHours,
    InsufficientNotice,
    NoAvailability,
    TeacherNotFound,
    TeacherRequired,
    IncompleteData,
    ValidationError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SlotUnavailable => "SLOT_UNAVAILABLE",
            ErrorCode::CapacityExceeded => "CAPACITY_EXCEEDED",
            ErrorCode::SlotConflict => "SLOT_CONFLICT",
            ErrorCode::TimeOverlap => "TIME_OVERLAP",
            ErrorCode::InsufficientHours => "INSUFFICIENT_HOURS",
            ErrorCode::InsufficientNotice => "INSUFFICIENT_NOTICE",
            ErrorCode::NoAvailability => "NO_AVAILABILITY",
            ErrorCode::TeacherNotFound => "TEACHER_NOT_FOUND",
            ErrorCode::TeacherRequired => "TEACHER_REQUIRED",
            ErrorCode::IncompleteData => "INCOMPLETE_DATA",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level problem found while validating an enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseType {
    /// Teacher-led sessions booked into slots
    Scheduled,
    #[default]
    SelfPaced,
}

/// A submitted enrollment with its slot references already resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    pub course_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    #[serde(default)]
    pub selected_slots: Vec<TimeSlot>,
    #[serde(default)]
    pub course_type: CourseType,
    pub requested_at: DateTime<Utc>,
}

impl EnrollmentRequest {
    /// Sum of the selected slot durations in hours.
    pub fn total_hours(&self) -> f64 {
        self.selected_slots.iter().map(TimeSlot::duration_hours).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequirements {
    pub total_hours: f64,
    pub session_duration: f64,
}

/// Outcome of a validation pass; `is_valid` holds iff `errors` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl From<Vec<ValidationError>> for ValidationOutcome {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Body of the inline validation endpoint: everything the validator needs is
/// supplied by the caller, so the check has no side effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateEnrollmentRequest {
    pub enrollment: EnrollmentRequest,
    pub teacher: Option<Teacher>,
    pub requirements: CourseRequirements,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrollmentRequest {
    pub student_id: Uuid,
    pub course_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    #[serde(default)]
    pub slot_ids: Vec<Uuid>,
    #[serde(default)]
    pub course_type: CourseType,
    pub requirements: CourseRequirements,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub teacher_id: Option<Uuid>,
    pub slot_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelEnrollmentResponse {
    pub id: Uuid,
    pub released_slots: usize,
}
