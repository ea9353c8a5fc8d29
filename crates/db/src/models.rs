use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use enrollsync_core::models::{
    enrollment::Enrollment,
    teacher::{AvailabilityPattern, Holiday, Teacher},
    time_slot::TimeSlot,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTeacher {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailabilityPattern {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub max_students: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbHoliday {
    pub date: NaiveDate,
    pub name: String,
    pub is_national: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTimeSlot {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub pattern_id: Option<Uuid>,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub max_capacity: i32,
    pub current_capacity: i32,
    pub is_available: bool,
    pub conflict_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbEnrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub teacher_id: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Columns are CHECK-constrained non-negative, so a negative value only comes
/// from a hand-edited row; clamp it rather than fail the read.
fn non_negative(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

impl From<DbTimeSlot> for TimeSlot {
    fn from(row: DbTimeSlot) -> Self {
        TimeSlot {
            slot_id: row.id,
            teacher_id: row.teacher_id,
            date: row.slot_date,
            start_time: row.start_time,
            end_time: row.end_time,
            max_capacity: non_negative(row.max_capacity),
            current_capacity: non_negative(row.current_capacity),
            is_available: row.is_available,
            conflict_reason: row.conflict_reason,
        }
    }
}

impl From<DbAvailabilityPattern> for AvailabilityPattern {
    fn from(row: DbAvailabilityPattern) -> Self {
        AvailabilityPattern {
            id: row.id,
            teacher_id: row.teacher_id,
            day_of_week: u8::try_from(row.day_of_week).unwrap_or(0),
            start_time: row.start_time,
            end_time: row.end_time,
            max_students: non_negative(row.max_students),
            is_active: row.is_active,
        }
    }
}

impl From<DbHoliday> for Holiday {
    fn from(row: DbHoliday) -> Self {
        Holiday {
            date: row.date,
            name: row.name,
            is_national: row.is_national,
        }
    }
}

impl DbTeacher {
    pub fn into_teacher(self, availability: Vec<DbAvailabilityPattern>) -> Teacher {
        Teacher {
            id: self.id,
            name: self.name,
            is_active: self.is_active,
            availability: availability.into_iter().map(Into::into).collect(),
        }
    }
}

impl DbEnrollment {
    pub fn into_enrollment(self, slot_ids: Vec<Uuid>) -> Enrollment {
        Enrollment {
            id: self.id,
            student_id: self.student_id,
            course_id: self.course_id,
            teacher_id: self.teacher_id,
            slot_ids,
            created_at: self.created_at,
        }
    }
}
