use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time_slot::hhmm;

/// Teacher as returned by the teacher lookup collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    #[serde(default)]
    pub availability: Vec<AvailabilityPattern>,
}

/// Weekly recurring availability. `day_of_week` counts from Sunday = 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityPattern {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub day_of_week: u8,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub max_students: u32,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    #[serde(default)]
    pub is_national: bool,
}

pub const MAX_STUDENTS_PER_PATTERN: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvailabilityRequest {
    pub day_of_week: u8,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub max_students: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Inclusive range over which dated slots are published.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn default_active() -> bool {
    true
}

impl CreateAvailabilityRequest {
    /// Structural checks on a new pattern, returning the first problem found.
    pub fn check(&self) -> Result<(), String> {
        if self.day_of_week > 6 {
            return Err("dayOfWeek must be between 0 and 6".to_string());
        }
        if self.start_time >= self.end_time {
            return Err("Start time must be before end time".to_string());
        }
        if self.max_students == 0 || self.max_students > MAX_STUDENTS_PER_PATTERN {
            return Err(format!(
                "maxStudents must be between 1 and {}",
                MAX_STUDENTS_PER_PATTERN
            ));
        }
        if self.start_date > self.end_date {
            return Err("Start date must be before end date".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvailabilityResponse {
    pub pattern: AvailabilityPattern,
    pub published_slots: usize,
}

/// Partial edit of a weekly pattern; absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAvailabilityRequest {
    #[serde(default)]
    pub day_of_week: Option<u8>,
    #[serde(default, with = "hhmm::option")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm::option")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub max_students: Option<u32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateAvailabilityRequest {
    /// Checks the fields that can be judged without the stored pattern.
    pub fn check(&self) -> Result<(), String> {
        if matches!(self.day_of_week, Some(day) if day > 6) {
            return Err("dayOfWeek must be between 0 and 6".to_string());
        }
        if matches!(self.max_students, Some(max) if max == 0 || max > MAX_STUDENTS_PER_PATTERN) {
            return Err(format!(
                "maxStudents must be between 1 and {}",
                MAX_STUDENTS_PER_PATTERN
            ));
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if start >= end {
                return Err("Start time must be before end time".to_string());
            }
        }
        Ok(())
    }

    /// Merges the edit into `existing`, rejecting a result whose hours are inverted.
    pub fn apply(&self, existing: &AvailabilityPattern) -> Result<AvailabilityPattern, String> {
        self.check()?;
        let updated = AvailabilityPattern {
            day_of_week: self.day_of_week.unwrap_or(existing.day_of_week),
            start_time: self.start_time.unwrap_or(existing.start_time),
            end_time: self.end_time.unwrap_or(existing.end_time),
            max_students: self.max_students.unwrap_or(existing.max_students),
            is_active: self.is_active.unwrap_or(existing.is_active),
            ..existing.clone()
        };
        if updated.start_time >= updated.end_time {
            return Err("Start time must be before end time".to_string());
        }
        Ok(updated)
    }
}
