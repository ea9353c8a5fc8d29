use chrono::Duration;

use crate::{
    errors::{EnrollError, EnrollResult},
    models::enrollment::CourseRequirements,
};

pub const DEFAULT_MIN_HOURS_RATIO: f64 = 0.8;
pub const DEFAULT_NOTICE_HOURS: i64 = 24;

/// Product thresholds applied by the validator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationPolicy {
    /// Share of the course's total hours the selection must cover, in `(0, 1]`.
    pub min_hours_ratio: f64,
    /// Minimum lead time between submission and the earliest selected slot.
    pub notice_period: Duration,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            min_hours_ratio: DEFAULT_MIN_HOURS_RATIO,
            notice_period: Duration::hours(DEFAULT_NOTICE_HOURS),
        }
    }
}

impl ValidationPolicy {
    pub fn new(min_hours_ratio: f64, notice_hours: i64) -> EnrollResult<Self> {
        if !(min_hours_ratio > 0.0 && min_hours_ratio <= 1.0) {
            return Err(EnrollError::Validation(format!(
                "minimum hours ratio must be in (0, 1], got {}",
                min_hours_ratio
            )));
        }
        if notice_hours < 0 {
            return Err(EnrollError::Validation(format!(
                "notice period must not be negative, got {}h",
                notice_hours
            )));
        }
        let notice_period = Duration::try_hours(notice_hours).ok_or_else(|| {
            EnrollError::Validation(format!("notice period is too large, got {}h", notice_hours))
        })?;
        Ok(Self {
            min_hours_ratio,
            notice_period,
        })
    }

    pub fn minimum_hours(&self, requirements: &CourseRequirements) -> f64 {
        requirements.total_hours * self.min_hours_ratio
    }
}
