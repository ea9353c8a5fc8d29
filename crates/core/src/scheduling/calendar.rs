use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::capacity::CapacityInfo;
use crate::models::{
    teacher::{AvailabilityPattern, Holiday},
    time_slot::TimeSlot,
};

/// Per-date rollup of a teacher's slots for calendar views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub total_slots: u32,
    pub available_slots: u32,
    pub conflicted_slots: u32,
    pub capacity: CapacityInfo,
}

/// Publishes one dated slot for every occurrence of the pattern's weekday in
/// `[start, end]`. Occurrences on holidays carry a conflict reason.
pub fn expand_pattern(
    pattern: &AvailabilityPattern,
    start: NaiveDate,
    end: NaiveDate,
    holidays: &[Holiday],
) -> Vec<TimeSlot> {
    if !pattern.is_active || start > end {
        return Vec::new();
    }

    let weekday = i64::from(start.weekday().num_days_from_sunday());
    let offset = (i64::from(pattern.day_of_week) - weekday).rem_euclid(7) as u64;

    let mut slots = Vec::new();
    let mut next = start.checked_add_days(Days::new(offset));
    while let Some(date) = next.filter(|date| *date <= end) {
        slots.push(TimeSlot {
            slot_id: Uuid::new_v4(),
            teacher_id: pattern.teacher_id,
            date,
            start_time: pattern.start_time,
            end_time: pattern.end_time,
            max_capacity: pattern.max_students,
            current_capacity: 0,
            is_available: true,
            conflict_reason: None,
        });
        next = date.checked_add_days(Days::new(7));
    }

    flag_holidays(&mut slots, holidays);
    slots
}

/// Marks slots that fall on a holiday. An existing conflict reason wins.
pub fn flag_holidays(slots: &mut [TimeSlot], holidays: &[Holiday]) {
    for slot in slots.iter_mut().filter(|slot| slot.conflict_reason.is_none()) {
        if let Some(holiday) = holidays.iter().find(|h| h.date == slot.date) {
            slot.conflict_reason = Some(format!("Feriado: {}", holiday.name));
        }
    }
}

pub fn summarize_by_date(slots: &[TimeSlot]) -> BTreeMap<NaiveDate, DaySummary> {
    let mut days: BTreeMap<NaiveDate, DaySummary> = BTreeMap::new();
    for slot in slots {
        let day = days.entry(slot.date).or_insert(DaySummary {
            total_slots: 0,
            available_slots: 0,
            conflicted_slots: 0,
            capacity: CapacityInfo {
                max_students: 0,
                current_enrollments: 0,
                available_spots: 0,
                is_at_capacity: false,
            },
        });

        day.total_slots += 1;
        if slot.is_available && slot.conflict_reason.is_none() {
            day.available_slots += 1;
        } else {
            day.conflicted_slots += 1;
        }

        let info = CapacityInfo::from(slot);
        day.capacity.max_students += info.max_students;
        day.capacity.current_enrollments += info.current_enrollments;
        day.capacity.available_spots += info.available_spots;
    }

    for day in days.values_mut() {
        day.capacity.is_at_capacity = day.capacity.available_spots == 0;
    }
    days
}
