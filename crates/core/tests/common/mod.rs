#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use enrollsync_core::models::{
    teacher::{AvailabilityPattern, Teacher},
    time_slot::TimeSlot,
};
use uuid::Uuid;

pub fn time(raw: &str) -> NaiveTime {
    NaiveTime::parse_from_str(raw, "%H:%M").expect("valid HH:MM")
}

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid YYYY-MM-DD")
}

pub fn slot(day: &str, start: &str, end: &str) -> TimeSlot {
    slot_for(Uuid::nil(), day, start, end)
}

pub fn slot_for(teacher_id: Uuid, day: &str, start: &str, end: &str) -> TimeSlot {
    TimeSlot {
        slot_id: Uuid::new_v4(),
        teacher_id,
        date: date(day),
        start_time: time(start),
        end_time: time(end),
        max_capacity: 3,
        current_capacity: 0,
        is_available: true,
        conflict_reason: None,
    }
}

pub fn pattern(teacher_id: Uuid, day_of_week: u8, start: &str, end: &str) -> AvailabilityPattern {
    AvailabilityPattern {
        id: Uuid::new_v4(),
        teacher_id,
        day_of_week,
        start_time: time(start),
        end_time: time(end),
        max_students: 4,
        is_active: true,
    }
}

pub fn active_teacher() -> Teacher {
    let id = Uuid::new_v4();
    Teacher {
        id,
        name: "Ana Souza".to_string(),
        is_active: true,
        availability: vec![pattern(id, 3, "09:00", "12:00")],
    }
}
