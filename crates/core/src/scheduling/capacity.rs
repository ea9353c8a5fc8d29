//! # Capacity guard
//!
//! Admission control for a single slot. These functions only decide; they do
//! not serialize concurrent callers. A decision taken on a capacity value read
//! earlier in the request is stale by the time it is written, so storage must
//! repeat the check inside one atomic read-modify-write
//! (`UPDATE ... WHERE current_capacity < max_capacity`). See
//! `enrollsync_db::repositories::time_slot::admit_slots`.

use serde::{Deserialize, Serialize};

use crate::{
    errors::{EnrollError, EnrollResult},
    models::time_slot::TimeSlot,
};

/// Seat accounting for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityInfo {
    pub max_students: u32,
    pub current_enrollments: u32,
    pub available_spots: u32,
    pub is_at_capacity: bool,
}

impl From<&TimeSlot> for CapacityInfo {
    fn from(slot: &TimeSlot) -> Self {
        let available_spots = slot.max_capacity.saturating_sub(slot.current_capacity);
        Self {
            max_students: slot.max_capacity,
            current_enrollments: slot.current_capacity,
            available_spots,
            is_at_capacity: available_spots == 0,
        }
    }
}

pub fn can_admit(slot: &TimeSlot) -> bool {
    slot.current_capacity < slot.max_capacity
}

/// Returns the slot with one more seat taken. A refused admission leaves the
/// input untouched, so retrying after a failure is safe.
pub fn admit(slot: &TimeSlot) -> EnrollResult<TimeSlot> {
    if !can_admit(slot) {
        return Err(EnrollError::CapacityExceeded {
            slot_id: slot.slot_id,
            current: slot.current_capacity,
            max: slot.max_capacity,
        });
    }
    Ok(TimeSlot {
        current_capacity: slot.current_capacity + 1,
        ..slot.clone()
    })
}

/// Returns the slot with one seat given back; never goes below zero.
pub fn release(slot: &TimeSlot) -> TimeSlot {
    TimeSlot {
        current_capacity: slot.current_capacity.saturating_sub(1),
        ..slot.clone()
    }
}
