//! Scheduling primitives: slot overlap detection, capacity admission and
//! expansion of weekly availability into dated slots.

pub mod calendar;
pub mod capacity;
pub mod overlap;

use uuid::Uuid;

use crate::{
    errors::{EnrollError, EnrollResult},
    models::time_slot::TimeSlot,
};

/// Orders `found` to match the requested `ids`, failing on the first id that
/// has no matching slot.
pub fn resolve_slots(ids: &[Uuid], found: Vec<TimeSlot>) -> EnrollResult<Vec<TimeSlot>> {
    let mut resolved = Vec::with_capacity(ids.len());
    for id in ids {
        let slot = found
            .iter()
            .find(|slot| slot.slot_id == *id)
            .ok_or(EnrollError::SlotNotFound(*id))?;
        resolved.push(slot.clone());
    }
    Ok(resolved)
}
