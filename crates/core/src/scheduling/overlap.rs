//! # Slot overlap detection
//!
//! Two slots conflict when they fall on the same date and their half-open
//! intervals intersect: `a.start < b.end && b.start < a.end`. Touching
//! endpoints (09:00-10:00 and 10:00-11:00) do not conflict; identical
//! intervals do.
//!
//! Slots are partitioned by date, sorted by start time and swept once, so a
//! check costs O(n log n) plus the number of reported pairs. Empty or inverted
//! intervals intersect nothing and are skipped here; the validator reports
//! them as malformed.

use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::{teacher::AvailabilityPattern, time_slot::TimeSlot};

/// A pair of conflicting slots. `first` starts no later than `second`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotOverlap<'a> {
    pub date: NaiveDate,
    pub first: &'a TimeSlot,
    pub second: &'a TimeSlot,
    pub overlap_minutes: i64,
}

/// A pair of conflicting weekly patterns on the same weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternOverlap<'a> {
    pub day_of_week: u8,
    pub first: &'a AvailabilityPattern,
    pub second: &'a AvailabilityPattern,
    pub overlap_minutes: i64,
}

pub fn intervals_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Length of the intersection of two intervals in minutes, 0 when disjoint.
pub fn overlap_minutes(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> i64 {
    if !intervals_overlap(a_start, a_end, b_start, b_end) {
        return 0;
    }
    (a_end.min(b_end) - a_start.max(b_start)).num_minutes()
}

pub fn has_overlap(slots: &[TimeSlot]) -> bool {
    partition(slots, |slot| slot.date, span_of_slot)
        .values()
        .any(|day| {
            let mut latest_end: Option<NaiveTime> = None;
            day.iter().any(|slot| {
                let (start, end) = span_of_slot(*slot);
                let clash = latest_end.is_some_and(|latest| start < latest);
                latest_end = Some(latest_end.map_or(end, |latest| latest.max(end)));
                clash
            })
        })
}

/// Every conflicting pair, grouped by date in ascending order.
pub fn find_overlaps(slots: &[TimeSlot]) -> Vec<SlotOverlap<'_>> {
    sweep(slots, |slot| slot.date, span_of_slot)
        .into_iter()
        .map(|(date, first, second, overlap_minutes)| SlotOverlap {
            date,
            first,
            second,
            overlap_minutes,
        })
        .collect()
}

/// Conflicts among a teacher's active weekly patterns.
pub fn detect_pattern_overlaps(patterns: &[AvailabilityPattern]) -> Vec<PatternOverlap<'_>> {
    let active: Vec<&AvailabilityPattern> = patterns.iter().filter(|p| p.is_active).collect();
    sweep(&active, |p| p.day_of_week, |p| (p.start_time, p.end_time))
        .into_iter()
        .map(|(day_of_week, first, second, overlap_minutes)| PatternOverlap {
            day_of_week,
            first: *first,
            second: *second,
            overlap_minutes,
        })
        .collect()
}

/// First active pattern on `day_of_week` that a new `[start, end)` would collide with.
pub fn pattern_conflict(
    existing: &[AvailabilityPattern],
    day_of_week: u8,
    start: NaiveTime,
    end: NaiveTime,
) -> Option<&AvailabilityPattern> {
    existing
        .iter()
        .find(|p| collides(p, day_of_week, start, end))
}

/// Same as [`pattern_conflict`] for an edit of `pattern_id`, which never
/// conflicts with its own previous hours.
pub fn pattern_conflict_excluding(
    existing: &[AvailabilityPattern],
    pattern_id: Uuid,
    day_of_week: u8,
    start: NaiveTime,
    end: NaiveTime,
) -> Option<&AvailabilityPattern> {
    existing
        .iter()
        .filter(|p| p.id != pattern_id)
        .find(|p| collides(p, day_of_week, start, end))
}

fn collides(
    pattern: &AvailabilityPattern,
    day_of_week: u8,
    start: NaiveTime,
    end: NaiveTime,
) -> bool {
    pattern.is_active
        && pattern.day_of_week == day_of_week
        && intervals_overlap(start, end, pattern.start_time, pattern.end_time)
}

fn span_of_slot(slot: &TimeSlot) -> (NaiveTime, NaiveTime) {
    (slot.start_time, slot.end_time)
}

fn partition<'a, T, K: Ord>(
    items: &'a [T],
    key: impl Fn(&T) -> K,
    span: impl Fn(&T) -> (NaiveTime, NaiveTime),
) -> BTreeMap<K, Vec<&'a T>> {
    let mut groups: BTreeMap<K, Vec<&'a T>> = BTreeMap::new();
    for item in items {
        let (start, end) = span(item);
        if start < end {
            groups.entry(key(item)).or_default().push(item);
        }
    }
    // Stable, so identical starts keep their input order.
    for group in groups.values_mut() {
        group.sort_by_key(|item| span(*item).0);
    }
    groups
}

fn sweep<'a, T, K: Ord + Copy>(
    items: &'a [T],
    key: impl Fn(&T) -> K,
    span: impl Fn(&T) -> (NaiveTime, NaiveTime),
) -> Vec<(K, &'a T, &'a T, i64)> {
    let mut pairs = Vec::new();
    for (group_key, group) in partition(items, &key, &span) {
        for (i, first) in group.iter().enumerate() {
            let (a_start, a_end) = span(*first);
            for second in &group[i + 1..] {
                let (b_start, b_end) = span(*second);
                if b_start >= a_end {
                    break;
                }
                pairs.push((
                    group_key,
                    *first,
                    *second,
                    overlap_minutes(a_start, a_end, b_start, b_end),
                ));
            }
        }
    }
    pairs
}
