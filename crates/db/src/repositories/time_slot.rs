use crate::{db_error, models::DbTimeSlot};
use chrono::{NaiveDate, Utc};
use enrollsync_core::{
    errors::{EnrollError, EnrollResult},
    models::time_slot::TimeSlot,
};
use eyre::Result;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

const SLOT_COLUMNS: &str = "id, teacher_id, pattern_id, slot_date, start_time, end_time, \
     max_capacity, current_capacity, is_available, conflict_reason, created_at";

/// Publishes dated slots. A slot already published for the same teacher, date
/// and start time is left untouched. Returns how many rows were inserted.
pub async fn insert_time_slots(
    tx: &mut Transaction<'_, Postgres>,
    pattern_id: Option<Uuid>,
    slots: &[TimeSlot],
) -> Result<u64> {
    let now = Utc::now();
    let mut inserted = 0;

    for slot in slots {
        let result = sqlx::query(
            r#"
            INSERT INTO time_slots
                (id, teacher_id, pattern_id, slot_date, start_time, end_time,
                 max_capacity, current_capacity, is_available, conflict_reason, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT ON CONSTRAINT unique_teacher_slot DO NOTHING
            "#,
        )
        .bind(slot.slot_id)
        .bind(slot.teacher_id)
        .bind(pattern_id)
        .bind(slot.date)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(i32::try_from(slot.max_capacity)?)
        .bind(i32::try_from(slot.current_capacity)?)
        .bind(slot.is_available)
        .bind(slot.conflict_reason.as_deref())
        .bind(now)
        .execute(&mut **tx)
        .await?;

        inserted += result.rows_affected();
    }

    tracing::debug!("Published {} of {} time slots", inserted, slots.len());
    Ok(inserted)
}

pub async fn get_time_slots_for_teacher(
    pool: &Pool<Postgres>,
    teacher_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    day_of_week: Option<u8>,
) -> Result<Vec<DbTimeSlot>> {
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(&format!(
        r#"
        SELECT {}
        FROM time_slots
        WHERE teacher_id = $1
          AND slot_date >= $2
          AND slot_date <= $3
          AND ($4::SMALLINT IS NULL OR EXTRACT(DOW FROM slot_date) = $4)
        ORDER BY slot_date ASC, start_time ASC
        "#,
        SLOT_COLUMNS
    ))
    .bind(teacher_id)
    .bind(start)
    .bind(end)
    .bind(day_of_week.map(i16::from))
    .fetch_all(pool)
    .await?;

    Ok(time_slots)
}

pub async fn get_time_slots_by_ids(pool: &Pool<Postgres>, ids: &[Uuid]) -> Result<Vec<DbTimeSlot>> {
    let time_slots = sqlx::query_as::<_, DbTimeSlot>(&format!(
        "SELECT {} FROM time_slots WHERE id = ANY($1)",
        SLOT_COLUMNS
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(time_slots)
}

/// Takes one seat in each slot inside the caller's transaction.
///
/// The capacity check is part of the `UPDATE` itself, so two requests racing
/// for the last seat cannot both succeed no matter what they read earlier.
/// On the first refusal the error is returned and the caller drops the
/// transaction, undoing seats already taken for this booking.
pub async fn admit_slots(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[Uuid],
) -> EnrollResult<Vec<TimeSlot>> {
    let mut admitted = Vec::with_capacity(ids.len());

    for id in ids {
        let row = sqlx::query_as::<_, DbTimeSlot>(&format!(
            r#"
            UPDATE time_slots
            SET current_capacity = current_capacity + 1
            WHERE id = $1 AND is_available = TRUE AND current_capacity < max_capacity
            RETURNING {}
            "#,
            SLOT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(db_error)?;

        match row {
            Some(row) => admitted.push(TimeSlot::from(row)),
            None => return Err(refusal(tx, *id).await),
        }
    }

    Ok(admitted)
}

/// Explains why the conditional update on `id` matched no row.
async fn refusal(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> EnrollError {
    let current = sqlx::query_as::<_, DbTimeSlot>(&format!(
        "SELECT {} FROM time_slots WHERE id = $1",
        SLOT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&mut **tx)
    .await;

    match current {
        Ok(None) => EnrollError::SlotNotFound(id),
        Ok(Some(row)) if !row.is_available => {
            EnrollError::Conflict(format!("Slot {} is no longer available", id))
        }
        Ok(Some(row)) => {
            let slot = TimeSlot::from(row);
            tracing::warn!(
                "Admission refused at write time: slot={} capacity={}/{}",
                id, slot.current_capacity, slot.max_capacity
            );
            EnrollError::CapacityExceeded {
                slot_id: id,
                current: slot.current_capacity,
                max: slot.max_capacity,
            }
        }
        Err(err) => db_error(err),
    }
}

/// Gives back one seat in each slot, never dropping below zero.
pub async fn release_slots(tx: &mut Transaction<'_, Postgres>, ids: &[Uuid]) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE time_slots
        SET current_capacity = GREATEST(current_capacity - 1, 0)
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}
