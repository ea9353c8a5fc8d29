use crate::models::DbAvailabilityPattern;
use chrono::{NaiveTime, Utc};
use enrollsync_core::models::teacher::AvailabilityPattern;
use eyre::Result;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

pub async fn get_active_patterns<'e, E>(
    executor: E,
    teacher_id: Uuid,
) -> Result<Vec<DbAvailabilityPattern>>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let patterns = sqlx::query_as::<_, DbAvailabilityPattern>(
        r#"
        SELECT id, teacher_id, day_of_week, start_time, end_time, max_students, is_active, created_at
        FROM teacher_availability
        WHERE teacher_id = $1 AND is_active = TRUE
        ORDER BY day_of_week ASC, start_time ASC
        "#,
    )
    .bind(teacher_id)
    .fetch_all(executor)
    .await?;

    Ok(patterns)
}

/// Serializes pattern writes for one teacher until the transaction ends, so
/// the overlap check and the insert see the same set of patterns.
pub async fn lock_teacher(tx: &mut Transaction<'_, Postgres>, teacher_id: Uuid) -> Result<()> {
    sqlx::query("SELECT id FROM teachers WHERE id = $1 FOR UPDATE")
        .bind(teacher_id)
        .fetch_optional(&mut **tx)
        .await?;

    Ok(())
}

pub async fn create_pattern(
    tx: &mut Transaction<'_, Postgres>,
    teacher_id: Uuid,
    day_of_week: u8,
    start_time: NaiveTime,
    end_time: NaiveTime,
    max_students: u32,
    is_active: bool,
) -> Result<DbAvailabilityPattern> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating availability pattern: id={}, teacher_id={}, day_of_week={}, {}-{}",
        id, teacher_id, day_of_week, start_time, end_time
    );

    let pattern = sqlx::query_as::<_, DbAvailabilityPattern>(
        r#"
        INSERT INTO teacher_availability
            (id, teacher_id, day_of_week, start_time, end_time, max_students, is_active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, teacher_id, day_of_week, start_time, end_time, max_students, is_active, created_at
        "#,
    )
    .bind(id)
    .bind(teacher_id)
    .bind(i16::from(day_of_week))
    .bind(start_time)
    .bind(end_time)
    .bind(i32::try_from(max_students)?)
    .bind(is_active)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;

    Ok(pattern)
}

/// Pattern `pattern_id` if it belongs to `teacher_id`, active or not.
pub async fn get_pattern<'e, E>(
    executor: E,
    teacher_id: Uuid,
    pattern_id: Uuid,
) -> Result<Option<DbAvailabilityPattern>>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let pattern = sqlx::query_as::<_, DbAvailabilityPattern>(
        r#"
        SELECT id, teacher_id, day_of_week, start_time, end_time, max_students, is_active, created_at
        FROM teacher_availability
        WHERE id = $1 AND teacher_id = $2
        "#,
    )
    .bind(pattern_id)
    .bind(teacher_id)
    .fetch_optional(executor)
    .await?;

    Ok(pattern)
}

/// Stores the edited fields of `pattern`. Slots already published from it
/// keep their hours; the edit applies to future publishing.
pub async fn update_pattern(
    tx: &mut Transaction<'_, Postgres>,
    pattern: &AvailabilityPattern,
) -> Result<DbAvailabilityPattern> {
    tracing::debug!(
        "Updating availability pattern: id={}, day_of_week={}, {}-{}, active={}",
        pattern.id, pattern.day_of_week, pattern.start_time, pattern.end_time, pattern.is_active
    );

    let updated = sqlx::query_as::<_, DbAvailabilityPattern>(
        r#"
        UPDATE teacher_availability
        SET day_of_week = $3, start_time = $4, end_time = $5, max_students = $6, is_active = $7
        WHERE id = $1 AND teacher_id = $2
        RETURNING id, teacher_id, day_of_week, start_time, end_time, max_students, is_active, created_at
        "#,
    )
    .bind(pattern.id)
    .bind(pattern.teacher_id)
    .bind(i16::from(pattern.day_of_week))
    .bind(pattern.start_time)
    .bind(pattern.end_time)
    .bind(i32::try_from(pattern.max_students)?)
    .bind(pattern.is_active)
    .fetch_one(&mut **tx)
    .await?;

    Ok(updated)
}

/// Retires a pattern and closes its published slots to new bookings. Seats
/// already taken stay booked. Returns `false` when the teacher has no such
/// pattern.
pub async fn deactivate_pattern(
    tx: &mut Transaction<'_, Postgres>,
    teacher_id: Uuid,
    pattern_id: Uuid,
) -> Result<bool> {
    let retired = sqlx::query(
        "UPDATE teacher_availability SET is_active = FALSE WHERE id = $1 AND teacher_id = $2",
    )
    .bind(pattern_id)
    .bind(teacher_id)
    .execute(&mut **tx)
    .await?;

    if retired.rows_affected() == 0 {
        return Ok(false);
    }

    let closed = sqlx::query("UPDATE time_slots SET is_available = FALSE WHERE pattern_id = $1")
        .bind(pattern_id)
        .execute(&mut **tx)
        .await?;

    tracing::debug!(
        "Deactivated availability pattern: id={}, closed_slots={}",
        pattern_id,
        closed.rows_affected()
    );
    Ok(true)
}
