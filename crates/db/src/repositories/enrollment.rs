use crate::{db_error, models::DbEnrollment, repositories::time_slot};
use chrono::Utc;
use enrollsync_core::{
    errors::{EnrollError, EnrollResult},
    models::enrollment::Enrollment,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_CANCELLED: &str = "cancelled";

/// Books every slot and records the enrollment in one transaction. Either all
/// seats are taken or none are.
pub async fn create_enrollment(
    pool: &Pool<Postgres>,
    student_id: Uuid,
    course_id: Uuid,
    teacher_id: Option<Uuid>,
    slot_ids: &[Uuid],
) -> EnrollResult<Enrollment> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    time_slot::admit_slots(&mut tx, slot_ids).await?;

    let id = Uuid::new_v4();
    let now = Utc::now();

    let enrollment = sqlx::query_as::<_, DbEnrollment>(
        r#"
        INSERT INTO enrollments (id, student_id, course_id, teacher_id, status, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, student_id, course_id, teacher_id, status, created_at
        "#,
    )
    .bind(id)
    .bind(student_id)
    .bind(course_id)
    .bind(teacher_id)
    .bind(STATUS_ACTIVE)
    .bind(now)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_error)?;

    for slot_id in slot_ids {
        sqlx::query("INSERT INTO enrollment_slots (enrollment_id, slot_id) VALUES ($1, $2)")
            .bind(id)
            .bind(slot_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
    }

    tx.commit().await.map_err(db_error)?;

    tracing::debug!("Enrollment created: id={}, slots={}", id, slot_ids.len());
    Ok(enrollment.into_enrollment(slot_ids.to_vec()))
}

/// Marks an active enrollment cancelled and returns its seats. Returns the
/// number of slots released.
pub async fn cancel_enrollment(pool: &Pool<Postgres>, id: Uuid) -> EnrollResult<usize> {
    let mut tx = pool.begin().await.map_err(db_error)?;

    let cancelled = sqlx::query(
        r#"
        UPDATE enrollments
        SET status = $2
        WHERE id = $1 AND status = $3
        "#,
    )
    .bind(id)
    .bind(STATUS_CANCELLED)
    .bind(STATUS_ACTIVE)
    .execute(&mut *tx)
    .await
    .map_err(db_error)?;

    if cancelled.rows_affected() == 0 {
        return Err(EnrollError::NotFound(format!(
            "Active enrollment with ID {} not found",
            id
        )));
    }

    let slot_ids: Vec<Uuid> =
        sqlx::query_scalar("SELECT slot_id FROM enrollment_slots WHERE enrollment_id = $1")
            .bind(id)
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error)?;

    time_slot::release_slots(&mut tx, &slot_ids)
        .await
        .map_err(EnrollError::Database)?;

    tx.commit().await.map_err(db_error)?;

    tracing::debug!("Enrollment cancelled: id={}, released={}", id, slot_ids.len());
    Ok(slot_ids.len())
}
