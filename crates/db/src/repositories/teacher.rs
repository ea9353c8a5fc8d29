use crate::models::DbTeacher;
use enrollsync_core::models::teacher::Teacher;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_teacher_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbTeacher>> {
    tracing::debug!("Getting teacher by id: {}", id);

    let teacher = sqlx::query_as::<_, DbTeacher>(
        r#"
        SELECT id, name, is_active, created_at
        FROM teachers
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(teacher)
}

/// Teacher together with its active weekly availability, as the validator
/// expects it.
pub async fn load_teacher(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Teacher>> {
    let Some(teacher) = get_teacher_by_id(pool, id).await? else {
        tracing::debug!("Teacher not found: id={}", id);
        return Ok(None);
    };

    let availability = super::availability::get_active_patterns(pool, id).await?;

    Ok(Some(teacher.into_teacher(availability)))
}
