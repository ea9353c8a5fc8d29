use crate::models::DbHoliday;
use chrono::NaiveDate;
use eyre::Result;
use sqlx::{Pool, Postgres};

pub async fn get_holidays_in_range(
    pool: &Pool<Postgres>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DbHoliday>> {
    let holidays = sqlx::query_as::<_, DbHoliday>(
        r#"
        SELECT date, name, is_national
        FROM holidays
        WHERE date >= $1 AND date <= $2
        ORDER BY date ASC
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(holidays)
}
