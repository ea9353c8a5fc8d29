use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create teachers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teachers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create teacher_availability table (weekly patterns)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS teacher_availability (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            teacher_id UUID NOT NULL REFERENCES teachers(id),
            day_of_week SMALLINT NOT NULL CHECK (day_of_week BETWEEN 0 AND 6),
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            max_students INTEGER NOT NULL CHECK (max_students BETWEEN 1 AND 50),
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_pattern_range CHECK (end_time > start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create holidays table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS holidays (
            date DATE PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            is_national BOOLEAN NOT NULL DEFAULT TRUE
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create time_slots table (dated, bookable inventory)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS time_slots (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            teacher_id UUID NOT NULL REFERENCES teachers(id),
            pattern_id UUID NULL REFERENCES teacher_availability(id),
            slot_date DATE NOT NULL,
            start_time TIME NOT NULL,
            end_time TIME NOT NULL,
            max_capacity INTEGER NOT NULL CHECK (max_capacity >= 0),
            current_capacity INTEGER NOT NULL DEFAULT 0,
            is_available BOOLEAN NOT NULL DEFAULT TRUE,
            conflict_reason VARCHAR(255) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time),
            CONSTRAINT capacity_within_bounds
                CHECK (current_capacity >= 0 AND current_capacity <= max_capacity),
            CONSTRAINT unique_teacher_slot UNIQUE (teacher_id, slot_date, start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create enrollments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS enrollments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            student_id UUID NOT NULL,
            course_id UUID NOT NULL,
            teacher_id UUID NULL REFERENCES teachers(id),
            status VARCHAR(32) NOT NULL DEFAULT 'active',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create enrollment_slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS enrollment_slots (
            enrollment_id UUID NOT NULL REFERENCES enrollments(id),
            slot_id UUID NOT NULL REFERENCES time_slots(id),
            PRIMARY KEY (enrollment_id, slot_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_teacher_availability_teacher_id ON teacher_availability(teacher_id);
        CREATE INDEX IF NOT EXISTS idx_time_slots_teacher_date ON time_slots(teacher_id, slot_date);
        CREATE INDEX IF NOT EXISTS idx_enrollment_slots_slot_id ON enrollment_slots(slot_id);
        CREATE INDEX IF NOT EXISTS idx_enrollments_student_id ON enrollments(student_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
