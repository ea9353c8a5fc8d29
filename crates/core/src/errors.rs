use thiserror::Error;
use uuid::Uuid;

use crate::models::enrollment::ValidationError;

#[derive(Error, Debug)]
pub enum EnrollError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Slot not found: {0}")]
    SlotNotFound(Uuid),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Enrollment rejected: {}", summarize(.0))]
    Rejected(Vec<ValidationError>),

    #[error("Capacity exceeded for slot {slot_id} ({current}/{max})")]
    CapacityExceeded { slot_id: Uuid, current: u32, max: u32 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type EnrollResult<T> = Result<T, EnrollError>;
