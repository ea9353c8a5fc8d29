//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so every
//! handler reports failures the same way:
//!
//! | Error                                | Status |
//! |--------------------------------------|--------|
//! | `Validation`, `Rejected`             | 400    |
//! | `NotFound`, `SlotNotFound`           | 404    |
//! | `CapacityExceeded`, `Conflict`       | 409    |
//! | `Database`, `Internal`               | 500    |
//!
//! A rejected enrollment also carries the field-level error list under
//! `errors`, so clients can show every problem next to its field.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use enrollsync_core::errors::EnrollError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use enrollsync_api::middleware::error_handling::AppError;
/// use enrollsync_core::errors::EnrollError;
///
/// async fn handler() -> Result<Json<u32>, AppError> {
///     Err(AppError(EnrollError::NotFound("Teacher not found".to_string())))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub EnrollError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            EnrollError::Validation(_) | EnrollError::Rejected(_) => StatusCode::BAD_REQUEST,
            EnrollError::NotFound(_) | EnrollError::SlotNotFound(_) => StatusCode::NOT_FOUND,
            EnrollError::CapacityExceeded { .. } | EnrollError::Conflict(_) => StatusCode::CONFLICT,
            EnrollError::Database(_) | EnrollError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        let message = self.0.to_string();
        let body = match self.0 {
            EnrollError::Rejected(errors) => json!({ "error": message, "errors": errors }),
            _ => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Allows `?` on `EnrollResult` inside handlers.
impl From<EnrollError> for AppError {
    fn from(err: EnrollError) -> Self {
        AppError(err)
    }
}

/// Repository failures surface as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(EnrollError::Database(err))
    }
}
