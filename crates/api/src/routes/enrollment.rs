use axum::{
    routing::{delete, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/enrollments/validate",
            post(handlers::enrollment::validate_enrollment),
        )
        .route(
            "/api/enrollments",
            post(handlers::enrollment::create_enrollment),
        )
        .route(
            "/api/enrollments/:enrollment_id",
            delete(handlers::enrollment::cancel_enrollment),
        )
}
