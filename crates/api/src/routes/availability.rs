use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/teachers/:teacher_id/availability",
            get(handlers::availability::get_availability)
                .post(handlers::availability::create_availability),
        )
        .route(
            "/api/teachers/:teacher_id/availability/:pattern_id",
            put(handlers::availability::update_availability)
                .delete(handlers::availability::deactivate_availability),
        )
        .route(
            "/api/teachers/:teacher_id/calendar",
            get(handlers::availability::get_calendar),
        )
}
