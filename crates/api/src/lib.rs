//! # Enrollsync API
//!
//! The API crate provides the web server for the Enrollsync enrollment
//! scheduler. Teachers publish weekly availability, students pick slots, and
//! every booking is validated and admitted against slot capacity.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Load data, run the scheduling rules, persist the result
//! - **Middleware**: Error-to-response mapping
//! - **Config**: Environment configuration and enrollment policy
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement the enrollment workflow
pub mod handlers;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use enrollsync_core::{
    clock::{Clock, SystemClock},
    validation::EnrollmentValidator,
};
use eyre::{Result, WrapErr};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use enrollsync_api::{build_router, ApiState};
/// use enrollsync_core::validation::{EnrollmentValidator, ValidationPolicy};
///
/// # async fn example(db_pool: sqlx::PgPool) {
/// let state = Arc::new(ApiState::new(db_pool, EnrollmentValidator::new(ValidationPolicy::default())));
/// let app = build_router(state);
/// # }
/// ```
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
    /// Enrollment rules, configured from the environment
    pub validator: EnrollmentValidator,
    /// Source of `requested_at` for bookings
    pub clock: Arc<dyn Clock>,
}

impl ApiState {
    pub fn new(db_pool: PgPool, validator: EnrollmentValidator) -> Self {
        Self {
            db_pool,
            validator,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Builds the application router with every route and request tracing.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Teacher availability endpoints
        .merge(routes::availability::routes())
        // Enrollment endpoints
        .merge(routes::enrollment::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// Sets up logging, builds the router, applies CORS and the request timeout,
/// then serves until the listener fails.
///
/// # Errors
///
/// Fails if the global subscriber is already set, a CORS origin is not a
/// valid header value, or the listener cannot bind.
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let validator = EnrollmentValidator::new(config.policy);
    let state = Arc::new(ApiState::new(db_pool, validator));
    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .wrap_err_with(|| format!("Invalid CORS origin: {}", origin))
            })
            .collect::<Result<Vec<_>>>()?;

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_origin(origins);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(axum::error_handling::HandleErrorLayer::new(
                |_: tower::BoxError| async { axum::http::StatusCode::REQUEST_TIMEOUT },
            ))
            .timeout(Duration::from_secs(config.request_timeout))
            .into_inner(),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
