//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the Enrollsync API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! The following environment variables are used:
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `ENROLLMENT_MIN_HOURS_RATIO`: Share of course hours a selection must cover (default: 0.8)
//! - `ENROLLMENT_NOTICE_HOURS`: Minimum lead time before the first class (default: 24)

use enrollsync_core::validation::{ValidationPolicy, DEFAULT_MIN_HOURS_RATIO, DEFAULT_NOTICE_HOURS};
use eyre::{eyre, Result, WrapErr};
use std::env;
use tracing::Level;

/// Configuration for the Enrollsync API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use enrollsync_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Thresholds applied when validating enrollments
    pub policy: ValidationPolicy,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - The enrollment policy values are malformed or out of range
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Network settings
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("API_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;

        // Logging settings
        let log_level = parse_log_level(lookup("LOG_LEVEL").as_deref().unwrap_or("info"));

        // CORS settings
        let cors_origins = lookup("API_CORS_ORIGINS").map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = lookup("API_REQUEST_TIMEOUT_SECONDS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(30);

        // Enrollment policy
        let min_hours_ratio = match lookup("ENROLLMENT_MIN_HOURS_RATIO") {
            Some(value) => value
                .parse()
                .wrap_err("Invalid ENROLLMENT_MIN_HOURS_RATIO value")?,
            None => DEFAULT_MIN_HOURS_RATIO,
        };
        let notice_hours = match lookup("ENROLLMENT_NOTICE_HOURS") {
            Some(value) => value
                .parse()
                .wrap_err("Invalid ENROLLMENT_NOTICE_HOURS value")?,
            None => DEFAULT_NOTICE_HOURS,
        };
        let policy = ValidationPolicy::new(min_hours_ratio, notice_hours)
            .map_err(|e| eyre!("Invalid enrollment policy: {}", e))?;

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            policy,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_log_level(raw: &str) -> Level {
    match raw {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
