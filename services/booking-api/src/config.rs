//! Configuration for the Booking API service.

use kaiwa_booking_core::{BookingConfig, GoogleCalendarConfig};
use std::time::Duration;

/// Booking API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,
    /// Database URL
    pub database_url: String,
    /// Identity service base URL
    pub identity_base_url: String,
    /// Google Calendar gateway configuration
    pub calendar: GoogleCalendarConfig,
    /// LINE channel access token for confirmation messages
    pub line_channel_token: String,
    /// Booking core configuration
    pub booking: BookingConfig,
    /// Request timeout
    pub request_timeout: Duration,
    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Database
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        // Server port
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Identity service
        let identity_base_url = std::env::var("IDENTITY_BASE_URL")
            .map_err(|_| ConfigError::Missing("IDENTITY_BASE_URL"))?;

        // Google Calendar
        let service_account_email = std::env::var("GOOGLE_SERVICE_ACCOUNT_EMAIL")
            .map_err(|_| ConfigError::Missing("GOOGLE_SERVICE_ACCOUNT_EMAIL"))?;
        let private_key = std::env::var("GOOGLE_PRIVATE_KEY")
            .map_err(|_| ConfigError::Missing("GOOGLE_PRIVATE_KEY"))?;
        let calendar_id = std::env::var("GOOGLE_CALENDAR_ID")
            .map_err(|_| ConfigError::Missing("GOOGLE_CALENDAR_ID"))?;
        let event_timezone =
            std::env::var("CALENDAR_TIMEZONE").unwrap_or_else(|_| "Asia/Tokyo".to_string());

        // LINE messaging
        let line_channel_token = std::env::var("LINE_CHANNEL_ACCESS_TOKEN")
            .map_err(|_| ConfigError::Missing("LINE_CHANNEL_ACCESS_TOKEN"))?;

        // Booking rules
        let standard_fee: i64 = std::env::var("STANDARD_LESSON_FEE")
            .unwrap_or_else(|_| "4000".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("STANDARD_LESSON_FEE"))?;

        let notice_hours: i64 = std::env::var("CANCELLATION_NOTICE_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("CANCELLATION_NOTICE_HOURS"))?;

        // Request timeout
        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        // Metrics
        let metrics_enabled = std::env::var("METRICS_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let calendar = GoogleCalendarConfig::new(service_account_email, private_key, calendar_id)
            .with_timezone(event_timezone);

        let booking = BookingConfig::default()
            .with_standard_fee(standard_fee)
            .with_notice_hours(notice_hours);

        Ok(Self {
            http_port,
            database_url,
            identity_base_url,
            calendar,
            line_channel_token,
            booking,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
