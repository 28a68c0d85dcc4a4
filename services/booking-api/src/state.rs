//! Application state for the Booking API service.

use std::sync::Arc;

use kaiwa_booking_core::{
    BookingService, GoogleCalendarGateway, HttpIdentityProvider, LineNotifier,
};
use kaiwa_db::pg::{
    PgAvailabilityRepository, PgBookingRepository, PgCreditLedger, PgStudentRepository,
};
use kaiwa_db::DbPool;

use crate::config::Config;

/// The booking service with its production collaborators
pub type Service = BookingService<
    PgBookingRepository,
    PgStudentRepository,
    PgAvailabilityRepository,
    PgCreditLedger,
    GoogleCalendarGateway,
    HttpIdentityProvider,
    LineNotifier,
>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Booking service (create/cancel/slot workflows)
    pub booking: Arc<Service>,
    /// Database pool (for readiness checks)
    pub pool: DbPool,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(booking: Service, pool: DbPool, config: Config) -> Self {
        Self {
            booking: Arc::new(booking),
            pool,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
