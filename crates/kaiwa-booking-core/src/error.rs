//! Booking errors

use thiserror::Error;

use kaiwa_db::DbError;

/// Booking errors
#[derive(Error, Debug)]
pub enum BookingError {
    /// No acting principal could be resolved for the request
    #[error("not authenticated")]
    Unauthenticated,

    /// Student record does not exist
    #[error("student not found")]
    StudentNotFound,

    /// Booking does not exist or is not owned by the caller
    #[error("booking not found")]
    BookingNotFound,

    /// The requested time slot is occupied
    #[error("this time slot is no longer available")]
    SlotUnavailable,

    /// Student is not eligible for the requested lesson type
    #[error("not eligible for first-time consultation")]
    Ineligible,

    /// Calendar collaborator failure
    #[error("calendar error: {0}")]
    Calendar(String),

    /// Identity collaborator failure
    #[error("identity error: {0}")]
    Identity(String),

    /// Notification channel failure
    #[error("notification error: {0}")]
    Notify(String),

    /// Persistence failure
    #[error("database error: {0}")]
    Database(#[from] DbError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl BookingError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StudentNotFound | Self::BookingNotFound)
    }
}
