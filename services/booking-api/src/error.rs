//! Error types for the Booking API service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use kaiwa_booking_core::BookingError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// API error type
#[derive(Debug, thiserror::Error)]
#[allow(dead_code)] // BadRequest reserved for handler-level validation
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Student not found")]
    StudentNotFound,

    #[error("Booking not found")]
    BookingNotFound,

    #[error("This time slot is no longer available")]
    SlotUnavailable,

    #[error("Not eligible for first-time consultation")]
    Ineligible,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Calendar service unavailable")]
    Calendar,

    #[error("Internal error")]
    Internal,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::StudentNotFound | Self::BookingNotFound => StatusCode::NOT_FOUND,
            Self::SlotUnavailable => StatusCode::CONFLICT,
            Self::Ineligible => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Calendar => StatusCode::BAD_GATEWAY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::StudentNotFound => "STUDENT_NOT_FOUND",
            Self::BookingNotFound => "BOOKING_NOT_FOUND",
            Self::SlotUnavailable => "SLOT_UNAVAILABLE",
            Self::Ineligible => "INELIGIBLE",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Calendar => "CALENDAR_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Unauthenticated => Self::Unauthenticated,
            BookingError::StudentNotFound => Self::StudentNotFound,
            BookingError::BookingNotFound => Self::BookingNotFound,
            BookingError::SlotUnavailable => Self::SlotUnavailable,
            BookingError::Ineligible => Self::Ineligible,
            BookingError::Calendar(detail) => {
                tracing::error!(error = %detail, "Calendar collaborator failure");
                Self::Calendar
            }
            BookingError::Identity(detail) => {
                tracing::error!(error = %detail, "Identity collaborator failure");
                Self::Internal
            }
            BookingError::Notify(detail) => {
                // Notification failures never reach the caller, but keep a
                // conservative mapping in case a future path surfaces one.
                tracing::error!(error = %detail, "Notification failure surfaced");
                Self::Internal
            }
            BookingError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                Self::Internal
            }
            BookingError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal booking error");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
