//! Lesson booking handlers

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::time::Instant;

use kaiwa_booking_core::{
    BookingRequest, BookingResponse, CancelSideEffects, CreateSideEffects,
};
use kaiwa_types::{Booking, Slot};

use crate::error::ApiResult;
use crate::extractors::OptionalBearer;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

/// Booking representation returned to callers
#[derive(Debug, Serialize)]
pub struct BookingView {
    pub id: String,
    pub student_id: String,
    pub lesson_type: String,
    pub scheduled_at: String,
    pub duration_minutes: u32,
    pub price: i64,
    pub payment_status: String,
    pub funding_source: String,
    pub join_link: Option<String>,
    pub status: String,
    pub created_at: String,
}

impl From<Booking> for BookingView {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            student_id: booking.student_id.to_string(),
            lesson_type: booking.lesson_type.to_string(),
            scheduled_at: booking.scheduled_at.to_rfc3339(),
            duration_minutes: booking.duration_minutes,
            price: booking.price,
            payment_status: booking.payment_status.to_string(),
            funding_source: booking.funding_source.to_string(),
            join_link: booking.join_link,
            status: booking.status.to_string(),
            created_at: booking.created_at.to_rfc3339(),
        }
    }
}

/// Response for a dispatched lesson action
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum LessonResponse {
    Created {
        success: bool,
        booking: BookingView,
        message: String,
        side_effects: CreateSideEffects,
    },
    Cancelled {
        success: bool,
        refund: String,
        message: String,
        side_effects: CancelSideEffects,
    },
    Slots {
        success: bool,
        slots: Vec<Slot>,
    },
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/lessons
///
/// Single dispatch endpoint; the action tag in the body selects the
/// workflow. Authentication is optional here and enforced per-workflow.
pub async fn dispatch_lesson_action(
    State(state): State<AppState>,
    bearer: OptionalBearer,
    Json(request): Json<BookingRequest>,
) -> ApiResult<Json<LessonResponse>> {
    let start = Instant::now();
    let operation = operation_name(&request);

    let response = state.booking.dispatch(bearer.token(), request).await?;

    metrics::histogram!("booking_operation_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());

    let body = match response {
        BookingResponse::Created(outcome) => {
            metrics::counter!("bookings_created_total").increment(1);
            tracing::info!(booking_id = %outcome.booking.id, "Booking created");
            LessonResponse::Created {
                success: true,
                booking: outcome.booking.into(),
                message: outcome.message,
                side_effects: outcome.side_effects,
            }
        }
        BookingResponse::Cancelled(outcome) => {
            metrics::counter!("bookings_cancelled_total").increment(1);
            LessonResponse::Cancelled {
                success: true,
                refund: outcome.refund,
                message: outcome.message,
                side_effects: outcome.side_effects,
            }
        }
        BookingResponse::Slots(slots) => {
            metrics::counter!("slot_queries_total").increment(1);
            LessonResponse::Slots {
                success: true,
                slots,
            }
        }
    };

    Ok(Json(body))
}

fn operation_name(request: &BookingRequest) -> &'static str {
    match request {
        BookingRequest::Create(_) => "create",
        BookingRequest::Cancel(_) => "cancel",
        BookingRequest::GetAvailableSlots(_) => "get_available_slots",
    }
}
