//! Booking service - ties together pricing, slot checking, the calendar
//! gateway and the cancellation policy into the create/cancel workflows

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use kaiwa_db::{
    AvailabilityRepository, BookingRepository, CancelBooking, CreateBooking, CreditLedger,
    DbError, StudentRepository,
};
use kaiwa_types::{
    Booking, BookingId, LessonType, PaymentStatus, Principal, RefundStatus, Slot, Student,
    StudentId,
};

use crate::calendar::{CalendarGateway, EventDetails};
use crate::identity::IdentityProvider;
use crate::notify::Notifier;
use crate::policy;
use crate::pricing::PricingResolver;
use crate::slots::SlotChecker;
use crate::{BookingConfig, BookingError};

// ============================================================================
// Request/Response Types
// ============================================================================

/// An inbound booking request, dispatched on its action tag
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "camelCase")]
pub enum BookingRequest {
    /// Book a lesson
    Create(CreateLesson),
    /// Cancel a booking
    Cancel(CancelLesson),
    /// List bookable slots for a date
    GetAvailableSlots(SlotQuery),
}

/// Create payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLesson {
    /// Student taking the lesson
    pub student_id: StudentId,
    /// Requested start, with offset
    pub scheduled_at: DateTime<FixedOffset>,
    /// Kind of lesson
    pub lesson_type: LessonType,
    /// Lesson length in minutes; falls back to the configured default
    #[serde(default)]
    pub duration: Option<u32>,
}

/// Cancel payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelLesson {
    /// Booking to cancel
    pub booking_id: BookingId,
    /// Caller-supplied reason
    #[serde(default)]
    pub reason: Option<String>,
}

/// Slot query payload
#[derive(Debug, Clone, Deserialize)]
pub struct SlotQuery {
    /// Calendar date to enumerate
    pub date: NaiveDate,
}

/// Result of a dispatched request
#[derive(Debug)]
pub enum BookingResponse {
    /// A lesson was booked
    Created(CreateOutcome),
    /// A booking was cancelled
    Cancelled(CancelOutcome),
    /// Bookable slots for the requested date
    Slots(Vec<Slot>),
}

/// Outcome of a post-commit side effect
///
/// Side-effect failures never revert the committed booking state; they are
/// reported here so operators can detect ledger drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SideEffect {
    /// The effect ran and succeeded
    Applied,
    /// The workflow did not call for this effect
    NotRequired,
    /// The effect ran and failed; logged, not retried
    Failed,
}

/// Side-effect report for a create workflow
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CreateSideEffects {
    /// Included-credit debit
    pub credit_debited: SideEffect,
    /// First-time consultation claim marking
    pub consultation_claimed: SideEffect,
    /// Confirmation notification
    pub confirmation_sent: SideEffect,
}

/// Outcome of a successful create workflow
#[derive(Debug)]
pub struct CreateOutcome {
    /// The persisted booking
    pub booking: Booking,
    /// Human message distinguishing "payment required" from "confirmed"
    pub message: String,
    /// Post-commit side-effect report
    pub side_effects: CreateSideEffects,
}

/// Side-effect report for a cancel workflow
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CancelSideEffects {
    /// External calendar event deletion
    pub calendar_deleted: SideEffect,
    /// Included-credit restoration
    pub credit_restored: SideEffect,
}

/// Outcome of a successful cancel workflow
#[derive(Debug)]
pub struct CancelOutcome {
    /// Refund decision
    pub refund_status: RefundStatus,
    /// Human refund explanation
    pub refund: String,
    /// Human confirmation message
    pub message: String,
    /// Post-commit side-effect report
    pub side_effects: CancelSideEffects,
}

// ============================================================================
// Service
// ============================================================================

/// Booking service
///
/// Sequences the create and cancel workflows across the booking ledger,
/// the credit ledger and the external calendar, unwinding the calendar
/// event when persistence fails. All collaborators are injected so tests
/// can substitute fakes.
pub struct BookingService<B, S, A, L, C, I, N> {
    bookings: Arc<B>,
    students: Arc<S>,
    ledger: Arc<L>,
    calendar: C,
    identity: I,
    notifier: N,
    slot_checker: SlotChecker<B, A>,
    pricing: PricingResolver<L>,
    config: BookingConfig,
}

impl<B, S, A, L, C, I, N> BookingService<B, S, A, L, C, I, N>
where
    B: BookingRepository,
    S: StudentRepository,
    A: AvailabilityRepository,
    L: CreditLedger,
    C: CalendarGateway,
    I: IdentityProvider,
    N: Notifier,
{
    /// Create a new booking service
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: BookingConfig,
        bookings: Arc<B>,
        students: Arc<S>,
        availability: Arc<A>,
        ledger: Arc<L>,
        calendar: C,
        identity: I,
        notifier: N,
    ) -> Self {
        Self {
            slot_checker: SlotChecker::new(Arc::clone(&bookings), availability, config.clone()),
            pricing: PricingResolver::new(Arc::clone(&ledger), config.clone()),
            bookings,
            students,
            ledger,
            calendar,
            identity,
            notifier,
            config,
        }
    }

    /// Dispatch a request to the matching workflow
    pub async fn dispatch(
        &self,
        token: Option<&str>,
        request: BookingRequest,
    ) -> Result<BookingResponse, BookingError> {
        match request {
            BookingRequest::Create(req) => {
                Ok(BookingResponse::Created(self.create_booking(token, req).await?))
            }
            BookingRequest::Cancel(req) => {
                Ok(BookingResponse::Cancelled(self.cancel_booking(token, req).await?))
            }
            BookingRequest::GetAvailableSlots(query) => {
                Ok(BookingResponse::Slots(self.available_slots(query.date).await?))
            }
        }
    }

    // =========================================================================
    // Create workflow
    // =========================================================================

    /// Book a lesson
    ///
    /// Pre-commit steps (authenticate, load student, slot check, pricing,
    /// calendar create) abort the workflow with no durable state change;
    /// a calendar event created before a failed persist is compensated by
    /// deletion. Post-commit steps are best-effort and reported in the
    /// outcome's side-effect fields.
    pub async fn create_booking(
        &self,
        token: Option<&str>,
        req: CreateLesson,
    ) -> Result<CreateOutcome, BookingError> {
        let principal = self.authenticate(token).await?;

        let student: Student = self
            .students
            .find_by_id(req.student_id.0)
            .await?
            .ok_or(BookingError::StudentNotFound)?
            .try_into()?;

        let duration = req.duration.unwrap_or(self.config.default_duration_minutes);
        let start = req.scheduled_at.with_timezone(&Utc);

        if !self.slot_checker.is_available(start, duration).await? {
            return Err(BookingError::SlotUnavailable);
        }

        let quote = self
            .pricing
            .resolve(req.lesson_type, student.plan, student.id)
            .await?;

        // The booking id doubles as the calendar idempotency key, so it is
        // fixed before either external write happens.
        let booking_id = BookingId::new();
        let tz = self.config.timezone();
        let end = start + Duration::minutes(i64::from(duration));

        let event = self
            .calendar
            .create_event(&EventDetails {
                booking_id,
                student_name: student.display_name().to_string(),
                student_email: student.email.clone(),
                lesson_type: req.lesson_type,
                duration_minutes: duration,
                start_time: start.with_timezone(&tz),
                end_time: end.with_timezone(&tz),
            })
            .await?;

        let row = match self
            .bookings
            .create(CreateBooking {
                id: booking_id.0,
                student_id: student.id.0,
                user_id: principal.user_id.0,
                lesson_type: req.lesson_type,
                scheduled_at: start,
                duration_minutes: duration,
                price: quote.price,
                payment_status: PaymentStatus::for_price(quote.price),
                funding_source: quote.funding_source,
                calendar_event_id: event.event_id.clone(),
                join_link: event.join_link.clone(),
            })
            .await
        {
            Ok(row) => row,
            Err(err) => {
                // Compensate: the calendar event exists but the booking
                // does not. Best-effort; the original error is what the
                // caller sees either way.
                if let Err(cleanup) = self.calendar.delete_event(&event.event_id).await {
                    tracing::error!(
                        booking_id = %booking_id,
                        event_id = %event.event_id,
                        error = %cleanup,
                        "Failed to roll back calendar event"
                    );
                }
                return Err(match err {
                    DbError::Conflict => BookingError::SlotUnavailable,
                    other => BookingError::Database(other),
                });
            }
        };

        let booking: Booking = row.try_into()?;

        // Post-commit side effects; the booking stands even when these fail.
        let credit_debited = if quote.funding_source.is_included() {
            match self.ledger.consume_credit(student.id.0).await {
                Ok(()) => SideEffect::Applied,
                Err(err) => {
                    tracing::error!(
                        booking_id = %booking.id,
                        student_id = %student.id,
                        error = %err,
                        "Failed to debit lesson credit"
                    );
                    SideEffect::Failed
                }
            }
        } else {
            SideEffect::NotRequired
        };

        let consultation_claimed = if req.lesson_type == LessonType::FirstTimeFree {
            match self
                .ledger
                .mark_consultation_claimed(student.id.0, booking.id.0)
                .await
            {
                Ok(()) => SideEffect::Applied,
                Err(err) => {
                    tracing::error!(
                        booking_id = %booking.id,
                        student_id = %student.id,
                        error = %err,
                        "Failed to mark consultation claimed"
                    );
                    SideEffect::Failed
                }
            }
        } else {
            SideEffect::NotRequired
        };

        let confirmation_sent = match self
            .notifier
            .send_text(&student.email, &confirmation_text(&student, &booking, tz))
            .await
        {
            Ok(()) => SideEffect::Applied,
            Err(err) => {
                tracing::warn!(booking_id = %booking.id, error = %err, "Confirmation not sent");
                SideEffect::Failed
            }
        };

        let message = if booking.price > 0 {
            "Booking created - please complete payment".to_string()
        } else {
            "Booking confirmed!".to_string()
        };

        tracing::info!(
            booking_id = %booking.id,
            student_id = %student.id,
            funding_source = %booking.funding_source,
            price = booking.price,
            "Lesson booked"
        );

        Ok(CreateOutcome {
            booking,
            message,
            side_effects: CreateSideEffects {
                credit_debited,
                consultation_claimed,
                confirmation_sent,
            },
        })
    }

    // =========================================================================
    // Cancel workflow
    // =========================================================================

    /// Cancel a booking
    ///
    /// The status update is the commit point; calendar deletion and credit
    /// restoration afterwards are best-effort. A stale calendar entry is
    /// preferable to an un-cancellable booking.
    pub async fn cancel_booking(
        &self,
        token: Option<&str>,
        req: CancelLesson,
    ) -> Result<CancelOutcome, BookingError> {
        let principal = self.authenticate(token).await?;

        let booking: Booking = self
            .bookings
            .find_for_user(req.booking_id.0, principal.user_id.0)
            .await?
            .ok_or(BookingError::BookingNotFound)?
            .try_into()?;

        let notice_hours = self.config.cancellation_notice_hours;
        let hours = policy::hours_until(booking.scheduled_at, Utc::now());
        let refund = policy::refund_status(booking.payment_status, booking.price, hours, notice_hours);

        self.bookings
            .mark_cancelled(CancelBooking {
                id: booking.id.0,
                cancelled_by: principal.user_id.0,
                reason: req.reason.clone(),
                refund_status: refund,
            })
            .await
            .map_err(|err| match err {
                // Already cancelled (the transition happens at most once)
                DbError::NotFound => BookingError::BookingNotFound,
                other => BookingError::Database(other),
            })?;

        let calendar_deleted = match booking.calendar_event_id.as_deref() {
            Some(event_id) => match self.calendar.delete_event(event_id).await {
                Ok(()) => SideEffect::Applied,
                Err(err) => {
                    tracing::error!(
                        booking_id = %booking.id,
                        event_id = %event_id,
                        error = %err,
                        "Failed to delete calendar event"
                    );
                    SideEffect::Failed
                }
            },
            None => SideEffect::NotRequired,
        };

        let credit_restored =
            if policy::restores_credit(booking.funding_source, hours, notice_hours) {
                match self.ledger.restore_credit(booking.student_id.0).await {
                    Ok(()) => SideEffect::Applied,
                    Err(err) => {
                        tracing::error!(
                            booking_id = %booking.id,
                            student_id = %booking.student_id,
                            error = %err,
                            "Failed to restore lesson credit"
                        );
                        SideEffect::Failed
                    }
                }
            } else {
                SideEffect::NotRequired
            };

        tracing::info!(
            booking_id = %booking.id,
            refund_status = %refund,
            "Booking cancelled"
        );

        Ok(CancelOutcome {
            refund_status: refund,
            refund: policy::refund_note(refund, hours, notice_hours),
            message: "Booking cancelled successfully".to_string(),
            side_effects: CancelSideEffects {
                calendar_deleted,
                credit_restored,
            },
        })
    }

    // =========================================================================
    // Slot listing
    // =========================================================================

    /// List bookable slots for a date; pure read path, no auth
    pub async fn available_slots(&self, date: NaiveDate) -> Result<Vec<Slot>, BookingError> {
        self.slot_checker.list_slots(date).await
    }

    /// Resolve the acting principal for a mutating workflow
    async fn authenticate(&self, token: Option<&str>) -> Result<Principal, BookingError> {
        let token = token.ok_or(BookingError::Unauthenticated)?;
        self.identity.resolve(token).await
    }
}

/// Confirmation message body sent after a successful booking
fn confirmation_text(student: &Student, booking: &Booking, tz: FixedOffset) -> String {
    let local = booking.scheduled_at.with_timezone(&tz);
    let mut text = format!(
        "Hi {}, your lesson on {} is booked.",
        student.display_name(),
        local.format("%Y-%m-%d %H:%M")
    );
    if let Some(link) = &booking.join_link {
        text.push_str(&format!(" Join: {link}"));
    }
    if booking.price > 0 {
        text.push_str(" Please complete payment to confirm your slot.");
    }
    text
}

impl<B, S, A, L, C, I, N> std::fmt::Debug for BookingService<B, S, A, L, C, I, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingService")
            .field("config", &self.config)
            .finish()
    }
}
