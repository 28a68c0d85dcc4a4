//! Repository traits
//!
//! Define async repository interfaces for database operations. The credit
//! ledger functions are owned by the entitlement system; `CreditLedger`
//! only invokes them and never touches balances directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use kaiwa_types::{FundingSource, LessonType, PaymentStatus, RefundStatus};

use crate::error::DbResult;
use crate::models::*;

/// Booking repository trait
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Find a booking by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<BookingRow>>;

    /// Find a booking by ID, scoped to the owning account
    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> DbResult<Option<BookingRow>>;

    /// Persist a new booking
    ///
    /// Returns [`crate::DbError::Conflict`] when the slot-uniqueness
    /// constraint rejects a second scheduled booking at the same start.
    async fn create(&self, booking: CreateBooking) -> DbResult<BookingRow>;

    /// Transition a scheduled booking to cancelled, stamping metadata
    ///
    /// Returns [`crate::DbError::NotFound`] if the booking does not exist
    /// or is already cancelled; the transition happens at most once.
    async fn mark_cancelled(&self, cancel: CancelBooking) -> DbResult<()>;

    /// Whether any scheduled booking overlaps the half-open interval
    /// `[start, end)`
    async fn exists_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<bool>;
}

/// Create booking input
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub id: Uuid,
    pub student_id: Uuid,
    pub user_id: Uuid,
    pub lesson_type: LessonType,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub price: i64,
    pub payment_status: PaymentStatus,
    pub funding_source: FundingSource,
    pub calendar_event_id: String,
    pub join_link: Option<String>,
}

/// Cancel booking input
#[derive(Debug, Clone)]
pub struct CancelBooking {
    pub id: Uuid,
    pub cancelled_by: Uuid,
    pub reason: Option<String>,
    pub refund_status: RefundStatus,
}

/// Student repository trait
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Find a student by ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<StudentRow>>;
}

/// Teacher availability repository trait
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Active availability windows for a weekday (0 = Sunday .. 6 = Saturday)
    async fn find_for_weekday(&self, day_of_week: i16) -> DbResult<Vec<AvailabilityWindowRow>>;
}

/// Credit ledger remote procedures
///
/// Each call is an atomic operation on the entitlement system's side; each
/// may fail independently of the others.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Unused included-lesson credits for a student
    async fn available_credits(&self, student_id: Uuid) -> DbResult<i64>;

    /// Consume one included-lesson credit
    async fn consume_credit(&self, student_id: Uuid) -> DbResult<()>;

    /// Restore one included-lesson credit
    async fn restore_credit(&self, student_id: Uuid) -> DbResult<()>;

    /// Whether the student may still claim the first-time consultation
    async fn is_eligible_for_consultation(&self, student_id: Uuid) -> DbResult<bool>;

    /// Mark the first-time consultation as claimed by a booking
    async fn mark_consultation_claimed(&self, student_id: Uuid, booking_id: Uuid) -> DbResult<()>;
}
