//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use kaiwa_types::{
    Booking, BookingId, Cancellation, RefundStatus, Student, StudentId, UserId,
};

use crate::error::DbError;

/// Student row from the database
#[derive(Debug, Clone, FromRow)]
pub struct StudentRow {
    pub id: Uuid,
    pub name: String,
    pub given_name_romaji: Option<String>,
    pub email: String,
    pub plan: String,
    pub created_at: DateTime<Utc>,
}

/// Booking row from the database
#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub user_id: Uuid,
    pub lesson_type: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub price: i64,
    pub payment_status: String,
    pub funding_source: String,
    pub calendar_event_id: Option<String>,
    pub join_link: Option<String>,
    pub status: String,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<Uuid>,
    pub cancellation_reason: Option<String>,
    pub refund_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Teacher availability window row from the database
#[derive(Debug, Clone, FromRow)]
pub struct AvailabilityWindowRow {
    pub id: Uuid,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
}

// Conversion implementations from Row types to kaiwa-types domain types

impl StudentRow {
    /// Convert to domain StudentId
    pub fn student_id(&self) -> StudentId {
        StudentId(self.id)
    }
}

impl TryFrom<StudentRow> for Student {
    type Error = DbError;

    fn try_from(row: StudentRow) -> Result<Self, Self::Error> {
        Ok(Student {
            id: StudentId(row.id),
            name: row.name,
            given_name_romaji: row.given_name_romaji,
            email: row.email,
            plan: row.plan.parse()?,
        })
    }
}

impl BookingRow {
    /// Convert to domain BookingId
    pub fn booking_id(&self) -> BookingId {
        BookingId(self.id)
    }

    /// Convert to domain UserId of the owning account
    pub fn user_id(&self) -> UserId {
        UserId(self.user_id)
    }
}

impl TryFrom<BookingRow> for Booking {
    type Error = DbError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let cancellation = match (row.cancelled_at, row.cancelled_by) {
            (Some(cancelled_at), Some(cancelled_by)) => Some(Cancellation {
                cancelled_at,
                cancelled_by: UserId(cancelled_by),
                reason: row.cancellation_reason.clone(),
                refund_status: match row.refund_status.as_deref() {
                    Some(s) => s.parse()?,
                    None => RefundStatus::None,
                },
            }),
            _ => None,
        };

        Ok(Booking {
            id: BookingId(row.id),
            student_id: StudentId(row.student_id),
            user_id: UserId(row.user_id),
            lesson_type: row.lesson_type.parse()?,
            scheduled_at: row.scheduled_at,
            duration_minutes: u32::try_from(row.duration_minutes)
                .map_err(|_| DbError::Decode(format!("duration {}", row.duration_minutes)))?,
            price: row.price,
            payment_status: row.payment_status.parse()?,
            funding_source: row.funding_source.parse()?,
            calendar_event_id: row.calendar_event_id,
            join_link: row.join_link,
            status: row.status.parse()?,
            cancellation,
            created_at: row.created_at,
        })
    }
}
