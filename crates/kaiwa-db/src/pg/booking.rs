//! PostgreSQL booking repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::models::BookingRow;
use crate::repo::{BookingRepository, CancelBooking, CreateBooking};

const BOOKING_COLUMNS: &str = "id, student_id, user_id, lesson_type, scheduled_at, \
     duration_minutes, price, payment_status, funding_source, calendar_event_id, \
     join_link, status, cancelled_at, cancelled_by, cancellation_reason, \
     refund_status, created_at, updated_at";

/// PostgreSQL booking repository
#[derive(Clone)]
pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    /// Create a new booking repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<BookingRow>> {
        let booking = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM lesson_bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> DbResult<Option<BookingRow>> {
        let booking = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM lesson_bookings WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn create(&self, booking: CreateBooking) -> DbResult<BookingRow> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            INSERT INTO lesson_bookings (id, student_id, user_id, lesson_type,
                                         scheduled_at, duration_minutes, price,
                                         payment_status, funding_source,
                                         calendar_event_id, join_link, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, 'scheduled')
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(booking.id)
        .bind(booking.student_id)
        .bind(booking.user_id)
        .bind(booking.lesson_type.to_string())
        .bind(booking.scheduled_at)
        .bind(i32::try_from(booking.duration_minutes).unwrap_or(i32::MAX))
        .bind(booking.price)
        .bind(booking.payment_status.to_string())
        .bind(booking.funding_source.to_string())
        .bind(&booking.calendar_event_id)
        .bind(&booking.join_link)
        .fetch_one(&self.pool)
        .await
        .map_err(into_conflict)?;

        Ok(row)
    }

    async fn mark_cancelled(&self, cancel: CancelBooking) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE lesson_bookings
            SET status = 'cancelled', cancelled_at = NOW(), cancelled_by = $2,
                cancellation_reason = $3, refund_status = $4, updated_at = NOW()
            WHERE id = $1 AND status = 'scheduled'
            "#,
        )
        .bind(cancel.id)
        .bind(cancel.cancelled_by)
        .bind(&cancel.reason)
        .bind(cancel.refund_status.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        Ok(())
    }

    async fn exists_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<bool> {
        // Half-open intervals: a booking ending exactly at `start` or
        // starting exactly at `end` does not conflict.
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM lesson_bookings
                WHERE status = 'scheduled'
                  AND scheduled_at < $2
                  AND scheduled_at + make_interval(mins => duration_minutes) > $1
            )
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

/// Map uniqueness/exclusion violations on insert to [`DbError::Conflict`]
fn into_conflict(err: sqlx::Error) -> DbError {
    if let Some(db_err) = err.as_database_error() {
        if matches!(db_err.code().as_deref(), Some("23505") | Some("23P01")) {
            return DbError::Conflict;
        }
    }
    DbError::Sqlx(err)
}
