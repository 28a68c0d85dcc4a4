//! Slot availability checking and generation

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};

use kaiwa_db::{AvailabilityRepository, BookingRepository};
use kaiwa_types::Slot;

use crate::{BookingConfig, BookingError};

/// Half-open interval overlap: `[a_start, a_end)` intersects `[b_start, b_end)`
///
/// Touching endpoints do not conflict; a lesson ending exactly when another
/// starts is fine. The overlap query in the Postgres repository implements
/// the same predicate.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Slot availability checker
///
/// The overlap check is advisory, not transactionally isolated; the
/// slot-uniqueness constraint on the bookings table is the backstop for
/// concurrent writes.
#[derive(Clone)]
pub struct SlotChecker<B, A> {
    bookings: Arc<B>,
    availability: Arc<A>,
    config: BookingConfig,
}

impl<B, A> SlotChecker<B, A>
where
    B: BookingRepository,
    A: AvailabilityRepository,
{
    /// Create a new slot checker
    pub fn new(bookings: Arc<B>, availability: Arc<A>, config: BookingConfig) -> Self {
        Self {
            bookings,
            availability,
            config,
        }
    }

    /// Whether a lesson starting at `start` would collide with an existing
    /// scheduled booking
    ///
    /// Intervals are half-open: a booking ending exactly at `start` does
    /// not conflict, nor does one starting exactly at the proposed end.
    pub async fn is_available(
        &self,
        start: DateTime<Utc>,
        duration_minutes: u32,
    ) -> Result<bool, BookingError> {
        let end = start + Duration::minutes(i64::from(duration_minutes));
        let occupied = self.bookings.exists_overlapping(start, end).await?;
        Ok(!occupied)
    }

    /// Generate the bookable slots for a date
    ///
    /// Enumerates hourly start points inside each active availability
    /// window for the date's weekday (exclusive of the window's end hour)
    /// and keeps the ones that are free. Computed fresh on every call.
    pub async fn list_slots(&self, date: NaiveDate) -> Result<Vec<Slot>, BookingError> {
        let day_of_week = date.weekday().num_days_from_sunday() as i16;
        let windows = self.availability.find_for_weekday(day_of_week).await?;

        let tz = self.config.timezone();
        let duration = self.config.default_duration_minutes;
        let mut slots = Vec::new();

        for window in windows {
            for hour in window.start_time.hour()..window.end_time.hour() {
                let naive = match date.and_hms_opt(hour, 0, 0) {
                    Some(naive) => naive,
                    None => continue,
                };
                let time = match tz.from_local_datetime(&naive).single() {
                    Some(time) => time,
                    None => continue,
                };

                if self.is_available(time.with_timezone(&Utc), duration).await? {
                    slots.push(Slot {
                        time,
                        display: format!("{hour}:00"),
                        available: true,
                    });
                }
            }
        }

        Ok(slots)
    }
}

impl<B, A> std::fmt::Debug for SlotChecker<B, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlotChecker")
            .field("config", &self.config)
            .finish()
    }
}
