//! Booking configuration

use chrono::FixedOffset;

/// Booking service configuration
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Standard lesson fee in minor currency units
    pub standard_lesson_fee: i64,
    /// Lesson length when the request does not specify one
    pub default_duration_minutes: u32,
    /// Minimum notice, in hours, for a refund or credit restoration
    pub cancellation_notice_hours: i64,
    /// Studio timezone offset from UTC, in hours
    pub utc_offset_hours: i32,
}

impl BookingConfig {
    /// Set the standard lesson fee
    pub fn with_standard_fee(mut self, fee: i64) -> Self {
        self.standard_lesson_fee = fee;
        self
    }

    /// Set the default lesson duration
    pub fn with_default_duration(mut self, minutes: u32) -> Self {
        self.default_duration_minutes = minutes;
        self
    }

    /// Set the cancellation notice window
    pub fn with_notice_hours(mut self, hours: i64) -> Self {
        self.cancellation_notice_hours = hours;
        self
    }

    /// The studio timezone as a fixed offset
    pub fn timezone(&self) -> FixedOffset {
        let secs = self.utc_offset_hours.clamp(-23, 23) * 3600;
        FixedOffset::east_opt(secs).expect("clamped offset is in range")
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            standard_lesson_fee: 4000,
            default_duration_minutes: 50,
            cancellation_notice_hours: 24,
            utc_offset_hours: 9,
        }
    }
}
