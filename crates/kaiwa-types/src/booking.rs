//! Booking types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ParseError;
use crate::{StudentId, UserId};

/// Unique booking identifier
///
/// Generated before persistence so it can double as the idempotency key
/// for the calendar event create call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub Uuid);

impl BookingId {
    /// Create a new random booking ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a booking ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for BookingId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Kind of lesson being booked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    /// Regular paid or credit-funded lesson
    Standard,
    /// Free lesson offered to retain a departing student
    Retention,
    /// One-off free consultation for new students
    FirstTimeFree,
}

impl std::fmt::Display for LessonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Retention => write!(f, "retention"),
            Self::FirstTimeFree => write!(f, "first_time_free"),
        }
    }
}

impl std::str::FromStr for LessonType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Self::Standard),
            "retention" => Ok(Self::Retention),
            "first_time_free" => Ok(Self::FirstTimeFree),
            _ => Err(ParseError::new("lesson type", s)),
        }
    }
}

/// What paid for a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundingSource {
    /// Cash payment at the standard fee
    Paid,
    /// Retention offer, free of charge
    Retention,
    /// First-time consultation, free of charge
    FirstTime,
    /// Included credit on the lite plan
    IncludedLite,
    /// Included credit on the pro plan
    IncludedPro,
}

impl FundingSource {
    /// Whether this booking consumed an included lesson credit
    pub const fn is_included(&self) -> bool {
        matches!(self, Self::IncludedLite | Self::IncludedPro)
    }
}

impl std::fmt::Display for FundingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paid => write!(f, "paid"),
            Self::Retention => write!(f, "retention"),
            Self::FirstTime => write!(f, "first_time"),
            Self::IncludedLite => write!(f, "included_lite"),
            Self::IncludedPro => write!(f, "included_pro"),
        }
    }
}

impl std::str::FromStr for FundingSource {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(Self::Paid),
            "retention" => Ok(Self::Retention),
            "first_time" => Ok(Self::FirstTime),
            "included_lite" => Ok(Self::IncludedLite),
            "included_pro" => Ok(Self::IncludedPro),
            _ => Err(ParseError::new("funding source", s)),
        }
    }
}

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Lesson is on the calendar
    Scheduled,
    /// Lesson was cancelled; terminal
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseError::new("booking status", s)),
        }
    }
}

/// Payment state of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Payment is still owed
    Pending,
    /// Nothing owed (free lesson or settled payment)
    Paid,
}

impl PaymentStatus {
    /// Initial payment status for a freshly created booking.
    ///
    /// A zero-price booking has nothing to collect and starts `Paid`.
    pub const fn for_price(price: i64) -> Self {
        if price > 0 {
            Self::Pending
        } else {
            Self::Paid
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            _ => Err(ParseError::new("payment status", s)),
        }
    }
}

/// Refund decision recorded when a booking is cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    /// No refund owed
    None,
    /// Refund owed, processed out of band
    Pending,
}

impl std::fmt::Display for RefundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

impl std::str::FromStr for RefundStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "pending" => Ok(Self::Pending),
            _ => Err(ParseError::new("refund status", s)),
        }
    }
}

/// Cancellation metadata stamped on a cancelled booking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cancellation {
    /// When the cancellation was recorded
    pub cancelled_at: DateTime<Utc>,
    /// Who cancelled
    pub cancelled_by: UserId,
    /// Caller-supplied reason
    pub reason: Option<String>,
    /// Refund decision at cancellation time
    pub refund_status: RefundStatus,
}

/// A scheduled (or cancelled) lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    /// Booking ID
    pub id: BookingId,
    /// Student taking the lesson
    pub student_id: StudentId,
    /// Account that created the booking
    pub user_id: UserId,
    /// Kind of lesson
    pub lesson_type: LessonType,
    /// Lesson start, UTC
    pub scheduled_at: DateTime<Utc>,
    /// Lesson length in minutes
    pub duration_minutes: u32,
    /// Price in minor currency units; zero for free lessons
    pub price: i64,
    /// Payment state
    pub payment_status: PaymentStatus,
    /// What paid for the lesson
    pub funding_source: FundingSource,
    /// External calendar event id; set iff the event was confirmed created
    pub calendar_event_id: Option<String>,
    /// Video-conference join link from the calendar event
    pub join_link: Option<String>,
    /// Lifecycle status
    pub status: BookingStatus,
    /// Cancellation metadata, present once cancelled
    pub cancellation: Option<Cancellation>,
    /// When the booking row was created
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Lesson end, UTC (half-open: the lesson occupies `[start, end)`)
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.scheduled_at + chrono::Duration::minutes(i64::from(self.duration_minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_for_price() {
        assert_eq!(PaymentStatus::for_price(0), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::for_price(4000), PaymentStatus::Pending);
    }

    #[test]
    fn test_funding_source_is_included() {
        assert!(FundingSource::IncludedLite.is_included());
        assert!(FundingSource::IncludedPro.is_included());
        assert!(!FundingSource::Paid.is_included());
        assert!(!FundingSource::Retention.is_included());
        assert!(!FundingSource::FirstTime.is_included());
    }

    #[test]
    fn test_lesson_type_parse_roundtrip() {
        for lt in [
            LessonType::Standard,
            LessonType::Retention,
            LessonType::FirstTimeFree,
        ] {
            assert_eq!(lt.to_string().parse::<LessonType>().unwrap(), lt);
        }
        assert!("trial".parse::<LessonType>().is_err());
    }
}
