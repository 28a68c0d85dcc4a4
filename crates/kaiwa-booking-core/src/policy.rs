//! Cancellation policy evaluation
//!
//! Pure functions; the orchestrator supplies the clock.

use chrono::{DateTime, Utc};

use kaiwa_types::{FundingSource, PaymentStatus, RefundStatus};

/// Hours of notice between `now` and the scheduled start
///
/// Negative once the lesson has started or passed.
pub fn hours_until(scheduled_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (scheduled_at - now).num_seconds() as f64 / 3600.0
}

/// Refund decision for a cancellation
///
/// A refund is owed iff the booking was paid, cost something, and the
/// cancellation arrives with at least `notice_hours` of notice.
pub fn refund_status(
    payment_status: PaymentStatus,
    price: i64,
    hours_until: f64,
    notice_hours: i64,
) -> RefundStatus {
    if payment_status == PaymentStatus::Paid && price > 0 && hours_until >= notice_hours as f64 {
        RefundStatus::Pending
    } else {
        RefundStatus::None
    }
}

/// Whether an included credit is restored on cancellation
pub fn restores_credit(funding_source: FundingSource, hours_until: f64, notice_hours: i64) -> bool {
    funding_source.is_included() && hours_until >= notice_hours as f64
}

/// Human refund explanation for the cancellation response
pub fn refund_note(refund: RefundStatus, hours_until: f64, notice_hours: i64) -> String {
    match refund {
        RefundStatus::Pending => {
            "Refund will be processed within 3-5 business days".to_string()
        }
        RefundStatus::None if hours_until < notice_hours as f64 => {
            format!("No refund available (less than {notice_hours} hours notice)")
        }
        RefundStatus::None => "N/A".to_string(),
    }
}
