//! Bookable slot values

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// A candidate bookable start time, derived fresh per query
#[derive(Debug, Clone, Serialize)]
pub struct Slot {
    /// Zoned start timestamp
    pub time: DateTime<FixedOffset>,
    /// Human display label, e.g. "14:00"
    pub display: String,
    /// Whether the slot is currently free
    pub available: bool,
}
