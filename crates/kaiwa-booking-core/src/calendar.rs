//! Calendar gateway abstraction

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use kaiwa_types::{BookingId, LessonType};

use crate::BookingError;

/// Details for a calendar event create call
#[derive(Debug, Clone)]
pub struct EventDetails {
    /// Booking id, used as the conference idempotency key
    pub booking_id: BookingId,
    /// Student display name
    pub student_name: String,
    /// Student email, invited as an attendee
    pub student_email: String,
    /// Kind of lesson
    pub lesson_type: LessonType,
    /// Lesson length in minutes
    pub duration_minutes: u32,
    /// Event start in the studio timezone
    pub start_time: DateTime<FixedOffset>,
    /// Event end in the studio timezone
    pub end_time: DateTime<FixedOffset>,
}

/// A created or updated calendar event
#[derive(Debug, Clone)]
pub struct CalendarEvent {
    /// Event id in the external calendar
    pub event_id: String,
    /// Video-conference join link, when the collaborator provides one
    pub join_link: Option<String>,
}

/// Calendar gateway trait
///
/// Thin client over the external calendar collaborator. Failures propagate
/// unchanged; retries, if any, belong to the orchestrator's rollback logic.
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Create an event with an attached video conference
    async fn create_event(&self, details: &EventDetails) -> Result<CalendarEvent, BookingError>;

    /// Apply partial changes to an existing event
    async fn update_event(
        &self,
        event_id: &str,
        changes: serde_json::Value,
    ) -> Result<CalendarEvent, BookingError>;

    /// Delete an event
    ///
    /// An already-deleted event counts as success; cancellation must be
    /// safe to retry.
    async fn delete_event(&self, event_id: &str) -> Result<(), BookingError>;
}
