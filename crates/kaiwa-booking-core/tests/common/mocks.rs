//! Mock collaborators for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use kaiwa_booking_core::calendar::{CalendarEvent, CalendarGateway, EventDetails};
use kaiwa_booking_core::identity::IdentityProvider;
use kaiwa_booking_core::notify::Notifier;
use kaiwa_booking_core::slots::overlaps;
use kaiwa_booking_core::BookingError;
use kaiwa_db::{
    AvailabilityRepository, AvailabilityWindowRow, BookingRepository, BookingRow, CancelBooking,
    CreateBooking, CreditLedger, DbError, DbResult, StudentRepository, StudentRow,
};
use kaiwa_types::{Principal, UserId};

/// In-memory booking repository for testing
///
/// `create` enforces the no-overlap rule the way the persistence-layer
/// constraint does, so conflict-at-commit paths are exercisable.
#[derive(Default, Clone)]
pub struct MockBookingRepository {
    bookings: Arc<DashMap<Uuid, BookingRow>>,
    fail_create: Arc<AtomicBool>,
    blind_overlap_check: Arc<AtomicBool>,
}

impl MockBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next create calls fail with a database error
    pub fn fail_creates(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    /// Make the advisory overlap check report every slot as free, while
    /// `create` keeps enforcing the constraint. Emulates the window where
    /// a concurrent committer has not yet become visible to readers.
    pub fn blind_overlap_check(&self) {
        self.blind_overlap_check.store(true, Ordering::SeqCst);
    }

    /// Insert a booking row directly
    pub fn insert_booking(&self, row: BookingRow) {
        self.bookings.insert(row.id, row);
    }

    /// Number of stored bookings
    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

fn row_end(row: &BookingRow) -> DateTime<Utc> {
    row.scheduled_at + chrono::Duration::minutes(i64::from(row.duration_minutes))
}

#[async_trait]
impl BookingRepository for MockBookingRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<BookingRow>> {
        Ok(self.bookings.get(&id).map(|r| r.value().clone()))
    }

    async fn find_for_user(&self, id: Uuid, user_id: Uuid) -> DbResult<Option<BookingRow>> {
        Ok(self
            .bookings
            .get(&id)
            .filter(|r| r.value().user_id == user_id)
            .map(|r| r.value().clone()))
    }

    async fn create(&self, booking: CreateBooking) -> DbResult<BookingRow> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(DbError::Decode("simulated write failure".to_string()));
        }

        let end = booking.scheduled_at
            + chrono::Duration::minutes(i64::from(booking.duration_minutes));
        let conflict = self.bookings.iter().any(|r| {
            r.value().status == "scheduled"
                && overlaps(
                    r.value().scheduled_at,
                    row_end(r.value()),
                    booking.scheduled_at,
                    end,
                )
        });
        if conflict {
            return Err(DbError::Conflict);
        }

        let row = BookingRow {
            id: booking.id,
            student_id: booking.student_id,
            user_id: booking.user_id,
            lesson_type: booking.lesson_type.to_string(),
            scheduled_at: booking.scheduled_at,
            duration_minutes: booking.duration_minutes as i32,
            price: booking.price,
            payment_status: booking.payment_status.to_string(),
            funding_source: booking.funding_source.to_string(),
            calendar_event_id: Some(booking.calendar_event_id),
            join_link: booking.join_link,
            status: "scheduled".to_string(),
            cancelled_at: None,
            cancelled_by: None,
            cancellation_reason: None,
            refund_status: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.bookings.insert(row.id, row.clone());
        Ok(row)
    }

    async fn mark_cancelled(&self, cancel: CancelBooking) -> DbResult<()> {
        let mut row = match self.bookings.get_mut(&cancel.id) {
            Some(row) => row,
            None => return Err(DbError::NotFound),
        };
        if row.status != "scheduled" {
            return Err(DbError::NotFound);
        }
        row.status = "cancelled".to_string();
        row.cancelled_at = Some(Utc::now());
        row.cancelled_by = Some(cancel.cancelled_by);
        row.cancellation_reason = cancel.reason;
        row.refund_status = Some(cancel.refund_status.to_string());
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn exists_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<bool> {
        if self.blind_overlap_check.load(Ordering::SeqCst) {
            return Ok(false);
        }
        Ok(self.bookings.iter().any(|r| {
            r.value().status == "scheduled"
                && overlaps(r.value().scheduled_at, row_end(r.value()), start, end)
        }))
    }
}

/// In-memory student repository for testing
#[derive(Default, Clone)]
pub struct MockStudentRepository {
    students: Arc<DashMap<Uuid, StudentRow>>,
}

impl MockStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_student(&self, student: StudentRow) {
        self.students.insert(student.id, student);
    }

    /// Create a test student with the given plan
    pub fn create_test_student(plan: &str) -> StudentRow {
        StudentRow {
            id: Uuid::new_v4(),
            name: "山田太郎".to_string(),
            given_name_romaji: Some("Taro".to_string()),
            email: format!("student-{}@example.com", Uuid::new_v4()),
            plan: plan.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[async_trait]
impl StudentRepository for MockStudentRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<StudentRow>> {
        Ok(self.students.get(&id).map(|r| r.value().clone()))
    }
}

/// In-memory availability repository for testing
#[derive(Default, Clone)]
pub struct MockAvailabilityRepository {
    windows: Arc<Mutex<Vec<AvailabilityWindowRow>>>,
}

impl MockAvailabilityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_window(&self, window: AvailabilityWindowRow) {
        self.windows.lock().unwrap().push(window);
    }
}

#[async_trait]
impl AvailabilityRepository for MockAvailabilityRepository {
    async fn find_for_weekday(&self, day_of_week: i16) -> DbResult<Vec<AvailabilityWindowRow>> {
        Ok(self
            .windows
            .lock()
            .unwrap()
            .iter()
            .filter(|w| w.day_of_week == day_of_week && w.is_available)
            .cloned()
            .collect())
    }
}

/// In-memory credit ledger for testing
#[derive(Default, Clone)]
pub struct MockCreditLedger {
    credits: Arc<DashMap<Uuid, i64>>,
    eligible: Arc<DashSet<Uuid>>,
    claimed: Arc<DashMap<Uuid, Uuid>>,
    fail_consume: Arc<AtomicBool>,
}

impl MockCreditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_credits(&self, student_id: Uuid, credits: i64) {
        self.credits.insert(student_id, credits);
    }

    pub fn credits(&self, student_id: Uuid) -> i64 {
        self.credits.get(&student_id).map(|c| *c).unwrap_or(0)
    }

    pub fn set_eligible(&self, student_id: Uuid) {
        self.eligible.insert(student_id);
    }

    pub fn claimed_booking(&self, student_id: Uuid) -> Option<Uuid> {
        self.claimed.get(&student_id).map(|b| *b)
    }

    /// Make credit debits fail
    pub fn fail_consumes(&self) {
        self.fail_consume.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CreditLedger for MockCreditLedger {
    async fn available_credits(&self, student_id: Uuid) -> DbResult<i64> {
        Ok(self.credits(student_id))
    }

    async fn consume_credit(&self, student_id: Uuid) -> DbResult<()> {
        if self.fail_consume.load(Ordering::SeqCst) {
            return Err(DbError::Decode("ledger unavailable".to_string()));
        }
        *self.credits.entry(student_id).or_insert(0) -= 1;
        Ok(())
    }

    async fn restore_credit(&self, student_id: Uuid) -> DbResult<()> {
        *self.credits.entry(student_id).or_insert(0) += 1;
        Ok(())
    }

    async fn is_eligible_for_consultation(&self, student_id: Uuid) -> DbResult<bool> {
        Ok(self.eligible.contains(&student_id) && !self.claimed.contains_key(&student_id))
    }

    async fn mark_consultation_claimed(
        &self,
        student_id: Uuid,
        booking_id: Uuid,
    ) -> DbResult<()> {
        self.claimed.insert(student_id, booking_id);
        Ok(())
    }
}

/// In-memory calendar gateway for testing
///
/// Deleting an event that is already gone succeeds, matching the real
/// gateway's treatment of the collaborator's not-found outcome.
#[derive(Default, Clone)]
pub struct MockCalendarGateway {
    events: Arc<DashMap<String, String>>,
    created: Arc<AtomicU64>,
    deleted: Arc<AtomicU64>,
    fail_create: Arc<AtomicBool>,
}

impl MockCalendarGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_creates(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    /// Number of events currently live on the calendar
    pub fn live_events(&self) -> usize {
        self.events.len()
    }

    pub fn created_count(&self) -> u64 {
        self.created.load(Ordering::SeqCst)
    }

    pub fn deleted_count(&self) -> u64 {
        self.deleted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CalendarGateway for MockCalendarGateway {
    async fn create_event(&self, details: &EventDetails) -> Result<CalendarEvent, BookingError> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(BookingError::Calendar("service unavailable".to_string()));
        }
        let event_id = format!("evt-{}", details.booking_id);
        let join_link = format!("https://meet.example.com/{}", details.booking_id);
        self.events.insert(event_id.clone(), join_link.clone());
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(CalendarEvent {
            event_id,
            join_link: Some(join_link),
        })
    }

    async fn update_event(
        &self,
        event_id: &str,
        _changes: serde_json::Value,
    ) -> Result<CalendarEvent, BookingError> {
        match self.events.get(event_id) {
            Some(link) => Ok(CalendarEvent {
                event_id: event_id.to_string(),
                join_link: Some(link.clone()),
            }),
            None => Err(BookingError::Calendar("event not found".to_string())),
        }
    }

    async fn delete_event(&self, event_id: &str) -> Result<(), BookingError> {
        // Missing events are fine: delete is retry-safe
        self.events.remove(event_id);
        self.deleted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Identity provider resolving fixed tokens for testing
#[derive(Default, Clone)]
pub struct MockIdentityProvider {
    principals: Arc<DashMap<String, Principal>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token and return the principal it resolves to
    pub fn register_token(&self, token: &str) -> Principal {
        let principal = Principal {
            user_id: UserId::new(),
            email: Some(format!("user-{}@example.com", Uuid::new_v4())),
        };
        self.principals.insert(token.to_string(), principal.clone());
        principal
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<Principal, BookingError> {
        self.principals
            .get(token)
            .map(|p| p.value().clone())
            .ok_or(BookingError::Unauthenticated)
    }
}

/// Notifier that records messages for testing
#[derive(Default, Clone)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    fail_send: Arc<AtomicBool>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_sends(&self) {
        self.fail_send.store(true, Ordering::SeqCst);
    }

    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), BookingError> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(BookingError::Notify("channel down".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), text.to_string()));
        Ok(())
    }
}
