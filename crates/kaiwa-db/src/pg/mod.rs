//! PostgreSQL repository implementations

mod availability;
mod booking;
mod credit;
mod student;

pub use availability::PgAvailabilityRepository;
pub use booking::PgBookingRepository;
pub use credit::PgCreditLedger;
pub use student::PgStudentRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub bookings: PgBookingRepository,
    pub students: PgStudentRepository,
    pub availability: PgAvailabilityRepository,
    pub credits: PgCreditLedger,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            bookings: PgBookingRepository::new(pool.clone()),
            students: PgStudentRepository::new(pool.clone()),
            availability: PgAvailabilityRepository::new(pool.clone()),
            credits: PgCreditLedger::new(pool),
        }
    }
}
