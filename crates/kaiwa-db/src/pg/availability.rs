//! PostgreSQL teacher availability repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::AvailabilityWindowRow;
use crate::repo::AvailabilityRepository;

/// PostgreSQL teacher availability repository
#[derive(Clone)]
pub struct PgAvailabilityRepository {
    pool: PgPool,
}

impl PgAvailabilityRepository {
    /// Create a new availability repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for PgAvailabilityRepository {
    async fn find_for_weekday(&self, day_of_week: i16) -> DbResult<Vec<AvailabilityWindowRow>> {
        let windows = sqlx::query_as::<_, AvailabilityWindowRow>(
            r#"
            SELECT id, day_of_week, start_time, end_time, is_available
            FROM teacher_availability
            WHERE day_of_week = $1 AND is_available
            ORDER BY start_time
            "#,
        )
        .bind(day_of_week)
        .fetch_all(&self.pool)
        .await?;

        Ok(windows)
    }
}
