//! PostgreSQL credit ledger client
//!
//! The ledger functions are owned by the entitlement system and exposed as
//! SQL functions; this client only invokes them.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::repo::CreditLedger;

/// Credit ledger backed by the entitlement system's SQL functions
#[derive(Clone)]
pub struct PgCreditLedger {
    pool: PgPool,
}

impl PgCreditLedger {
    /// Create a new credit ledger client
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CreditLedger for PgCreditLedger {
    async fn available_credits(&self, student_id: Uuid) -> DbResult<i64> {
        let (credits,): (Option<i64>,) =
            sqlx::query_as("SELECT get_available_credits($1)")
                .bind(student_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(credits.unwrap_or(0))
    }

    async fn consume_credit(&self, student_id: Uuid) -> DbResult<()> {
        sqlx::query("SELECT use_lesson_credit($1)")
            .bind(student_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn restore_credit(&self, student_id: Uuid) -> DbResult<()> {
        sqlx::query("SELECT restore_lesson_credit($1)")
            .bind(student_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn is_eligible_for_consultation(&self, student_id: Uuid) -> DbResult<bool> {
        let (eligible,): (Option<bool>,) =
            sqlx::query_as("SELECT is_eligible_for_consultation($1)")
                .bind(student_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(eligible.unwrap_or(false))
    }

    async fn mark_consultation_claimed(
        &self,
        student_id: Uuid,
        booking_id: Uuid,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE first_time_consultations
            SET claimed = TRUE, claimed_at = NOW(), booking_id = $2
            WHERE student_id = $1
            "#,
        )
        .bind(student_id)
        .bind(booking_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
