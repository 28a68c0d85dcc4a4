//! Pricing and eligibility resolution

use std::sync::Arc;

use kaiwa_db::CreditLedger;
use kaiwa_types::{FundingSource, LessonType, Plan, StudentId};

use crate::{BookingConfig, BookingError};

/// A resolved price and funding source for a lesson request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Price in minor currency units; zero for credit-funded or free lessons
    pub price: i64,
    /// What pays for the lesson
    pub funding_source: FundingSource,
}

/// Pricing and eligibility resolver
///
/// Read-only: consults live balances and eligibility but never debits.
/// Debiting happens in the orchestrator only after the booking row is
/// persisted, so a booking that is never created is never charged for.
#[derive(Clone)]
pub struct PricingResolver<L> {
    ledger: Arc<L>,
    config: BookingConfig,
}

impl<L: CreditLedger> PricingResolver<L> {
    /// Create a new pricing resolver
    pub fn new(ledger: Arc<L>, config: BookingConfig) -> Self {
        Self { ledger, config }
    }

    /// Resolve the price and funding source for a lesson request
    pub async fn resolve(
        &self,
        lesson_type: LessonType,
        plan: Plan,
        student_id: StudentId,
    ) -> Result<Quote, BookingError> {
        match lesson_type {
            LessonType::Standard => {
                if let Some(funding) = plan.included_funding() {
                    let credits = self.ledger.available_credits(student_id.0).await?;
                    if credits > 0 {
                        return Ok(Quote {
                            price: 0,
                            funding_source: funding,
                        });
                    }
                }

                Ok(Quote {
                    price: self.config.standard_lesson_fee,
                    funding_source: FundingSource::Paid,
                })
            }
            // Assumed already gated by caller context
            LessonType::Retention => Ok(Quote {
                price: 0,
                funding_source: FundingSource::Retention,
            }),
            LessonType::FirstTimeFree => {
                let eligible = self
                    .ledger
                    .is_eligible_for_consultation(student_id.0)
                    .await?;
                if !eligible {
                    return Err(BookingError::Ineligible);
                }

                Ok(Quote {
                    price: 0,
                    funding_source: FundingSource::FirstTime,
                })
            }
        }
    }
}

impl<L> std::fmt::Debug for PricingResolver<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricingResolver")
            .field("config", &self.config)
            .finish()
    }
}
