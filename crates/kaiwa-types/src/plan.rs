//! Subscription plan types

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::FundingSource;

/// Subscription plan tiers
///
/// `C1` and `C2` carry included lesson credits ("lite" and "pro"
/// respectively); plan `A` students always pay per lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Plan {
    /// Pay-as-you-go plan
    A,
    /// Lite plan with included lesson credits
    C1,
    /// Pro plan with included lesson credits
    C2,
}

impl Plan {
    /// The funding source used when a credit covers a standard lesson,
    /// or `None` for plans without included credits.
    pub const fn included_funding(&self) -> Option<FundingSource> {
        match self {
            Self::A => None,
            Self::C1 => Some(FundingSource::IncludedLite),
            Self::C2 => Some(FundingSource::IncludedPro),
        }
    }

    /// Whether this plan carries included lesson credits
    pub const fn has_credits(&self) -> bool {
        self.included_funding().is_some()
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::C1 => write!(f, "C1"),
            Self::C2 => write!(f, "C2"),
        }
    }
}

impl std::str::FromStr for Plan {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "C1" => Ok(Self::C1),
            "C2" => Ok(Self::C2),
            _ => Err(ParseError::new("plan", s)),
        }
    }
}
