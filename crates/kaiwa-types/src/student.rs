//! Student types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Plan;

/// Unique student identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(pub Uuid);

impl StudentId {
    /// Create a new random student ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a student ID from a string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for StudentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for StudentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A student as seen by the booking workflows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    /// Student ID
    pub id: StudentId,
    /// Native-script name
    pub name: String,
    /// Romanized given name, preferred for calendar events and messages
    pub given_name_romaji: Option<String>,
    /// Contact email
    pub email: String,
    /// Subscription plan
    pub plan: Plan,
}

impl Student {
    /// Name to show on calendar events and notifications
    pub fn display_name(&self) -> &str {
        self.given_name_romaji.as_deref().unwrap_or(&self.name)
    }
}
