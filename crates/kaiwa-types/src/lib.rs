//! Kaiwa Types - Shared domain types
//!
//! This crate contains domain types used across Kaiwa services:
//! - Typed identifiers for users, students and bookings
//! - Subscription plans and lesson/funding classifications
//! - The booking record and derived slot values

pub mod booking;
pub mod error;
pub mod plan;
pub mod slot;
pub mod student;
pub mod user;

pub use booking::*;
pub use error::*;
pub use plan::*;
pub use slot::*;
pub use student::*;
pub use user::*;
