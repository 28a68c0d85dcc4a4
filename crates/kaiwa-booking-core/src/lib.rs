//! Kaiwa Booking Core - Lesson booking business logic
//!
//! The booking orchestrator and its collaborators: pricing and eligibility
//! resolution, slot availability, the external calendar gateway, the
//! cancellation policy, and the create/cancel workflows with compensation.
//!
//! # Example
//!
//! ```rust,ignore
//! use kaiwa_booking_core::{BookingConfig, BookingService};
//!
//! let service = BookingService::new(
//!     BookingConfig::default(),
//!     repos.bookings, repos.students, repos.availability, repos.credits,
//!     calendar, identity, notifier,
//! );
//!
//! let outcome = service.dispatch(Some(token), request).await?;
//! ```

pub mod calendar;
pub mod config;
pub mod error;
pub mod google;
pub mod identity;
pub mod notify;
pub mod policy;
pub mod pricing;
pub mod service;
pub mod slots;

pub use calendar::{CalendarEvent, CalendarGateway, EventDetails};
pub use config::BookingConfig;
pub use error::BookingError;
pub use google::{GoogleCalendarConfig, GoogleCalendarGateway};
pub use identity::{HttpIdentityProvider, IdentityProvider};
pub use notify::{LineNotifier, Notifier};
pub use pricing::{PricingResolver, Quote};
pub use service::{
    BookingRequest, BookingResponse, BookingService, CancelLesson, CancelOutcome,
    CancelSideEffects, CreateLesson, CreateOutcome, CreateSideEffects, SideEffect, SlotQuery,
};
pub use slots::SlotChecker;
