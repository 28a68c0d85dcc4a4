//! REST API handlers

pub mod health;
pub mod lessons;

pub use health::*;
pub use lessons::*;
