//! Kaiwa DB - Database abstractions
//!
//! SQLx-based database layer for Kaiwa services.
//!
//! # Example
//!
//! ```rust,ignore
//! use kaiwa_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/kaiwa").await?;
//! let repos = Repositories::new(pool);
//!
//! // Use repositories
//! let student = repos.students.find_by_id(student_id).await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, DbPool};
pub use repo::*;
