//! Infrastructure layer - External systems integration
//!
//! Handles database connection management and the repository
//! implementations over the relational store.

pub mod db;
pub mod repositories;

pub use db::Database;
pub use repositories::{UserChanges, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
