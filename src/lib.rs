//! Social Users - data-access service layer for a social user account
//! system: lookup, registration, profile update, ban management and
//! subscription toggling.
//!
//! This crate exposes no HTTP surface; an upstream controller layer calls
//! [`services::UserService`] directly. Schema migration, authentication and
//! request validation live outside this crate.
//!
//! # Architecture Layers
//!
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and value objects
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure concerns (database, repositories)
//! - **errors**: Centralized error handling
//!
//! # Wiring
//!
//! ```ignore
//! let config = Config::from_env();
//! let db = Database::connect(&config).await?;
//! let repo = Arc::new(UserStore::new(db.get_connection()));
//! let users = UserManager::new(repo);
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use config::Config;
pub use domain::{Password, User, UserProfile, UserRole};
pub use errors::{AppError, AppResult};
pub use infra::{Database, UserStore};
pub use services::{UserManager, UserService};
