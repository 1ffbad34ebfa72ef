//! Application services - Use cases and business logic.

pub mod user_service;

pub use user_service::{UserManager, UserService};
