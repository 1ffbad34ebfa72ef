//! Domain layer - Core business entities and value objects.
//!
//! Pure domain logic with no infrastructure dependencies.

pub mod password;
pub mod user;

pub use password::Password;
pub use user::{
    AccountInfo, AccountStatus, Comment, CreateUser, Post, UpdateUser, User, UserProfile, UserRole,
};
