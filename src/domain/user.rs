//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{ROLE_ADMIN_LEVEL_ONE, ROLE_USER, STATUS_ACTIVE, STATUS_BANNED};

/// User roles enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    User,
    AdminLevelOne,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::AdminLevelOne)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN_LEVEL_ONE => UserRole::AdminLevelOne,
            _ => UserRole::User,
        }
    }
}

impl From<String> for UserRole {
    fn from(s: String) -> Self {
        UserRole::from(s.as_str())
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::AdminLevelOne => write!(f, "{}", ROLE_ADMIN_LEVEL_ONE),
            UserRole::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// Two-valued account status gating whether a user is banned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Banned,
}

impl AccountStatus {
    /// Flip between active and banned
    pub fn toggled(self) -> Self {
        match self {
            AccountStatus::Active => AccountStatus::Banned,
            AccountStatus::Banned => AccountStatus::Active,
        }
    }
}

impl From<&str> for AccountStatus {
    fn from(s: &str) -> Self {
        match s {
            STATUS_BANNED => AccountStatus::Banned,
            _ => AccountStatus::Active,
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "{}", STATUS_ACTIVE),
            AccountStatus::Banned => write!(f, "{}", STATUS_BANNED),
        }
    }
}

/// Embedded moderation state: status plus an optional comment explaining a ban
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub status: AccountStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Default for AccountInfo {
    fn default() -> Self {
        Self {
            status: AccountStatus::Active,
            comment: None,
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub account: AccountInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin privileges
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if the account is currently banned
    pub fn is_banned(&self) -> bool {
        self.account.status == AccountStatus::Banned
    }
}

/// A post owned by a user. Content shape is external to this service;
/// only the fields needed to attach it to a profile are carried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub author_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A comment owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub author_id: i32,
    pub post_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A user with all relation collections eagerly attached.
///
/// `subscriptions` are the users this user follows; `subscribers` the
/// inverse. The two lists are independent queries over the same edge table
/// and are not guaranteed consistent with each other.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub likes: Vec<User>,
    pub dislikes: Vec<User>,
    pub favorites: Vec<User>,
    pub subscriptions: Vec<User>,
    pub subscribers: Vec<User>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
}

impl UserProfile {
    /// Wrap a bare user with empty relation collections
    pub fn bare(user: User) -> Self {
        Self {
            user,
            likes: Vec::new(),
            dislikes: Vec::new(),
            favorites: Vec::new(),
            subscriptions: Vec::new(),
            subscribers: Vec::new(),
            posts: Vec::new(),
            comments: Vec::new(),
        }
    }
}

/// User registration data transfer object
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    /// User email address (unique)
    pub email: String,
    /// Plaintext password, hashed before it reaches storage
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Partial user update data transfer object.
///
/// Absent fields are left untouched. No field-level validation happens at
/// this layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    /// Plaintext password, or the stored hash passed back unchanged
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(UserRole::from("admin-level-one"), UserRole::AdminLevelOne);
        assert_eq!(UserRole::from("user"), UserRole::User);
        assert_eq!(UserRole::AdminLevelOne.to_string(), "admin-level-one");
    }

    #[test]
    fn unknown_role_defaults_to_user() {
        assert_eq!(UserRole::from("superuser"), UserRole::User);
    }

    #[test]
    fn status_toggles_between_active_and_banned() {
        assert_eq!(AccountStatus::Active.toggled(), AccountStatus::Banned);
        assert_eq!(AccountStatus::Banned.toggled(), AccountStatus::Active);
        assert_eq!(AccountStatus::from("banned"), AccountStatus::Banned);
        assert_eq!(AccountStatus::from("anything-else"), AccountStatus::Active);
    }
}
