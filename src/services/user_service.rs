//! User service - account lookup, registration, profile update, ban
//! management and subscription toggling.
//!
//! Pure orchestration over the repository; no transactions wrap the
//! read-then-write sequences, so cross-call consistency relies on the
//! storage constraints.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{AccountStatus, CreateUser, Password, UpdateUser, User, UserProfile, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{UserChanges, UserRepository};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get a user by ID with all relation collections attached.
    /// A missing id yields `Ok(None)`, not an error.
    async fn find_by_id(&self, id: i32) -> AppResult<Option<UserProfile>>;

    /// Get a user row by unique email, no relations attached
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List users filtered by a name search term, capped at `limit`
    async fn find_all(&self, search: Option<String>, limit: Option<u64>) -> AppResult<Vec<User>>;

    /// Register a new user; duplicate email yields `Err(Conflict)`
    async fn create_user(&self, dto: CreateUser) -> AppResult<User>;

    /// Apply a partial update; re-hashes the password when it changed
    async fn update_user(&self, id: i32, dto: UpdateUser) -> AppResult<User>;

    /// Delete a user by ID; a missing id is a no-op success
    async fn delete_user(&self, id: i32) -> AppResult<()>;

    /// Toggle the mutual follow link between two users.
    /// Returns whether the pair is subscribed afterwards.
    async fn toggle_subscription(&self, user_id: i32, author_id: i32) -> AppResult<bool>;

    /// Flip the account between active and banned.
    /// Banning stores the optional comment; unbanning leaves the prior
    /// comment in place.
    async fn toggle_banned(&self, user_id: i32, comment: Option<String>) -> AppResult<User>;

    /// Assign the first-level admin role
    async fn promote_to_admin(&self, user_id: i32) -> AppResult<User>;
}

/// Concrete implementation of UserService using the repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<UserProfile>> {
        self.repo.find_with_relations(id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.repo.find_by_email(email).await
    }

    async fn find_all(&self, search: Option<String>, limit: Option<u64>) -> AppResult<Vec<User>> {
        self.repo.search(search, limit).await
    }

    async fn create_user(&self, dto: CreateUser) -> AppResult<User> {
        // Pre-check only; the unique index on email backstops the
        // check-then-insert race.
        if self.repo.find_by_email(&dto.email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let password = Password::new(&dto.password)?;
        self.repo
            .create(
                dto.email,
                password.into_string(),
                dto.first_name,
                dto.last_name,
            )
            .await
    }

    async fn update_user(&self, id: i32, dto: UpdateUser) -> AppResult<User> {
        let user = self.repo.find_by_id(id).await?.ok_or_not_found()?;

        // The stored hash passed back unchanged means "keep the password";
        // anything else is treated as a new plaintext and re-hashed.
        let password_hash = match dto.password {
            Some(ref password) if *password == user.password_hash => None,
            Some(password) => Some(Password::new(&password)?.into_string()),
            None => None,
        };

        let changes = UserChanges {
            email: dto.email,
            password_hash,
            first_name: dto.first_name,
            last_name: dto.last_name,
            role: dto.role.map(UserRole::from),
        };

        self.repo.update(id, changes).await
    }

    async fn delete_user(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await
    }

    async fn toggle_subscription(&self, user_id: i32, author_id: i32) -> AppResult<bool> {
        self.repo.find_by_id(user_id).await?.ok_or_not_found()?;
        self.repo.find_by_id(author_id).await?.ok_or_not_found()?;

        // The two directions are written without a transaction; a concurrent
        // opposite toggle can leave one side linked. A self-toggle is a
        // single edge, written once.
        if self.repo.is_subscribed(user_id, author_id).await? {
            self.repo.remove_subscription(user_id, author_id).await?;
            if user_id != author_id {
                self.repo.remove_subscription(author_id, user_id).await?;
            }
            Ok(false)
        } else {
            self.repo.add_subscription(user_id, author_id).await?;
            if user_id != author_id {
                self.repo.add_subscription(author_id, user_id).await?;
            }
            Ok(true)
        }
    }

    async fn toggle_banned(&self, user_id: i32, comment: Option<String>) -> AppResult<User> {
        let user = self.repo.find_by_id(user_id).await?.ok_or_not_found()?;

        let next = user.account.status.toggled();
        let comment = match next {
            AccountStatus::Banned => comment,
            // Unbanning restores the status but keeps the prior comment.
            AccountStatus::Active => user.account.comment,
        };

        self.repo.set_account(user_id, next, comment).await
    }

    async fn promote_to_admin(&self, user_id: i32) -> AppResult<User> {
        self.repo.find_by_id(user_id).await?.ok_or_not_found()?;
        self.repo.set_role(user_id, UserRole::AdminLevelOne).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;

    use crate::domain::AccountInfo;
    use crate::infra::MockUserRepository;

    fn test_user(id: i32) -> User {
        User {
            id,
            email: format!("user{}@example.com", id),
            password_hash: "$2b$10$storedhashstoredhashstored".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role: UserRole::User,
            account: AccountInfo::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn banned_user(id: i32, comment: Option<&str>) -> User {
        let mut user = test_user(id);
        user.account = AccountInfo {
            status: AccountStatus::Banned,
            comment: comment.map(String::from),
        };
        user
    }

    #[tokio::test]
    async fn create_user_rejects_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(test_user(1))));

        let service = UserManager::new(Arc::new(repo));
        let result = service
            .create_user(CreateUser {
                email: "user1@example.com".to_string(),
                password: "hunter2hunter2".to_string(),
                first_name: "Dup".to_string(),
                last_name: "Licate".to_string(),
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn create_user_hashes_password_before_storage() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .withf(|_, hash, _, _| {
                hash.as_str() != "plaintext-secret"
                    && bcrypt::verify("plaintext-secret", hash).unwrap()
            })
            .returning(|email, hash, first, last| {
                let mut user = test_user(7);
                user.email = email;
                user.password_hash = hash;
                user.first_name = first;
                user.last_name = last;
                Ok(user)
            });

        let service = UserManager::new(Arc::new(repo));
        let user = service
            .create_user(CreateUser {
                email: "fresh@example.com".to_string(),
                password: "plaintext-secret".to_string(),
                first_name: "New".to_string(),
                last_name: "Account".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(user.email, "fresh@example.com");
        assert_eq!(user.role, UserRole::User);
    }

    #[tokio::test]
    async fn update_user_missing_id_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = UserManager::new(Arc::new(repo));
        let result = service.update_user(42, UpdateUser::default()).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound));
    }

    #[tokio::test]
    async fn update_user_skips_rehash_when_hash_is_passed_back() {
        let stored = test_user(3);
        let stored_hash = stored.password_hash.clone();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_update()
            .withf(|_, changes| changes.password_hash.is_none())
            .returning(|_, _| Ok(test_user(3)));

        let service = UserManager::new(Arc::new(repo));
        let dto = UpdateUser {
            password: Some(stored_hash),
            ..Default::default()
        };
        assert!(service.update_user(3, dto).await.is_ok());
    }

    #[tokio::test]
    async fn toggle_subscription_links_both_directions() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id))));
        repo.expect_is_subscribed().returning(|_, _| Ok(false));
        repo.expect_add_subscription()
            .withf(|follower, author| {
                (*follower == 1 && *author == 2) || (*follower == 2 && *author == 1)
            })
            .times(2)
            .returning(|_, _| Ok(()));

        let service = UserManager::new(Arc::new(repo));
        let subscribed = service.toggle_subscription(1, 2).await.unwrap();

        assert!(subscribed);
    }

    #[tokio::test]
    async fn toggle_subscription_unlinks_when_already_subscribed() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id))));
        repo.expect_is_subscribed().returning(|_, _| Ok(true));
        repo.expect_remove_subscription()
            .withf(|follower, author| {
                (*follower == 1 && *author == 2) || (*follower == 2 && *author == 1)
            })
            .times(2)
            .returning(|_, _| Ok(()));

        let service = UserManager::new(Arc::new(repo));
        let subscribed = service.toggle_subscription(1, 2).await.unwrap();

        assert!(!subscribed);
    }

    #[tokio::test]
    async fn toggle_subscription_with_self_writes_a_single_edge() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id))));
        repo.expect_is_subscribed().returning(|_, _| Ok(false));
        repo.expect_add_subscription()
            .withf(|follower, author| *follower == 9 && *author == 9)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = UserManager::new(Arc::new(repo));
        assert!(service.toggle_subscription(9, 9).await.unwrap());
    }

    #[tokio::test]
    async fn toggle_subscription_with_self_removes_a_single_edge() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id))));
        repo.expect_is_subscribed().returning(|_, _| Ok(true));
        repo.expect_remove_subscription()
            .withf(|follower, author| *follower == 9 && *author == 9)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = UserManager::new(Arc::new(repo));
        assert!(!service.toggle_subscription(9, 9).await.unwrap());
    }

    #[tokio::test]
    async fn toggle_subscription_missing_author_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| if id == 1 { Ok(Some(test_user(1))) } else { Ok(None) });

        let service = UserManager::new(Arc::new(repo));
        let result = service.toggle_subscription(1, 99).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound));
    }

    #[tokio::test]
    async fn toggle_banned_stores_comment_on_ban() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id))));
        repo.expect_set_account()
            .withf(|_, status, comment| {
                *status == AccountStatus::Banned && comment.as_deref() == Some("spam")
            })
            .returning(|id, _, comment| Ok(banned_user(id, comment.as_deref())));

        let service = UserManager::new(Arc::new(repo));
        let user = service
            .toggle_banned(1, Some("spam".to_string()))
            .await
            .unwrap();

        assert_eq!(user.account.status, AccountStatus::Banned);
        assert_eq!(user.account.comment.as_deref(), Some("spam"));
    }

    #[tokio::test]
    async fn toggle_banned_keeps_comment_on_unban() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(banned_user(id, Some("spam")))));
        repo.expect_set_account()
            .withf(|_, status, comment| {
                *status == AccountStatus::Active && comment.as_deref() == Some("spam")
            })
            .returning(|id, _, _| Ok(test_user(id)));

        let service = UserManager::new(Arc::new(repo));
        assert!(service.toggle_banned(1, None).await.is_ok());
    }

    #[tokio::test]
    async fn promote_to_admin_assigns_elevated_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(test_user(id))));
        repo.expect_set_role()
            .withf(|_, role| *role == UserRole::AdminLevelOne)
            .returning(|id, role| {
                let mut user = test_user(id);
                user.role = role;
                Ok(user)
            });

        let service = UserManager::new(Arc::new(repo));
        let user = service.promote_to_admin(5).await.unwrap();

        assert!(user.is_admin());
    }
}
