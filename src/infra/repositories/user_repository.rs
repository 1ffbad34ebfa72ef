//! User repository over the relational store.
//!
//! Relation collections are assembled with explicit batched fetches rather
//! than ORM-level eager loading.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::entities::user_edge::{self, KIND_DISLIKE, KIND_FAVORITE, KIND_LIKE};
use super::entities::{comment, post, subscription};
use crate::config::{ROLE_USER, STATUS_ACTIVE};
use crate::domain::{AccountStatus, User, UserProfile, UserRole};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Partial change set applied to a user row.
///
/// `password_hash` must already be hashed; plaintext never reaches this
/// layer. Absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<UserRole>,
}

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user row by ID, no relations attached
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Find user by ID with all relation collections attached
    async fn find_with_relations(&self, id: i32) -> AppResult<Option<UserProfile>>;

    /// Find user row by unique email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// List users, filtered by a name search term and capped at `limit`.
    ///
    /// A search term must appear in both the first and the last name
    /// (the historical contract of this operation).
    async fn search(&self, name: Option<String>, limit: Option<u64>) -> AppResult<Vec<User>>;

    /// Insert a new user with default role and active status
    async fn create(
        &self,
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
    ) -> AppResult<User>;

    /// Apply a partial change set to a user row
    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<User>;

    /// Delete a user row by ID; deleting a missing row is not an error
    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Set account status and ban comment
    async fn set_account(
        &self,
        id: i32,
        status: AccountStatus,
        comment: Option<String>,
    ) -> AppResult<User>;

    /// Set the user's role
    async fn set_role(&self, id: i32, role: UserRole) -> AppResult<User>;

    /// Check whether a directed follow edge exists
    async fn is_subscribed(&self, follower_id: i32, author_id: i32) -> AppResult<bool>;

    /// Insert a single directed follow edge
    async fn add_subscription(&self, follower_id: i32, author_id: i32) -> AppResult<()>;

    /// Remove a single directed follow edge
    async fn remove_subscription(&self, follower_id: i32, author_id: i32) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load a batch of users by ID into a lookup map
    async fn load_users(&self, ids: &BTreeSet<i32>) -> AppResult<HashMap<i32, User>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(|m| (m.id, User::from(m)))
            .collect())
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_with_relations(&self, id: i32) -> AppResult<Option<UserProfile>> {
        let Some(model) = UserEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let user = User::from(model);

        // One pass over the reaction edges, one query per subscription
        // direction, then a single IN-query for every referenced user.
        let edges = user_edge::Entity::find()
            .filter(user_edge::Column::UserId.eq(id))
            .all(&self.db)
            .await?;

        let following = subscription::Entity::find()
            .filter(subscription::Column::FollowerId.eq(id))
            .all(&self.db)
            .await?;

        let followers = subscription::Entity::find()
            .filter(subscription::Column::AuthorId.eq(id))
            .all(&self.db)
            .await?;

        let mut like_ids = Vec::new();
        let mut dislike_ids = Vec::new();
        let mut favorite_ids = Vec::new();
        for edge in &edges {
            match edge.kind.as_str() {
                KIND_LIKE => like_ids.push(edge.target_id),
                KIND_DISLIKE => dislike_ids.push(edge.target_id),
                KIND_FAVORITE => favorite_ids.push(edge.target_id),
                other => tracing::warn!(kind = other, "unknown reaction edge kind, skipping"),
            }
        }
        let subscription_ids: Vec<i32> = following.iter().map(|s| s.author_id).collect();
        let subscriber_ids: Vec<i32> = followers.iter().map(|s| s.follower_id).collect();

        let mut referenced = BTreeSet::new();
        referenced.extend(&like_ids);
        referenced.extend(&dislike_ids);
        referenced.extend(&favorite_ids);
        referenced.extend(&subscription_ids);
        referenced.extend(&subscriber_ids);

        let users_by_id = self.load_users(&referenced).await?;
        let pick = |ids: &[i32]| -> Vec<User> {
            ids.iter()
                .filter_map(|i| users_by_id.get(i).cloned())
                .collect()
        };

        let posts = post::Entity::find()
            .filter(post::Column::AuthorId.eq(id))
            .all(&self.db)
            .await?;

        let comments = comment::Entity::find()
            .filter(comment::Column::AuthorId.eq(id))
            .all(&self.db)
            .await?;

        Ok(Some(UserProfile {
            user,
            likes: pick(&like_ids),
            dislikes: pick(&dislike_ids),
            favorites: pick(&favorite_ids),
            subscriptions: pick(&subscription_ids),
            subscribers: pick(&subscriber_ids),
            posts: posts.into_iter().map(Into::into).collect(),
            comments: comments.into_iter().map(Into::into).collect(),
        }))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn search(&self, name: Option<String>, limit: Option<u64>) -> AppResult<Vec<User>> {
        let mut query = UserEntity::find();

        if let Some(term) = name {
            // The term filters first and last name together.
            query = query.filter(
                Condition::all()
                    .add(user::Column::FirstName.contains(&term))
                    .add(user::Column::LastName.contains(&term)),
            );
        }
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let models = query.all(&self.db).await.map_err(AppError::from)?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn create(
        &self,
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
    ) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            email: Set(email),
            password: Set(password_hash),
            first_name: Set(first_name),
            last_name: Set(last_name),
            role: Set(ROLE_USER.to_string()),
            status: Set(STATUS_ACTIVE.to_string()),
            ban_comment: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn update(&self, id: i32, changes: UserChanges) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = user.into();

        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(hash) = changes.password_hash {
            active.password = Set(hash);
        }
        if let Some(first_name) = changes.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = changes.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(role) = changes.role {
            active.role = Set(role.to_string());
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }

    async fn set_account(
        &self,
        id: i32,
        status: AccountStatus,
        comment: Option<String>,
    ) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = user.into();
        active.status = Set(status.to_string());
        active.ban_comment = Set(comment);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn set_role(&self, id: i32, role: UserRole) -> AppResult<User> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = user.into();
        active.role = Set(role.to_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn is_subscribed(&self, follower_id: i32, author_id: i32) -> AppResult<bool> {
        let edge = subscription::Entity::find_by_id((follower_id, author_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(edge.is_some())
    }

    async fn add_subscription(&self, follower_id: i32, author_id: i32) -> AppResult<()> {
        subscription::ActiveModel {
            follower_id: Set(follower_id),
            author_id: Set(author_id),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        Ok(())
    }

    async fn remove_subscription(&self, follower_id: i32, author_id: i32) -> AppResult<()> {
        subscription::Entity::delete_by_id((follower_id, author_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}
