//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{AccountInfo, AccountStatus, User, UserRole};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    /// bcrypt hash at rest
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub status: String,
    pub ban_comment: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            email: model.email,
            password_hash: model.password,
            first_name: model.first_name,
            last_name: model.last_name,
            role: UserRole::from(model.role.as_str()),
            account: AccountInfo {
                status: AccountStatus::from(model.status.as_str()),
                comment: model.ban_comment,
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
