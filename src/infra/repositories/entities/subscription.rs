//! Directed follow edges between users.
//!
//! A row (follower, author) means the follower's subscriptions list contains
//! the author. The inverse query over the same table yields subscribers.
//! Subscription toggling maintains the mutual pair of rows but nothing
//! enforces that both rows stay in step.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub follower_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub author_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
