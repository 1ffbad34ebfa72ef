//! Reaction edges between users (likes, dislikes, favorites).
//!
//! One row per directed edge. Rows are written by the content services that
//! own reactions; this crate only reads them when assembling a profile.

use sea_orm::entity::prelude::*;

/// Edge kind discriminator values
pub const KIND_LIKE: &str = "like";
pub const KIND_DISLIKE: &str = "dislike";
pub const KIND_FAVORITE: &str = "favorite";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_edges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub target_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub kind: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
