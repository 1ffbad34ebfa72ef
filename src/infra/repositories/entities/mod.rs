//! SeaORM entities backing the user service.

pub mod comment;
pub mod post;
pub mod subscription;
pub mod user;
pub mod user_edge;
