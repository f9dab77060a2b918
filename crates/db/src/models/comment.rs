//! Comment models and DTOs. Comments are append-only: there is no update
//! or delete path.

use promptly_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;

/// Comment joined with its author's display fields -- the only shape comment
/// reads ever need.
#[derive(Debug, Clone, FromRow)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub prompt_id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    pub user_image: Option<String>,
    pub text: String,
    pub created_at: Timestamp,
}

/// DTO for creating a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub prompt_id: DbId,
    pub user_id: DbId,
    pub text: String,
}
