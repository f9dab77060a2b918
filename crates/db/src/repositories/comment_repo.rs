//! Repository for the `comments` table. Comments are append-only.

use sqlx::PgPool;

use promptly_core::types::DbId;

use crate::models::comment::{CommentWithAuthor, CreateComment};

/// Column list for comment queries joined with the author.
const AUTHOR_COLUMNS: &str = "\
    c.id, c.prompt_id, c.user_id, u.name AS user_name, u.image AS user_image, \
    c.text, c.created_at";

/// Provides comment creation and per-prompt listing.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a comment, returning the generated ID.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO comments (prompt_id, user_id, text) \
             VALUES ($1, $2, $3) \
             RETURNING id",
        )
        .bind(input.prompt_id)
        .bind(input.user_id)
        .bind(&input.text)
        .fetch_one(pool)
        .await
    }

    /// Find a comment joined with its author's display fields.
    pub async fn find_with_author(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CommentWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {AUTHOR_COLUMNS} \
             FROM comments c \
             JOIN users u ON u.id = c.user_id \
             WHERE c.id = $1"
        );
        sqlx::query_as::<_, CommentWithAuthor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All comments on a prompt, newest first.
    pub async fn list_for_prompt(
        pool: &PgPool,
        prompt_id: DbId,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        let query = format!(
            "SELECT {AUTHOR_COLUMNS} \
             FROM comments c \
             JOIN users u ON u.id = c.user_id \
             WHERE c.prompt_id = $1 \
             ORDER BY c.created_at DESC, c.id DESC"
        );
        sqlx::query_as::<_, CommentWithAuthor>(&query)
            .bind(prompt_id)
            .fetch_all(pool)
            .await
    }
}
