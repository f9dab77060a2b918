//! Comment creation and view mapping. Comments are append-only.

use promptly_core::error::CoreError;
use promptly_core::format::avatar_url;
use promptly_core::types::{DbId, Timestamp};
use promptly_db::models::comment::{CommentWithAuthor, CreateComment};
use promptly_db::repositories::{CommentRepo, PromptRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// A comment as rendered under a prompt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: DbId,
    pub user_id: DbId,
    pub user_name: String,
    /// Author avatar: stored image or a generated fallback, never empty.
    pub user_image: String,
    pub text: String,
    pub created_at: Timestamp,
}

impl CommentView {
    pub(crate) fn from_row(row: CommentWithAuthor) -> Self {
        let user_image = avatar_url(Some(&row.user_name), row.user_image.as_deref());
        Self {
            id: row.id,
            user_id: row.user_id,
            user_name: row.user_name,
            user_image,
            text: row.text,
            created_at: row.created_at,
        }
    }
}

/// Appends comments to prompts.
pub struct CommentService;

impl CommentService {
    /// Add a comment to a prompt.
    ///
    /// Fails with `Validation` on empty text and `NotFound` when the prompt
    /// does not exist.
    pub async fn add(
        pool: &PgPool,
        user_id: DbId,
        prompt_id: DbId,
        text: &str,
    ) -> AppResult<CommentView> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Comment text must not be empty".into(),
            )));
        }
        if !PromptRepo::exists(pool, prompt_id).await? {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Prompt",
                id: prompt_id,
            }));
        }

        let input = CreateComment {
            prompt_id,
            user_id,
            text: text.to_string(),
        };
        let comment_id = CommentRepo::create(pool, &input).await?;

        tracing::info!(prompt_id, user_id, comment_id, "Comment added");

        let row = CommentRepo::find_with_author(pool, comment_id)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!("Comment {comment_id} missing after insert"))
            })?;
        Ok(CommentView::from_row(row))
    }
}
