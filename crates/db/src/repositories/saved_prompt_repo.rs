//! Repository for the `saved_prompts` (bookmark) table.

use sqlx::PgPool;

use promptly_core::types::DbId;

/// Provides bookmark membership, toggle primitives, and counts.
pub struct SavedPromptRepo;

impl SavedPromptRepo {
    /// Insert a bookmark if absent. Returns `true` when a row was created,
    /// `false` when the prompt was already saved.
    pub async fn save(pool: &PgPool, user_id: DbId, prompt_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO saved_prompts (user_id, prompt_id) \
             VALUES ($1, $2) \
             ON CONFLICT (user_id, prompt_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(prompt_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a bookmark. Returns `true` when a row was removed, `false`
    /// when there was nothing to remove.
    pub async fn unsave(
        pool: &PgPool,
        user_id: DbId,
        prompt_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM saved_prompts WHERE user_id = $1 AND prompt_id = $2")
                .bind(user_id)
                .bind(prompt_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check whether a user has saved a prompt.
    pub async fn exists(
        pool: &PgPool,
        user_id: DbId,
        prompt_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(\
                SELECT 1 FROM saved_prompts WHERE user_id = $1 AND prompt_id = $2)",
        )
        .bind(user_id)
        .bind(prompt_id)
        .fetch_one(pool)
        .await
    }

    /// Number of users who saved a prompt.
    pub async fn count_for_prompt(pool: &PgPool, prompt_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM saved_prompts WHERE prompt_id = $1")
            .bind(prompt_id)
            .fetch_one(pool)
            .await
    }

    /// Number of prompts a user has saved.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM saved_prompts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// IDs of every prompt a user has saved.
    ///
    /// Used to resolve per-row saved flags for a whole list page at once.
    pub async fn list_prompt_ids(pool: &PgPool, user_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT prompt_id FROM saved_prompts WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
