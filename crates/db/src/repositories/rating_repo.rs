//! Repository for the `ratings` table.

use sqlx::PgPool;

use promptly_core::types::DbId;

use crate::models::rating::Rating;

/// Column list for `ratings` queries.
const COLUMNS: &str = "id, prompt_id, user_id, rating, created_at, updated_at";

/// Provides rating upsert and aggregate reads.
pub struct RatingRepo;

impl RatingRepo {
    /// Upsert a user's rating of a prompt.
    ///
    /// The `(prompt_id, user_id)` pair is unique: re-rating overwrites the
    /// value in place, it never creates a second row.
    pub async fn upsert(
        pool: &PgPool,
        prompt_id: DbId,
        user_id: DbId,
        rating: i32,
    ) -> Result<Rating, sqlx::Error> {
        let query = format!(
            "INSERT INTO ratings (prompt_id, user_id, rating) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (prompt_id, user_id) \
             DO UPDATE SET rating = EXCLUDED.rating, updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(prompt_id)
            .bind(user_id)
            .bind(rating)
            .fetch_one(pool)
            .await
    }

    /// All rating values for one prompt.
    ///
    /// The aggregate (mean, count) is recomputed from this full read on
    /// every rating event -- no cached aggregate exists to drift.
    pub async fn list_values(pool: &PgPool, prompt_id: DbId) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar("SELECT rating FROM ratings WHERE prompt_id = $1")
            .bind(prompt_id)
            .fetch_all(pool)
            .await
    }

    /// Rating values for a batch of prompts, as `(prompt_id, rating)` pairs.
    ///
    /// Lets list views compute per-prompt averages with one query instead of
    /// one per row.
    pub async fn values_for_prompts(
        pool: &PgPool,
        prompt_ids: &[DbId],
    ) -> Result<Vec<(DbId, i32)>, sqlx::Error> {
        sqlx::query_as("SELECT prompt_id, rating FROM ratings WHERE prompt_id = ANY($1)")
            .bind(prompt_ids)
            .fetch_all(pool)
            .await
    }

    /// Number of ratings for a prompt.
    pub async fn count(pool: &PgPool, prompt_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM ratings WHERE prompt_id = $1")
            .bind(prompt_id)
            .fetch_one(pool)
            .await
    }
}
