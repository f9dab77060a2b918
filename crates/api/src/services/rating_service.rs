//! Rating upsert and aggregate recomputation.

use promptly_core::error::CoreError;
use promptly_core::format::average_rating;
use promptly_core::types::DbId;
use promptly_db::repositories::{PromptRepo, RatingRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Valid rating bounds, inclusive.
const MIN_RATING: i32 = 1;
const MAX_RATING: i32 = 5;

/// Post-rating aggregate returned to the caller.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_ratings: i64,
}

/// Upserts ratings and recomputes the per-prompt aggregate.
pub struct RatingService;

impl RatingService {
    /// Rate a prompt on behalf of a user.
    ///
    /// Fails with `Validation` when the rating is outside [1,5] and
    /// `NotFound` when the prompt does not exist. The (user, prompt) pair is
    /// upserted -- re-rating overwrites in place -- then the aggregate is
    /// recomputed from a full re-read of the prompt's ratings, so the result
    /// always reflects the latest write at the cost of an O(n) scan.
    pub async fn rate_prompt(
        pool: &PgPool,
        user_id: DbId,
        prompt_id: DbId,
        rating: i32,
    ) -> AppResult<RatingSummary> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Rating must be between {MIN_RATING} and {MAX_RATING}"
            ))));
        }
        if !PromptRepo::exists(pool, prompt_id).await? {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Prompt",
                id: prompt_id,
            }));
        }

        RatingRepo::upsert(pool, prompt_id, user_id, rating).await?;

        let values = RatingRepo::list_values(pool, prompt_id).await?;
        tracing::info!(prompt_id, user_id, rating, total = values.len(), "Prompt rated");

        Ok(RatingSummary {
            average_rating: average_rating(&values),
            total_ratings: values.len() as i64,
        })
    }
}
