//! Repository for the `models` table (suggested-model catalog).

use sqlx::PgPool;

use crate::models::model::ModelWithCount;

/// Provides read operations for the model catalog.
pub struct ModelRepo;

impl ModelRepo {
    /// List models alphabetically with how many prompts suggest each.
    ///
    /// `prompts.suggested_model` stores the model slug as free text, so the
    /// count matches on slug.
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<ModelWithCount>, sqlx::Error> {
        sqlx::query_as::<_, ModelWithCount>(
            "SELECT m.id, m.slug, m.name, \
                    (SELECT COUNT(*) FROM prompts p WHERE p.suggested_model = m.slug) \
                        AS prompt_count \
             FROM models m \
             ORDER BY m.name",
        )
        .fetch_all(pool)
        .await
    }
}
