//! Suggested-model catalog models.

use promptly_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// Model enriched with how many prompts suggest it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModelWithCount {
    pub id: DbId,
    pub slug: String,
    pub name: String,
    pub prompt_count: i64,
}
