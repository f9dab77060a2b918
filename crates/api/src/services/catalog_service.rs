//! Category and model catalog listings.

use promptly_core::placeholder::category_image_url;
use promptly_core::types::DbId;
use promptly_db::models::category::CategorySort;
use promptly_db::repositories::{CategoryRepo, ModelRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;

/// A category as rendered in the catalog, with a guaranteed image.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub id: DbId,
    pub name: String,
    pub prompt_count: i64,
    /// Stored image or a deterministic generated placeholder.
    pub image: String,
}

/// A model option for the suggested-model picker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelView {
    pub id: DbId,
    /// Machine value, stored in `prompts.suggested_model`.
    pub value: String,
    /// Human-readable label.
    pub label: String,
    pub prompt_count: i64,
}

/// Read-only catalog listings.
pub struct CatalogService;

impl CatalogService {
    /// Categories with prompt counts, ordered by popularity or name.
    pub async fn categories(pool: &PgPool, sort: CategorySort) -> AppResult<Vec<CategoryView>> {
        let rows = CategoryRepo::list_with_counts(pool, sort).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let image = row
                    .image
                    .filter(|i| !i.trim().is_empty())
                    .unwrap_or_else(|| category_image_url(&row.name));
                CategoryView {
                    id: row.id,
                    name: row.name,
                    prompt_count: row.prompt_count,
                    image,
                }
            })
            .collect())
    }

    /// Models with usage counts, alphabetical.
    pub async fn models(pool: &PgPool) -> AppResult<Vec<ModelView>> {
        let rows = ModelRepo::list_with_counts(pool).await?;
        Ok(rows
            .into_iter()
            .map(|row| ModelView {
                id: row.id,
                value: row.slug,
                label: row.name,
                prompt_count: row.prompt_count,
            })
            .collect())
    }
}
