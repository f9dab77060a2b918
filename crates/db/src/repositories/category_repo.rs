//! Repository for the `categories` table.

use sqlx::PgPool;

use promptly_core::types::DbId;

use crate::models::category::{CategorySort, CategoryWithCount};

/// Maximum categories returned by the catalog listing.
const CATALOG_LIMIT: i64 = 50;

/// Provides read operations for the category catalog.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Check whether a category exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List categories with their prompt counts.
    pub async fn list_with_counts(
        pool: &PgPool,
        sort: CategorySort,
    ) -> Result<Vec<CategoryWithCount>, sqlx::Error> {
        let order_clause = match sort {
            CategorySort::Popular => "ORDER BY prompt_count DESC, c.name",
            CategorySort::Name => "ORDER BY c.name",
        };
        let query = format!(
            "SELECT c.id, c.name, c.image, c.description, \
                    (SELECT COUNT(*) FROM prompts p WHERE p.category_id = c.id) AS prompt_count \
             FROM categories c \
             {order_clause} \
             LIMIT $1"
        );
        sqlx::query_as::<_, CategoryWithCount>(&query)
            .bind(CATALOG_LIMIT)
            .fetch_all(pool)
            .await
    }
}
