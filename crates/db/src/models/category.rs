//! Category catalog models.

use promptly_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Category enriched with its prompt count for the catalog listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryWithCount {
    pub id: DbId,
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub prompt_count: i64,
}

/// Sort order for the category catalog.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CategorySort {
    /// Most prompts first.
    #[default]
    Popular,
    /// Alphabetical.
    Name,
}
