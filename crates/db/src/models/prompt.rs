//! Prompt entity model, DTOs, and list-query parameters.

use promptly_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full prompt row from the `prompts` table.
///
/// `tags` is the raw JSON-encoded string column; use
/// `promptly_core::format::parse_tags` to resolve it. View assembly happens
/// in the service layer, never here.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Prompt {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub prompt_text: String,
    pub example_outputs: Option<String>,
    pub suggested_model: String,
    pub image: Option<String>,
    pub tags: Option<String>,
    pub user_id: DbId,
    pub category_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Prompt row joined with its author, category, and rating count.
///
/// This is the shape every list/detail query fetches, so enrichment never
/// needs a per-row author or category lookup.
#[derive(Debug, Clone, FromRow)]
pub struct PromptWithMeta {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub prompt_text: String,
    pub example_outputs: Option<String>,
    pub suggested_model: String,
    pub image: Option<String>,
    pub tags: Option<String>,
    pub user_id: DbId,
    pub category_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub user_name: String,
    pub user_image: Option<String>,
    pub category_name: Option<String>,
    pub category_image: Option<String>,
    pub rating_count: i64,
}

/// DTO for creating a new prompt.
#[derive(Debug, Clone)]
pub struct CreatePrompt {
    pub title: String,
    pub description: String,
    pub prompt_text: String,
    pub example_outputs: Option<String>,
    pub suggested_model: String,
    pub user_id: DbId,
    pub category_id: Option<DbId>,
    /// JSON-encoded tag array, or `None` for no tags.
    pub tags: Option<String>,
}

/// DTO for updating an existing prompt. The edit form submits the full
/// record, so this is a whole-row overwrite rather than a patch.
#[derive(Debug, Clone)]
pub struct UpdatePrompt {
    pub title: String,
    pub description: String,
    pub prompt_text: String,
    pub example_outputs: Option<String>,
    pub suggested_model: String,
    pub category_id: Option<DbId>,
    pub tags: Option<String>,
    pub image: Option<String>,
}

/// Sort order for prompt listings.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Recent,
    /// Most-rated first (popularity proxy, not rating value).
    Trending,
}

/// Filter, sort, and page window for `PromptRepo::list` / `count`.
#[derive(Debug, Clone, Default)]
pub struct PromptListParams {
    pub user_id: Option<DbId>,
    pub category_id: Option<DbId>,
    /// Case-insensitive substring match against title OR description.
    pub q: Option<String>,
    pub sort: SortOrder,
    pub limit: i64,
    pub offset: i64,
}
