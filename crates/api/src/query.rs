//! Shared query parameter types for API handlers.
//!
//! Query strings use camelCase names to match the client; pagination values
//! are clamped in the service layer via `promptly_core::pagination`.

use promptly_core::types::DbId;
use promptly_db::models::category::CategorySort;
use promptly_db::models::prompt::SortOrder;
use serde::Deserialize;

/// Query parameters for `GET /api/v1/prompts`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptListQuery {
    /// Restrict to one author.
    pub user_id: Option<DbId>,
    /// Restrict to one category.
    pub category_id: Option<DbId>,
    /// Substring match against title or description.
    pub q: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Query parameters for `GET /api/v1/prompts/feed`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    pub category_id: Option<DbId>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Generic pagination parameters (`?page=&limit=`) for follower/following
/// and saved-prompt listings.
#[derive(Debug, Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query parameters for `GET /api/v1/categories`.
#[derive(Debug, Deserialize, Default)]
pub struct CategoryListQuery {
    #[serde(default)]
    pub sort: CategorySort,
}
