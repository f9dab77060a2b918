//! Handlers for the category and model catalogs.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::AppResult;
use crate::query::CategoryListQuery;
use crate::services::catalog_service::{CategoryView, ModelView};
use crate::services::CatalogService;
use crate::state::AppState;

/// GET /api/v1/categories
///
/// Category catalog with prompt counts, sorted by popularity by default.
pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<CategoryListQuery>,
) -> AppResult<impl IntoResponse> {
    let categories = CatalogService::categories(&state.pool, params.sort).await?;

    Ok(Json(CategoriesEnvelope { categories }))
}

/// GET /api/v1/models
///
/// Suggested-model catalog with per-model prompt counts.
pub async fn list_models(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let models = CatalogService::models(&state.pool).await?;

    Ok(Json(ModelsEnvelope { models }))
}

#[derive(Debug, Serialize)]
pub struct CategoriesEnvelope {
    pub categories: Vec<CategoryView>,
}

#[derive(Debug, Serialize)]
pub struct ModelsEnvelope {
    pub models: Vec<ModelView>,
}
