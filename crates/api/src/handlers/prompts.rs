//! Handlers for prompt CRUD, the follow feed, and per-prompt interactions
//! (ratings, comments, bookmarks).

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use promptly_core::error::CoreError;
use promptly_core::format::parse_tags;
use promptly_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{CurrentUser, RequireUser};
use crate::query::{FeedQuery, PromptListQuery};
use crate::services::comment_service::CommentView;
use crate::services::image_store::UploadedImage;
use crate::services::prompt_service::{
    CreatePromptInput, PromptListOptions, PromptView, UpdatePromptInput,
};
use crate::services::save_service::SaveAction;
use crate::services::{CommentService, PromptService, RatingService, SaveService};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Listing and detail
// ---------------------------------------------------------------------------

/// GET /api/v1/prompts
///
/// List prompts with optional author/category/substring filters, recent or
/// trending sort, and offset pagination.
pub async fn list_prompts(
    CurrentUser(viewer): CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<PromptListQuery>,
) -> AppResult<impl IntoResponse> {
    let page = PromptService::list(
        &state.pool,
        &state.images,
        PromptListOptions {
            viewer,
            user_id: params.user_id,
            category_id: params.category_id,
            q: params.q,
            sort: params.sort,
            page: params.page,
            page_size: params.page_size,
        },
    )
    .await?;

    Ok(Json(page))
}

/// GET /api/v1/prompts/feed
///
/// Prompts from users the viewer follows, newest first.
pub async fn feed(
    RequireUser(viewer): RequireUser,
    State(state): State<AppState>,
    Query(params): Query<FeedQuery>,
) -> AppResult<impl IntoResponse> {
    let page = PromptService::feed(
        &state.pool,
        &state.images,
        viewer,
        params.category_id,
        params.page,
        params.page_size,
    )
    .await?;

    Ok(Json(page))
}

/// GET /api/v1/prompts/{id}
///
/// Full prompt detail including comments.
pub async fn get_prompt(
    CurrentUser(viewer): CurrentUser,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let prompt = PromptService::get_by_id(&state.pool, &state.images, prompt_id, viewer)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Prompt",
            id: prompt_id,
        }))?;

    Ok(Json(PromptEnvelope { prompt }))
}

// ---------------------------------------------------------------------------
// Creation and update (multipart forms)
// ---------------------------------------------------------------------------

/// POST /api/v1/prompts
///
/// Create a prompt from a multipart form. Uploaded `outputImages` files are
/// persisted atomically with the prompt row.
pub async fn create_prompt(
    RequireUser(user_id): RequireUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = PromptForm::parse(multipart).await?;

    let prompt = PromptService::create(
        &state.pool,
        &state.images,
        CreatePromptInput {
            user_id,
            title: form.title,
            description: form.description,
            prompt_text: form.prompt_text,
            example_outputs: form.example_outputs,
            suggested_model: form.suggested_model,
            category_id: form.category_id,
            tags: form.tags,
        },
        form.uploads,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(PromptEnvelope { prompt })))
}

/// PUT /api/v1/prompts/{id}
///
/// Owner-only full update of a prompt.
pub async fn update_prompt(
    RequireUser(user_id): RequireUser,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = PromptForm::parse(multipart).await?;

    let prompt = PromptService::update(
        &state.pool,
        &state.images,
        prompt_id,
        user_id,
        UpdatePromptInput {
            title: form.title,
            description: form.description,
            prompt_text: form.prompt_text,
            example_outputs: form.example_outputs,
            suggested_model: form.suggested_model,
            category_id: form.category_id,
            tags: form.tags,
            existing_images: form.existing_images,
        },
    )
    .await?;

    Ok(Json(PromptEnvelope { prompt }))
}

// ---------------------------------------------------------------------------
// Interactions
// ---------------------------------------------------------------------------

/// POST /api/v1/prompts/{id}/ratings
///
/// Rate a prompt 1-5; re-rating overwrites the viewer's previous rating.
pub async fn rate_prompt(
    RequireUser(user_id): RequireUser,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
    Json(input): Json<RateRequest>,
) -> AppResult<impl IntoResponse> {
    let summary = RatingService::rate_prompt(&state.pool, user_id, prompt_id, input.rating).await?;

    Ok(Json(summary))
}

/// POST /api/v1/prompts/{id}/comments
///
/// Add a comment to a prompt.
pub async fn add_comment(
    RequireUser(user_id): RequireUser,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
    Json(input): Json<CommentRequest>,
) -> AppResult<impl IntoResponse> {
    let comment = CommentService::add(&state.pool, user_id, prompt_id, &input.text).await?;

    Ok((StatusCode::CREATED, Json(CommentEnvelope { comment })))
}

/// POST /api/v1/prompts/{id}/save
///
/// Toggle the viewer's bookmark on a prompt.
pub async fn toggle_save(
    RequireUser(user_id): RequireUser,
    State(state): State<AppState>,
    Path(prompt_id): Path<DbId>,
    Json(input): Json<SaveRequest>,
) -> AppResult<impl IntoResponse> {
    let result = SaveService::toggle(&state.pool, user_id, prompt_id, input.action).await?;

    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// Request/response shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: i32,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub action: SaveAction,
}

#[derive(Debug, Serialize)]
pub struct PromptEnvelope {
    pub prompt: PromptView,
}

#[derive(Debug, Serialize)]
pub struct CommentEnvelope {
    pub comment: CommentView,
}

// ---------------------------------------------------------------------------
// Multipart parsing
// ---------------------------------------------------------------------------

/// Parsed prompt create/update form.
///
/// Text fields default to empty and are validated by the service; `tags`
/// and `existingImages` arrive as JSON-encoded arrays and parse tolerantly.
struct PromptForm {
    title: String,
    description: String,
    prompt_text: String,
    example_outputs: Option<String>,
    suggested_model: String,
    category_id: Option<DbId>,
    tags: Vec<String>,
    existing_images: Vec<String>,
    uploads: Vec<UploadedImage>,
}

impl PromptForm {
    async fn parse(mut multipart: Multipart) -> AppResult<Self> {
        let mut title = String::new();
        let mut description = String::new();
        let mut prompt_text = String::new();
        let mut example_outputs = None;
        let mut suggested_model = String::new();
        let mut category_id = None;
        let mut tags = Vec::new();
        let mut existing_images = Vec::new();
        let mut uploads = Vec::new();

        while let Some(field) = multipart.next_field().await.map_err(invalid_form)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => title = field.text().await.map_err(invalid_form)?,
                "description" => description = field.text().await.map_err(invalid_form)?,
                "promptText" => prompt_text = field.text().await.map_err(invalid_form)?,
                "exampleOutputs" => {
                    let text = field.text().await.map_err(invalid_form)?;
                    example_outputs = if text.is_empty() { None } else { Some(text) };
                }
                "suggestedModel" => suggested_model = field.text().await.map_err(invalid_form)?,
                "categoryId" => {
                    let text = field.text().await.map_err(invalid_form)?;
                    category_id = parse_category_id(&text)?;
                }
                "tags" => {
                    let text = field.text().await.map_err(invalid_form)?;
                    tags = parse_tags(Some(&text));
                }
                "existingImages" => {
                    let text = field.text().await.map_err(invalid_form)?;
                    existing_images = parse_tags(Some(&text));
                }
                "outputImages" => {
                    let file_name = field.file_name().map(str::to_string);
                    let bytes = field.bytes().await.map_err(invalid_form)?;
                    uploads.push(UploadedImage {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
                // Unknown fields are ignored so older clients keep working.
                _ => {}
            }
        }

        Ok(Self {
            title,
            description,
            prompt_text,
            example_outputs,
            suggested_model,
            category_id,
            tags,
            existing_images,
            uploads,
        })
    }
}

fn parse_category_id(text: &str) -> AppResult<Option<DbId>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    text.trim()
        .parse::<DbId>()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("Invalid categoryId '{text}'")))
}

fn invalid_form(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart form: {err}"))
}
