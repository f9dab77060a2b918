//! Prompt view assembly: single-prompt detail, filtered listings, the
//! follow feed, saved-prompt pages, and owner mutations.
//!
//! Every view is built through [`PromptService::build_view`], so detail and
//! list rows carry identical enrichment (average rating, resolved tags,
//! image fallback, per-viewer saved flag); only the comment list is
//! detail-specific.

use std::collections::{HashMap, HashSet};

use promptly_core::error::CoreError;
use promptly_core::format::{average_rating, avatar_url, parse_tags};
use promptly_core::pagination::{clamp_page, clamp_page_size, offset, Pagination};
use promptly_core::placeholder::prompt_image_url;
use promptly_core::types::{DbId, Timestamp};
use promptly_db::models::prompt::{
    CreatePrompt, PromptListParams, PromptWithMeta, SortOrder, UpdatePrompt,
};
use promptly_db::repositories::{
    CategoryRepo, CommentRepo, FollowRepo, PromptRepo, RatingRepo, SavedPromptRepo,
};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::services::comment_service::CommentView;
use crate::services::image_store::{ImageStore, UploadedImage};

// ---------------------------------------------------------------------------
// Views and inputs
// ---------------------------------------------------------------------------

/// A prompt as rendered to clients, fully enriched.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptView {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub prompt_text: String,
    pub example_outputs: Option<String>,
    pub suggested_model: String,
    /// Primary display image: first uploaded file, else the stored image,
    /// else a generated placeholder. Never empty.
    pub image: String,
    pub image_urls: Vec<String>,
    pub user_id: DbId,
    pub user_name: String,
    pub user_image: String,
    pub created_at: Timestamp,
    pub tags: Vec<String>,
    pub category_id: Option<DbId>,
    pub category_name: Option<String>,
    pub category_image: Option<String>,
    pub average_rating: f64,
    pub num_ratings: i64,
    pub is_saved: bool,
    /// Present on the detail view only; list views omit comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentView>>,
}

/// One page of prompts plus its pagination envelope.
#[derive(Debug, Clone, Serialize)]
pub struct PromptPage {
    pub prompts: Vec<PromptView>,
    pub pagination: Pagination,
}

/// The follow feed: a prompt page plus whether the viewer follows anyone.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedPage {
    pub prompts: Vec<PromptView>,
    pub pagination: Pagination,
    /// `false` when the viewer follows nobody and the page fell back to the
    /// recent global listing.
    pub follows_users: bool,
}

/// Filter/sort/page options for [`PromptService::list`].
#[derive(Debug, Clone, Default)]
pub struct PromptListOptions {
    pub viewer: Option<DbId>,
    pub user_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub q: Option<String>,
    pub sort: SortOrder,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Input for [`PromptService::create`].
#[derive(Debug, Clone)]
pub struct CreatePromptInput {
    pub user_id: DbId,
    pub title: String,
    pub description: String,
    pub prompt_text: String,
    pub example_outputs: Option<String>,
    pub suggested_model: String,
    pub category_id: Option<DbId>,
    pub tags: Vec<String>,
}

/// Input for [`PromptService::update`]. The edit form submits the whole
/// record; `existing_images` is the image list the client kept, whose first
/// entry becomes the primary image.
#[derive(Debug, Clone)]
pub struct UpdatePromptInput {
    pub title: String,
    pub description: String,
    pub prompt_text: String,
    pub example_outputs: Option<String>,
    pub suggested_model: String,
    pub category_id: Option<DbId>,
    pub tags: Vec<String>,
    pub existing_images: Vec<String>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Assembles prompt views and owns prompt mutations.
pub struct PromptService;

impl PromptService {
    /// Fetch a single prompt, fully enriched, including its comments.
    ///
    /// Returns `Ok(None)` when the prompt does not exist -- absence is not an
    /// error on the read path.
    pub async fn get_by_id(
        pool: &PgPool,
        images: &ImageStore,
        id: DbId,
        viewer: Option<DbId>,
    ) -> AppResult<Option<PromptView>> {
        let Some(row) = PromptRepo::find_with_meta(pool, id).await? else {
            return Ok(None);
        };

        let ratings = RatingRepo::list_values(pool, id).await?;
        let comments: Vec<CommentView> = CommentRepo::list_for_prompt(pool, id)
            .await?
            .into_iter()
            .map(CommentView::from_row)
            .collect();
        let is_saved = match viewer {
            Some(viewer) => SavedPromptRepo::exists(pool, viewer, id).await?,
            None => false,
        };
        let files = Self::stored_images(images, id).await;

        Ok(Some(Self::build_view(
            row,
            &ratings,
            files,
            is_saved,
            Some(comments),
        )))
    }

    /// List prompts with filtering, sorting, and offset pagination.
    ///
    /// The total is counted independently of the page window so the envelope
    /// is stable across pages.
    pub async fn list(
        pool: &PgPool,
        images: &ImageStore,
        options: PromptListOptions,
    ) -> AppResult<PromptPage> {
        let page = clamp_page(options.page);
        let page_size = clamp_page_size(options.page_size);
        let params = PromptListParams {
            user_id: options.user_id,
            category_id: options.category_id,
            q: options.q.clone(),
            sort: options.sort,
            limit: page_size,
            offset: offset(page, page_size),
        };

        let total = PromptRepo::count(pool, &params).await?;
        let rows = PromptRepo::list(pool, &params).await?;
        let prompts = Self::enrich_rows(pool, images, rows, options.viewer).await?;

        Ok(PromptPage {
            prompts,
            pagination: Pagination::new(page, page_size, total),
        })
    }

    /// The viewer's follow feed: prompts authored by followed users, newest
    /// first. A viewer who follows nobody gets the recent global page with
    /// `follows_users: false` instead of an empty feed.
    pub async fn feed(
        pool: &PgPool,
        images: &ImageStore,
        viewer: DbId,
        category_id: Option<DbId>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> AppResult<FeedPage> {
        let following = FollowRepo::following_ids(pool, viewer).await?;

        if following.is_empty() {
            let fallback = Self::list(
                pool,
                images,
                PromptListOptions {
                    viewer: Some(viewer),
                    category_id,
                    sort: SortOrder::Recent,
                    page,
                    page_size,
                    ..Default::default()
                },
            )
            .await?;
            return Ok(FeedPage {
                prompts: fallback.prompts,
                pagination: fallback.pagination,
                follows_users: false,
            });
        }

        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);
        let total = PromptRepo::count_by_authors(pool, &following, category_id).await?;
        let rows = PromptRepo::list_by_authors(
            pool,
            &following,
            category_id,
            page_size,
            offset(page, page_size),
        )
        .await?;
        let prompts = Self::enrich_rows(pool, images, rows, Some(viewer)).await?;

        Ok(FeedPage {
            prompts,
            pagination: Pagination::new(page, page_size, total),
            follows_users: true,
        })
    }

    /// Page of prompts a user has saved, most recently saved first.
    ///
    /// Saved flags are computed for the requesting viewer, who is not
    /// necessarily the listed user.
    pub async fn saved_by_user(
        pool: &PgPool,
        images: &ImageStore,
        user_id: DbId,
        viewer: Option<DbId>,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> AppResult<PromptPage> {
        let page = clamp_page(page);
        let page_size = clamp_page_size(page_size);

        let total = SavedPromptRepo::count_for_user(pool, user_id).await?;
        let rows =
            PromptRepo::list_saved_by(pool, user_id, page_size, offset(page, page_size)).await?;
        let prompts = Self::enrich_rows(pool, images, rows, viewer).await?;

        Ok(PromptPage {
            prompts,
            pagination: Pagination::new(page, page_size, total),
        })
    }

    /// Create a prompt, persisting any uploaded images atomically with the
    /// row: the insert, the file writes, and the primary-image patch share
    /// one transaction. A file-write failure rolls the whole creation back
    /// and removes any files already written.
    pub async fn create(
        pool: &PgPool,
        images: &ImageStore,
        input: CreatePromptInput,
        uploads: Vec<UploadedImage>,
    ) -> AppResult<PromptView> {
        Self::validate_fields(
            &input.title,
            &input.description,
            &input.prompt_text,
            &input.suggested_model,
        )?;
        if let Some(category_id) = input.category_id {
            if !CategoryRepo::exists(pool, category_id).await? {
                return Err(AppError::Core(CoreError::NotFound {
                    entity: "Category",
                    id: category_id,
                }));
            }
        }

        let tags = encode_tags(&input.tags)?;
        let create = CreatePrompt {
            title: input.title,
            description: input.description,
            prompt_text: input.prompt_text,
            example_outputs: input.example_outputs,
            suggested_model: input.suggested_model,
            user_id: input.user_id,
            category_id: input.category_id,
            tags,
        };

        let mut tx = pool.begin().await?;
        let prompt = PromptRepo::create(&mut tx, &create).await?;

        if !uploads.is_empty() {
            let urls = match images.save_images(prompt.id, &uploads).await {
                Ok(urls) => urls,
                Err(err) => {
                    tracing::error!(
                        prompt_id = prompt.id,
                        error = %err,
                        "Image persistence failed, rolling back prompt creation"
                    );
                    tx.rollback().await?;
                    images.remove_prompt_images(prompt.id).await;
                    return Err(AppError::InternalError(
                        "Failed to store uploaded images".into(),
                    ));
                }
            };
            if let Some(first) = urls.first() {
                if let Err(err) = PromptRepo::set_image(&mut tx, prompt.id, first).await {
                    tx.rollback().await?;
                    images.remove_prompt_images(prompt.id).await;
                    return Err(err.into());
                }
            }
        }

        tx.commit().await?;
        tracing::info!(
            prompt_id = prompt.id,
            user_id = input.user_id,
            images = uploads.len(),
            "Prompt created"
        );

        Self::get_by_id(pool, images, prompt.id, Some(input.user_id))
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!("Prompt {} missing after create", prompt.id))
            })
    }

    /// Update a prompt. Only the owner may edit; anyone else gets
    /// `Forbidden`.
    pub async fn update(
        pool: &PgPool,
        images: &ImageStore,
        id: DbId,
        editor: DbId,
        input: UpdatePromptInput,
    ) -> AppResult<PromptView> {
        let Some(existing) = PromptRepo::find_by_id(pool, id).await? else {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Prompt",
                id,
            }));
        };
        if existing.user_id != editor {
            return Err(AppError::Core(CoreError::Forbidden(
                "You are not allowed to edit this prompt".into(),
            )));
        }

        Self::validate_fields(
            &input.title,
            &input.description,
            &input.prompt_text,
            &input.suggested_model,
        )?;
        if let Some(category_id) = input.category_id {
            if !CategoryRepo::exists(pool, category_id).await? {
                return Err(AppError::Core(CoreError::NotFound {
                    entity: "Category",
                    id: category_id,
                }));
            }
        }

        let tags = encode_tags(&input.tags)?;
        let update = UpdatePrompt {
            title: input.title,
            description: input.description,
            prompt_text: input.prompt_text,
            example_outputs: input.example_outputs,
            suggested_model: input.suggested_model,
            category_id: input.category_id,
            tags,
            image: input.existing_images.first().cloned(),
        };
        PromptRepo::update(pool, id, &update)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Prompt",
                id,
            }))?;

        tracing::info!(prompt_id = id, user_id = editor, "Prompt updated");

        Self::get_by_id(pool, images, id, Some(editor))
            .await?
            .ok_or_else(|| AppError::InternalError(format!("Prompt {id} missing after update")))
    }

    // -----------------------------------------------------------------------
    // View assembly
    // -----------------------------------------------------------------------

    /// Enrich a batch of list rows: rating values and the viewer's saved set
    /// are each fetched with one query, then joined in memory.
    async fn enrich_rows(
        pool: &PgPool,
        images: &ImageStore,
        rows: Vec<PromptWithMeta>,
        viewer: Option<DbId>,
    ) -> AppResult<Vec<PromptView>> {
        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();

        let mut ratings_by_prompt: HashMap<DbId, Vec<i32>> = HashMap::new();
        for (prompt_id, value) in RatingRepo::values_for_prompts(pool, &ids).await? {
            ratings_by_prompt.entry(prompt_id).or_default().push(value);
        }

        let saved: HashSet<DbId> = match viewer {
            Some(viewer) => SavedPromptRepo::list_prompt_ids(pool, viewer)
                .await?
                .into_iter()
                .collect(),
            None => HashSet::new(),
        };

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let files = Self::stored_images(images, row.id).await;
            let ratings = ratings_by_prompt.remove(&row.id).unwrap_or_default();
            let is_saved = saved.contains(&row.id);
            views.push(Self::build_view(row, &ratings, files, is_saved, None));
        }
        Ok(views)
    }

    /// Scan the uploads directory for a prompt's images.
    ///
    /// Best-effort enrichment: an I/O failure is logged and degrades to "no
    /// stored files" so the stored-image/placeholder fallbacks take over --
    /// it never fails the read.
    async fn stored_images(images: &ImageStore, prompt_id: DbId) -> Vec<String> {
        match images.list_prompt_images(prompt_id).await {
            Ok(files) => files,
            Err(err) => {
                tracing::warn!(prompt_id, error = %err, "Uploads directory scan failed");
                Vec::new()
            }
        }
    }

    /// Build the client view from a meta row and its enrichment inputs.
    fn build_view(
        row: PromptWithMeta,
        ratings: &[i32],
        files: Vec<String>,
        is_saved: bool,
        comments: Option<Vec<CommentView>>,
    ) -> PromptView {
        let tags = parse_tags(row.tags.as_deref());
        let stored = row.image.as_deref().filter(|i| !i.trim().is_empty());

        // Uploaded files win, then the stored image, then a generated
        // placeholder.
        let image = match files.first() {
            Some(first) => first.clone(),
            None => prompt_image_url(&row.title, stored, &row.user_name, &tags),
        };
        let image_urls = if files.is_empty() {
            vec![image.clone()]
        } else {
            files
        };

        let user_image = avatar_url(Some(&row.user_name), row.user_image.as_deref());

        PromptView {
            id: row.id,
            title: row.title,
            description: row.description,
            prompt_text: row.prompt_text,
            example_outputs: row.example_outputs,
            suggested_model: row.suggested_model,
            image,
            image_urls,
            user_id: row.user_id,
            user_name: row.user_name,
            user_image,
            created_at: row.created_at,
            tags,
            category_id: row.category_id,
            category_name: row.category_name,
            category_image: row.category_image,
            average_rating: average_rating(ratings),
            num_ratings: row.rating_count,
            is_saved,
            comments,
        }
    }

    /// Reject creation/update submissions missing a required field.
    fn validate_fields(
        title: &str,
        description: &str,
        prompt_text: &str,
        suggested_model: &str,
    ) -> AppResult<()> {
        let missing = [
            ("title", title),
            ("description", description),
            ("promptText", prompt_text),
            ("suggestedModel", suggested_model),
        ]
        .iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name);

        if let Some(field) = missing {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Missing required field: {field}"
            ))));
        }
        Ok(())
    }
}

/// JSON-encode a tag list for the `prompts.tags` column; empty stays NULL.
fn encode_tags(tags: &[String]) -> AppResult<Option<String>> {
    if tags.is_empty() {
        return Ok(None);
    }
    serde_json::to_string(tags)
        .map(Some)
        .map_err(|err| AppError::InternalError(format!("Failed to encode tags: {err}")))
}
