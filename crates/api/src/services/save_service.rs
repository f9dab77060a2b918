//! Bookmark (saved-prompt) membership and toggling.

use promptly_core::error::CoreError;
use promptly_core::types::DbId;
use promptly_db::repositories::{PromptRepo, SavedPromptRepo};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Direction of a save toggle.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SaveAction {
    Save,
    Unsave,
}

/// Post-toggle state returned to the caller.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveToggleResult {
    pub is_saved: bool,
    pub save_count: i64,
}

/// Tracks which users have bookmarked which prompts.
pub struct SaveService;

impl SaveService {
    /// Whether a user has saved a prompt. `None` on either side (an
    /// anonymous viewer, an absent target) resolves to `false` without a
    /// query.
    pub async fn is_saved(
        pool: &PgPool,
        user_id: Option<DbId>,
        prompt_id: Option<DbId>,
    ) -> AppResult<bool> {
        let (Some(user_id), Some(prompt_id)) = (user_id, prompt_id) else {
            return Ok(false);
        };
        Ok(SavedPromptRepo::exists(pool, user_id, prompt_id).await?)
    }

    /// Save or unsave a prompt for a user.
    ///
    /// Both directions are idempotent: re-saving and unsaving something
    /// never saved are benign no-ops, and the returned state describes the
    /// post-operation truth either way. Fails with `NotFound` when the
    /// prompt itself does not exist.
    pub async fn toggle(
        pool: &PgPool,
        user_id: DbId,
        prompt_id: DbId,
        action: SaveAction,
    ) -> AppResult<SaveToggleResult> {
        if !PromptRepo::exists(pool, prompt_id).await? {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Prompt",
                id: prompt_id,
            }));
        }

        match action {
            SaveAction::Save => {
                let inserted = SavedPromptRepo::save(pool, user_id, prompt_id).await?;
                if inserted {
                    tracing::info!(user_id, prompt_id, "Prompt saved");
                }
            }
            SaveAction::Unsave => {
                let removed = SavedPromptRepo::unsave(pool, user_id, prompt_id).await?;
                if removed {
                    tracing::info!(user_id, prompt_id, "Prompt unsaved");
                }
            }
        }

        let save_count = SavedPromptRepo::count_for_prompt(pool, prompt_id).await?;
        let is_saved = SavedPromptRepo::exists(pool, user_id, prompt_id).await?;
        Ok(SaveToggleResult {
            is_saved,
            save_count,
        })
    }

    /// Number of users who saved a prompt.
    pub async fn count(pool: &PgPool, prompt_id: DbId) -> AppResult<i64> {
        Ok(SavedPromptRepo::count_for_prompt(pool, prompt_id).await?)
    }

    /// Number of prompts a user has saved; `None` resolves to zero.
    pub async fn count_for_user(pool: &PgPool, user_id: Option<DbId>) -> AppResult<i64> {
        match user_id {
            Some(user_id) => Ok(SavedPromptRepo::count_for_user(pool, user_id).await?),
            None => Ok(0),
        }
    }

    /// IDs of every prompt a user has saved; `None` resolves to empty.
    pub async fn list_saved_prompt_ids(
        pool: &PgPool,
        user_id: Option<DbId>,
    ) -> AppResult<Vec<DbId>> {
        match user_id {
            Some(user_id) => Ok(SavedPromptRepo::list_prompt_ids(pool, user_id).await?),
            None => Ok(Vec::new()),
        }
    }
}
