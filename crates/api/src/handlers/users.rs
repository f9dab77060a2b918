//! Handlers for user profiles, the follow graph, and saved-prompt listings.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use promptly_core::error::CoreError;
use promptly_core::types::DbId;
use promptly_db::models::user::{UpdateUser, User};
use promptly_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::{CurrentUser, RequireUser};
use crate::query::PageQuery;
use crate::services::{FollowService, PromptService, UserService};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// GET /api/v1/users/{id}
///
/// A user's profile with prompt/follower/following counts and whether the
/// viewer follows them.
pub async fn get_profile(
    CurrentUser(viewer): CurrentUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let profile = UserService::profile(&state.pool, user_id, viewer).await?;

    Ok(Json(profile))
}

/// PUT /api/v1/users/profile
///
/// Update the viewer's own profile (name, bio, image).
pub async fn update_profile(
    RequireUser(user_id): RequireUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateUser>,
) -> AppResult<impl IntoResponse> {
    let user = UserService::update_profile(&state.pool, user_id, &input).await?;

    Ok(Json(UserEnvelope { user }))
}

// ---------------------------------------------------------------------------
// Follow graph
// ---------------------------------------------------------------------------

/// POST /api/v1/users/{id}/follow
///
/// Follow or unfollow a user. Self-follow is rejected before any write.
pub async fn follow_user(
    RequireUser(follower_id): RequireUser,
    State(state): State<AppState>,
    Path(following_id): Path<DbId>,
    Json(input): Json<FollowRequest>,
) -> AppResult<impl IntoResponse> {
    if follower_id == following_id {
        return Err(AppError::BadRequest("Cannot follow yourself".into()));
    }
    if !UserRepo::exists(&state.pool, following_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: following_id,
        }));
    }

    let count = match input.action {
        FollowAction::Follow => {
            let already =
                FollowService::is_following(&state.pool, Some(follower_id), Some(following_id))
                    .await?;
            if already {
                return Err(AppError::BadRequest("Already following this user".into()));
            }
            FollowService::follow(&state.pool, follower_id, following_id).await?
        }
        FollowAction::Unfollow => {
            FollowService::unfollow(&state.pool, follower_id, following_id).await?
        }
    };

    Ok(Json(FollowActionResponse {
        success: true,
        action: input.action,
        following_id,
        follower_count: count.follower_count,
    }))
}

/// GET /api/v1/users/{id}/followers
///
/// Page of users following this user, enriched with whether the viewer
/// follows each of them.
pub async fn list_followers(
    CurrentUser(viewer): CurrentUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let page =
        FollowService::list_followers(&state.pool, user_id, viewer, params.page, params.limit)
            .await?;

    Ok(Json(page))
}

/// GET /api/v1/users/{id}/following
///
/// Page of users this user follows.
pub async fn list_following(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let page =
        FollowService::list_following(&state.pool, user_id, params.page, params.limit).await?;

    Ok(Json(page))
}

// ---------------------------------------------------------------------------
// Saved prompts
// ---------------------------------------------------------------------------

/// GET /api/v1/users/{id}/saved
///
/// Page of prompts this user has saved, most recently saved first. Saved
/// flags on the rows reflect the requesting viewer.
pub async fn saved_prompts(
    CurrentUser(viewer): CurrentUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(params): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let page = PromptService::saved_by_user(
        &state.pool,
        &state.images,
        user_id,
        viewer,
        params.page,
        params.limit,
    )
    .await?;

    Ok(Json(page))
}

// ---------------------------------------------------------------------------
// Request/response shapes
// ---------------------------------------------------------------------------

/// Direction of a follow mutation.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FollowAction {
    Follow,
    Unfollow,
}

#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    pub action: FollowAction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowActionResponse {
    pub success: bool,
    pub action: FollowAction,
    pub following_id: DbId,
    pub follower_count: i64,
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: User,
}
